use crate::fruit::Fruit;
use crate::ghost::Ghost;
use crate::hash;
use crate::movement::grid_idx;
use crate::movement::is_open;
use crate::movement::step_tile;
use crate::pacman::Pacman;
use crate::snapshot::FruitView;
use crate::snapshot::GhostView;
use crate::snapshot::PacmanView;
use crate::snapshot::Snapshot;
use pm_core::Direction;
use pm_core::GhostMode;
use pm_core::Tier;
use pm_core::Xorshift128Plus;
use pm_core::EXTRA_LIFE_THRESHOLD;
use pm_core::FRUIT_POINTS_MAX;
use pm_core::FRUIT_POINTS_MIN;
use pm_core::FRUIT_SPAWN_THRESHOLDS;
use pm_core::GHOST_BASE_SPEED;
use pm_core::GHOST_EATEN_SPEED_MULTIPLIER;
use pm_core::GHOST_FRIGHTENED_SPEED_MULTIPLIER;
use pm_core::GRID_H;
use pm_core::GRID_W;
use pm_core::INITIAL_LIVES;
use pm_core::PELLET_POINTS;
use pm_core::POWER_PELLET_POINTS;
use pm_core::TICK_HZ;
use pm_maze::Maze;
use pm_maze::MazeCache;
use pm_maze::MazeVariant;
use std::sync::Arc;

/// Derives the maze seed for round `round` of a match seeded with `seed`,
/// per "regenerate the maze with `seed + round`" (§4.2 step 9). Round 1's
/// maze uses this same formula so the whole match is one deterministic
/// sequence rather than round 1 being a special case.
fn maze_seed(seed: u64, round: u32) -> u64 {
    seed.wrapping_add(round as u64)
}

/// The deterministic per-match state machine (§4.2). Owns every moving
/// part of one match exclusively; the only way anything outside this type
/// observes engine state is through an owned [`Snapshot`] value handed
/// back by [`Engine::tick`] or [`Engine::snapshot`].
pub struct Engine {
    variant: MazeVariant,
    seed: u64,
    tier: Tier,
    maze_cache: Arc<MazeCache>,
    maze: Arc<Maze>,

    tick: u64,
    round: u32,
    score: u32,
    lives: u8,
    game_over: bool,

    pacman: Pacman,
    ghosts: [Ghost; 4],

    pellets: Vec<bool>,
    power_pellets: Vec<(i32, i32)>,
    power_active: bool,
    power_timer: u32,
    combo: u8,

    fruit: Option<Fruit>,
    pellets_eaten: u32,
    fruit_triggered: [bool; 2],
    extra_life_awarded: bool,

    rng: Xorshift128Plus,
    state_hash: [u8; 32],
}

impl Engine {
    pub fn new(variant: MazeVariant, seed: u64, tier: Tier, maze_cache: Arc<MazeCache>) -> Self {
        let round = 1;
        let maze = maze_cache.get(variant, maze_seed(seed, round));
        let mut engine = Self {
            variant,
            seed,
            tier,
            maze_cache,
            maze,
            tick: 0,
            round,
            score: 0,
            lives: INITIAL_LIVES,
            game_over: false,
            pacman: Pacman::at_spawn((0, 0)),
            ghosts: [Ghost::at_spawn(pm_core::GhostId::Blinky, (0, 0), tier); 4],
            pellets: Vec::new(),
            power_pellets: Vec::new(),
            power_active: false,
            power_timer: 0,
            combo: 0,
            fruit: None,
            pellets_eaten: 0,
            fruit_triggered: [false; 2],
            extra_life_awarded: false,
            rng: Xorshift128Plus::seed(maze_seed(seed, round)),
            state_hash: [0; 32],
        };
        engine.load_round_layout();
        engine.state_hash = engine.compute_state_hash();
        log::info!("[pm_engine::engine] new match variant={variant} seed={seed} tier={tier:?}");
        engine
    }

    /// Rebuilds pacman/ghost positions and pellet state from `self.maze`
    /// for the start of a (possibly new) round, without touching score,
    /// lives, or tick.
    fn load_round_layout(&mut self) {
        self.pacman = Pacman::at_spawn(self.maze.spawn_for_pacman());
        for (ghost, (id, spawn)) in self.ghosts.iter_mut().zip(self.maze.spawns_for_ghosts()) {
            *ghost = Ghost::at_spawn(id, spawn, self.tier);
        }
        self.pellets = (0..GRID_H)
            .flat_map(|y| (0..GRID_W).map(move |x| (x, y)))
            .map(|(x, y)| self.maze.pellet_at(x as i32, y as i32))
            .collect();
        self.power_pellets = self.maze.power_pellets().to_vec();
        self.power_active = false;
        self.power_timer = 0;
        self.combo = 0;
        self.fruit = None;
        self.pellets_eaten = 0;
        self.fruit_triggered = [false; 2];
    }

    /// Rebuilds the match from scratch at the same `(variant, seed, tier)`.
    pub fn reset(&mut self) {
        self.round = 1;
        self.maze = self.maze_cache.get(self.variant, maze_seed(self.seed, self.round));
        self.tick = 0;
        self.score = 0;
        self.lives = INITIAL_LIVES;
        self.game_over = false;
        self.extra_life_awarded = false;
        self.rng = Xorshift128Plus::seed(maze_seed(self.seed, self.round));
        self.load_round_layout();
        self.state_hash = self.compute_state_hash();
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Empties both pellet structures so the very next [`Self::tick`] clears
    /// the round (§8 S4's "force-clear pellets via a test hook"), without
    /// driving the hundreds of real ticks a full pellet sweep would take.
    #[cfg(feature = "testing")]
    pub fn force_clear_pellets(&mut self) {
        self.pellets.iter_mut().for_each(|p| *p = false);
        self.power_pellets.clear();
    }

    pub fn state_hash(&self) -> [u8; 32] {
        self.state_hash
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            round: self.round,
            score: self.score,
            lives: self.lives,
            pacman: PacmanView {
                x: self.pacman.x,
                y: self.pacman.y,
                progress: self.pacman.progress,
                dir: self.pacman.dir,
            },
            ghosts: std::array::from_fn(|i| {
                let g = self.ghosts[i];
                GhostView {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                    progress: g.progress,
                    dir: g.dir,
                    mode: g.mode,
                }
            }),
            pellets: self.pellets.clone(),
            power_pellets: self.power_pellets.clone(),
            power_active: self.power_active,
            power_time_remaining: self.power_timer,
            fruit: self.fruit.map(|f| FruitView { x: f.x, y: f.y, points: f.points }),
            game_over: self.game_over,
            state_hash: hex::encode(self.state_hash),
        }
    }

    /// Advances the match by exactly one tick, in the fixed order of §4.2.
    /// A finished match is inert: repeated calls just return the same
    /// snapshot.
    pub fn tick(&mut self, input: Option<Direction>) -> Snapshot {
        if self.game_over {
            return self.snapshot();
        }
        self.tick += 1;

        self.move_pacman(input);
        self.collect_pellets();
        self.step_ghosts();
        self.resolve_collisions();
        self.step_power_timer();
        self.step_fruit();
        self.maybe_clear_round();
        self.maybe_award_extra_life();

        self.state_hash = self.compute_state_hash();
        self.snapshot()
    }

    fn tier_ghost_speed(&self) -> f32 {
        GHOST_BASE_SPEED * self.tier.ghost_speed_multiplier()
    }

    fn move_pacman(&mut self, input: Option<Direction>) {
        if let Some(dir) = input {
            if dir == self.pacman.dir.opposite() {
                self.pacman.dir = dir;
                self.pacman.progress = 1.0 - self.pacman.progress;
                self.pacman.queued = None;
            } else {
                self.pacman.queued = Some(dir);
            }
        }

        let maze = &self.maze;
        let p = &mut self.pacman;

        if p.progress == 0.0 {
            if let Some(q) = p.queued {
                if is_open(maze, p.x, p.y, q) {
                    p.dir = q;
                    p.queued = None;
                }
            }
        }

        if !is_open(maze, p.x, p.y, p.dir) {
            p.progress = 0.0;
            return;
        }

        p.progress += p.speed / TICK_HZ as f32;
        if p.progress >= 1.0 {
            let overflow = p.progress - 1.0;
            let (nx, ny) = step_tile(p.x, p.y, p.dir);
            p.x = nx;
            p.y = ny;
            p.progress = overflow;
            if let Some(q) = p.queued {
                if is_open(maze, nx, ny, q) {
                    p.dir = q;
                    p.queued = None;
                }
            }
            if !is_open(maze, nx, ny, p.dir) {
                p.progress = 0.0;
            }
        }
    }

    fn collect_pellets(&mut self) {
        let (x, y) = self.pacman.tile();
        let idx = grid_idx(x, y);
        if self.pellets[idx] {
            self.pellets[idx] = false;
            self.score += PELLET_POINTS;
            self.pellets_eaten += 1;
        }
        if let Some(pos) = self.power_pellets.iter().position(|&p| p == (x, y)) {
            self.power_pellets.remove(pos);
            self.score += POWER_PELLET_POINTS;
            self.activate_power();
        }
        if let Some(fruit) = self.fruit {
            if fruit.tile() == (x, y) {
                self.score += fruit.points;
                self.fruit = None;
            }
        }
    }

    fn activate_power(&mut self) {
        self.power_active = true;
        self.power_timer = self.tier.power_seconds() * TICK_HZ;
        self.combo = 0;
        for g in &mut self.ghosts {
            if g.mode != GhostMode::Eaten {
                g.mode = GhostMode::Frightened;
                g.dir = g.dir.opposite();
                g.progress = 1.0 - g.progress;
                g.speed *= GHOST_FRIGHTENED_SPEED_MULTIPLIER;
            }
        }
    }

    fn step_ghosts(&mut self) {
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].mode == GhostMode::Eaten {
                self.step_eaten_ghost(i);
            } else {
                self.step_active_ghost(i);
            }
        }
    }

    fn step_active_ghost(&mut self, i: usize) {
        let maze = &self.maze;
        let rng = &mut self.rng;
        let g = &mut self.ghosts[i];

        if g.is_at_boundary() {
            let mut candidates: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| is_open(maze, g.x, g.y, *d))
                .collect();
            if candidates.len() > 1 {
                candidates.retain(|d| *d != g.dir.opposite());
            }
            g.dir = *rng.pick(&candidates);
        }

        advance_ghost_tile(g, maze);
    }

    fn step_eaten_ghost(&mut self, i: usize) {
        let id = self.ghosts[i].id;
        let spawn = self.maze.spawn_for_ghost(id);
        let tier_speed = self.tier_ghost_speed();
        let maze = &self.maze;
        let g = &mut self.ghosts[i];

        if g.is_at_boundary() {
            let mut candidates: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|d| is_open(maze, g.x, g.y, *d))
                .collect();
            if candidates.len() > 1 {
                candidates.retain(|d| *d != g.dir.opposite());
            }
            g.dir = *candidates
                .iter()
                .min_by_key(|d| {
                    let (dx, dy) = d.delta();
                    (g.x + dx - spawn.0).abs() + (g.y + dy - spawn.1).abs()
                })
                .expect("maze connectivity guarantees at least one open direction");
        }

        advance_ghost_tile(g, maze);

        if (g.x, g.y) == spawn && g.progress < pm_core::GHOST_BOUNDARY_EPSILON {
            g.mode = GhostMode::Chase;
            g.speed = tier_speed;
        }
    }

    fn resolve_collisions(&mut self) {
        let (px, py) = self.pacman.tile();
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].tile() != (px, py) {
                continue;
            }
            match self.ghosts[i].mode {
                GhostMode::Frightened => {
                    let points_table = pm_core::GHOST_COMBO_POINTS;
                    let idx = (self.combo as usize).min(points_table.len() - 1);
                    self.score += points_table[idx];
                    self.combo = self.combo.saturating_add(1);
                    self.ghosts[i].mode = GhostMode::Eaten;
                    self.ghosts[i].speed = GHOST_BASE_SPEED
                        * self.tier.ghost_speed_multiplier()
                        * GHOST_EATEN_SPEED_MULTIPLIER;
                }
                GhostMode::Chase | GhostMode::Scatter => {
                    self.lose_life();
                    break;
                }
                GhostMode::Eaten => {}
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            log::info!("[pm_engine::engine] game over at tick {}", self.tick);
            return;
        }
        self.pacman = Pacman::at_spawn(self.maze.spawn_for_pacman());
        for (ghost, (id, spawn)) in self.ghosts.iter_mut().zip(self.maze.spawns_for_ghosts()) {
            *ghost = Ghost::at_spawn(id, spawn, self.tier);
        }
        self.power_active = false;
        self.power_timer = 0;
        self.combo = 0;
    }

    fn step_power_timer(&mut self) {
        if !self.power_active {
            return;
        }
        self.power_timer = self.power_timer.saturating_sub(1);
        if self.power_timer == 0 {
            self.power_active = false;
            self.combo = 0;
            let tier_speed = self.tier_ghost_speed();
            for g in &mut self.ghosts {
                if g.mode == GhostMode::Frightened {
                    g.mode = GhostMode::Chase;
                    g.speed = tier_speed;
                }
            }
        }
    }

    fn step_fruit(&mut self) {
        for (slot, &threshold) in FRUIT_SPAWN_THRESHOLDS.iter().enumerate() {
            if self.pellets_eaten == threshold && !self.fruit_triggered[slot] {
                self.fruit_triggered[slot] = true;
                let points = self.rng.next_range(FRUIT_POINTS_MIN, FRUIT_POINTS_MAX);
                self.fruit = Some(Fruit::spawn(points));
            }
        }
        if let Some(fruit) = &mut self.fruit {
            if fruit.ticks_remaining > 0 {
                fruit.ticks_remaining -= 1;
            }
            if fruit.ticks_remaining == 0 {
                self.fruit = None;
            }
        }
    }

    fn maybe_clear_round(&mut self) {
        let pellets_remaining = self.pellets.iter().filter(|p| **p).count();
        if pellets_remaining != 0 || !self.power_pellets.is_empty() {
            return;
        }
        self.round += 1;
        self.maze = self.maze_cache.get(self.variant, maze_seed(self.seed, self.round));
        self.rng = Xorshift128Plus::seed(maze_seed(self.seed, self.round));
        self.load_round_layout();
        log::info!("[pm_engine::engine] round clear, now round {}", self.round);
    }

    fn maybe_award_extra_life(&mut self) {
        if !self.extra_life_awarded && self.score >= EXTRA_LIFE_THRESHOLD {
            self.lives = self.lives.saturating_add(1);
            self.extra_life_awarded = true;
            log::debug!("[pm_engine::engine] extra life awarded at score {}", self.score);
        }
    }

    fn compute_state_hash(&self) -> [u8; 32] {
        hash::state_hash(
            self.tick,
            self.round,
            self.score,
            self.lives,
            &self.pacman,
            self.power_active,
            self.power_timer,
            &self.ghosts,
        )
    }
}

/// Advances `g` by one tick along its current direction, stepping tiles
/// (with tunnel wrap) and stalling at progress 0 if the way forward is
/// walled. Shared by both active and eaten ghosts; only direction
/// selection differs between the two.
fn advance_ghost_tile(g: &mut Ghost, maze: &Maze) {
    if !is_open(maze, g.x, g.y, g.dir) {
        g.progress = 0.0;
        return;
    }
    g.progress += g.speed / TICK_HZ as f32;
    if g.progress >= 1.0 {
        let overflow = g.progress - 1.0;
        let (nx, ny) = step_tile(g.x, g.y, g.dir);
        g.x = nx;
        g.y = ny;
        g.progress = overflow;
    }
}
