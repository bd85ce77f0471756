use pm_engine::GhostView;
use pm_engine::PacmanView;
use pm_engine::Snapshot;
use serde::Deserialize;
use serde::Serialize;

/// What changed since the previous tick, for the steady-state `frame`
/// broadcast (§6). Every field but `round`/`game_over` is optional so a
/// quiet tick serializes to almost nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDelta {
    pub tick: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pacman: Option<PacmanView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ghosts: Vec<GhostView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pellets_eaten: Vec<(i32, i32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_time_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lives: Option<u8>,
    pub round: u32,
    pub game_over: bool,
}

/// A `frame` broadcast payload: the first tick of a session's lifetime (or
/// every tick for a newly attached `fullSync` caller) goes out as a whole
/// [`Snapshot`]; every tick after that is a [`FrameDelta`] against the
/// previous one (§4.3, §6).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Frame {
    Full(Snapshot),
    Delta(FrameDelta),
}

/// Recovers the maze's column width from a pellet bitmap's length, so a
/// delta can translate row-major indices back to `(x, y)` without carrying
/// a `MazeVariant` around. Classic/Labyrinth/Speedway/Fortress/Random all
/// share the one fixed grid width (`pm_core::constants::GRID_W`); this
/// helper exists so the conversion reads as "pellet index to tile" rather
/// than a bare modulo at the call site.
fn tile_of(index: usize, width: i32) -> (i32, i32) {
    let width = width as usize;
    ((index % width) as i32, (index / width) as i32)
}

/// Builds the [`FrameDelta`] carrying everything that differs between
/// `prev` and `curr`. Both snapshots must come from the same session; the
/// pellet diff in particular assumes `prev.pellets.len() == curr.pellets.len()`,
/// which holds because a round transition clears and rebuilds the bitmap at
/// the same fixed grid dimensions (`pm_core::constants::GRID_W` ×
/// `GRID_H`).
pub fn diff(prev: &Snapshot, curr: &Snapshot, grid_width: i32) -> FrameDelta {
    let pacman = if prev.pacman != curr.pacman {
        Some(curr.pacman)
    } else {
        None
    };
    let ghosts: Vec<GhostView> = curr
        .ghosts
        .iter()
        .zip(prev.ghosts.iter())
        .filter(|(c, p)| c != p)
        .map(|(c, _)| *c)
        .collect();
    let pellets_eaten: Vec<(i32, i32)> = if prev.round == curr.round {
        prev.pellets
            .iter()
            .zip(curr.pellets.iter())
            .enumerate()
            .filter(|(_, (was, is))| **was && !**is)
            .map(|(idx, _)| tile_of(idx, grid_width))
            .collect()
    } else {
        Vec::new()
    };
    let power_active = (prev.power_active != curr.power_active).then_some(curr.power_active);
    let power_time_remaining = (prev.power_time_remaining != curr.power_time_remaining)
        .then_some(curr.power_time_remaining);
    let score = (prev.score != curr.score).then_some(curr.score);
    let lives = (prev.lives != curr.lives).then_some(curr.lives);
    FrameDelta {
        tick: curr.tick,
        pacman,
        ghosts,
        pellets_eaten,
        power_active,
        power_time_remaining,
        score,
        lives,
        round: curr.round,
        game_over: curr.game_over,
    }
}

/// Width of every board layout regardless of [`MazeVariant`] (§2). Kept
/// local to this module rather than re-exported from `pm-core` since
/// `diff` is presently the only caller that needs it by name.
pub const BOARD_WIDTH: i32 = pm_core::constants::GRID_W as i32;

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::Direction;
    use pm_core::GhostId;
    use pm_core::GhostMode;
    use pm_core::Tier;
    use pm_maze::MazeCache;
    use pm_maze::MazeVariant;
    use std::sync::Arc;

    fn engine() -> pm_engine::Engine {
        pm_engine::Engine::new(MazeVariant::Classic, 1, Tier::Three, Arc::new(MazeCache::new()))
    }

    #[test]
    fn a_quiet_tick_with_no_movement_carries_almost_nothing() {
        let e = engine();
        let prev = e.snapshot();
        // Pac-Man is blocked on tick one unless its spawn direction is open;
        // either way comparing a snapshot against itself must be empty.
        let delta = diff(&prev, &prev, BOARD_WIDTH);
        assert!(delta.pacman.is_none());
        assert!(delta.ghosts.is_empty());
        assert!(delta.pellets_eaten.is_empty());
        assert!(delta.power_active.is_none());
        assert!(delta.score.is_none());
        assert!(delta.lives.is_none());
    }

    #[test]
    fn a_moved_pacman_is_carried_on_the_delta() {
        let prev = PacmanView { x: 1, y: 1, progress: 0.0, dir: Direction::Left };
        let curr = PacmanView { x: 1, y: 1, progress: 0.5, dir: Direction::Left };
        let mut snap_prev = sample_snapshot();
        let mut snap_curr = sample_snapshot();
        snap_prev.pacman = prev;
        snap_curr.pacman = curr;
        let delta = diff(&snap_prev, &snap_curr, BOARD_WIDTH);
        assert_eq!(delta.pacman, Some(curr));
    }

    #[test]
    fn eaten_pellets_translate_back_to_tile_coordinates() {
        let mut snap_prev = sample_snapshot();
        let mut snap_curr = sample_snapshot();
        snap_prev.pellets = vec![true; (BOARD_WIDTH * 2) as usize];
        snap_curr.pellets = snap_prev.pellets.clone();
        let idx = (BOARD_WIDTH + 3) as usize; // row 1, col 3
        snap_curr.pellets[idx] = false;
        let delta = diff(&snap_prev, &snap_curr, BOARD_WIDTH);
        assert_eq!(delta.pellets_eaten, vec![(3, 1)]);
    }

    #[test]
    fn a_round_transition_never_reports_spurious_pellet_eats() {
        let mut snap_prev = sample_snapshot();
        let mut snap_curr = sample_snapshot();
        snap_prev.round = 1;
        snap_curr.round = 2;
        snap_prev.pellets = vec![false; 4];
        snap_curr.pellets = vec![true; 4];
        let delta = diff(&snap_prev, &snap_curr, BOARD_WIDTH);
        assert!(delta.pellets_eaten.is_empty());
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            tick: 0,
            round: 1,
            score: 0,
            lives: 3,
            pacman: PacmanView { x: 14, y: 23, progress: 0.0, dir: Direction::Left },
            ghosts: std::array::from_fn(|i| GhostView {
                id: GhostId::ALL[i],
                x: 13,
                y: 11,
                progress: 0.0,
                dir: Direction::Up,
                mode: GhostMode::Scatter,
            }),
            pellets: Vec::new(),
            power_pellets: Vec::new(),
            power_active: false,
            power_time_remaining: 0,
            fruit: None,
            game_over: false,
            state_hash: String::new(),
        }
    }
}
