use crate::grid::GridBuilder;
use crate::grid::idx;
use crate::grid::in_bounds;
use crate::grid::in_ghost_house;
use crate::variant::MazeVariant;
use crate::{fixed, pellets, procedural};
use pm_core::GRID_H;
use pm_core::GRID_W;
use pm_core::GhostId;
use pm_core::PACMAN_SPAWN;
use pm_core::TUNNEL_ROW;

/// Fixed interior spawn points for the four ghosts, all inside the
/// reserved ghost house.
const GHOST_SPAWNS: [(GhostId, (i32, i32)); 4] = [
    (GhostId::Blinky, (13, 13)),
    (GhostId::Pinky, (14, 13)),
    (GhostId::Inky, (13, 14)),
    (GhostId::Clyde, (14, 14)),
];

/// An immutable 28x31 layout: walls, the initial pellet bitmap, power
/// pellet positions, and the Pac-Man and ghost spawns. Everything here is
/// fully determined by `(variant, seed)` — see [`crate::cache`] for the
/// memoizing entry point most callers should use instead of [`Maze::build`]
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    variant: MazeVariant,
    seed: u64,
    walls: Vec<bool>,
    pellets: Vec<bool>,
    power_pellets: Vec<(i32, i32)>,
}

impl Maze {
    /// Builds a maze for `variant` and `seed`. Fixed variants ignore the
    /// seed; `Random` derives the entire layout from it. Never fails: an
    /// unknown variant is rejected earlier, at [`MazeVariant::from_str`].
    pub fn build(variant: MazeVariant, seed: u64) -> Self {
        let builder: GridBuilder = match variant {
            MazeVariant::Random => procedural::build(seed),
            fixed_variant => fixed::build(fixed_variant),
        };
        let (pellets, power_pellets) = pellets::place(&builder);
        log::debug!(
            "[maze] built {variant} seed={seed}: {} pellets, {} power pellets",
            pellets.iter().filter(|p| **p).count(),
            power_pellets.len()
        );
        Self {
            variant,
            seed,
            walls: builder.walls,
            pellets,
            power_pellets,
        }
    }

    pub fn variant(&self) -> MazeVariant {
        self.variant
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> usize {
        GRID_W
    }

    pub fn height(&self) -> usize {
        GRID_H
    }

    /// Out-of-range is a wall, except at row [`TUNNEL_ROW`] where both
    /// horizontal tunnel ends wrap around instead.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        if in_bounds(x, y) {
            return self.walls[idx(x, y)];
        }
        let tunnel_wraparound = y == TUNNEL_ROW as i32 && (x < 0 || x >= GRID_W as i32);
        !tunnel_wraparound
    }

    /// True for the horizontal corridor at row [`TUNNEL_ROW`] outside the
    /// ghost house, including the wraparound exits.
    pub fn is_tunnel(&self, x: i32, y: i32) -> bool {
        if !in_bounds(x, y) {
            return y == TUNNEL_ROW as i32;
        }
        y == TUNNEL_ROW as i32 && !in_ghost_house(x, y)
    }

    pub fn is_ghost_house(&self, x: i32, y: i32) -> bool {
        in_bounds(x, y) && in_ghost_house(x, y)
    }

    pub fn spawn_for_pacman(&self) -> (i32, i32) {
        PACMAN_SPAWN
    }

    pub fn spawns_for_ghosts(&self) -> [(GhostId, (i32, i32)); 4] {
        GHOST_SPAWNS
    }

    pub fn spawn_for_ghost(&self, id: GhostId) -> (i32, i32) {
        GHOST_SPAWNS
            .iter()
            .find(|(g, _)| *g == id)
            .map(|(_, pos)| *pos)
            .expect("GHOST_SPAWNS covers every GhostId")
    }

    /// Whether the initial layout placed a normal pellet at `(x, y)`. The
    /// engine copies this into its own mutable bitmap at round start; the
    /// maze itself never loses a pellet.
    pub fn pellet_at(&self, x: i32, y: i32) -> bool {
        in_bounds(x, y) && self.pellets[idx(x, y)]
    }

    pub fn power_pellets(&self) -> &[(i32, i32)] {
        &self.power_pellets
    }

    /// Count of normal pellets in the initial layout.
    pub fn remaining_pellets(&self) -> usize {
        self.pellets.iter().filter(|p| **p).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_never_reaches_build() {
        // MazeVariant::from_str rejects unknown names before construction;
        // Maze::build itself cannot fail for any variant it's given.
        for variant in MazeVariant::ALL {
            let _ = Maze::build(variant, 42);
        }
    }

    #[test]
    fn tunnel_wraps_at_row_14_only() {
        let maze = Maze::build(MazeVariant::Classic, 1);
        assert!(!maze.is_wall(-1, TUNNEL_ROW as i32));
        assert!(!maze.is_wall(GRID_W as i32, TUNNEL_ROW as i32));
        assert!(maze.is_wall(-1, 0));
        assert!(maze.is_wall(GRID_W as i32, 5));
    }

    #[test]
    fn pacman_spawn_is_always_open() {
        for variant in MazeVariant::ALL {
            let maze = Maze::build(variant, 7);
            let (x, y) = maze.spawn_for_pacman();
            assert!(!maze.is_wall(x, y), "{variant} walls its own spawn");
        }
    }

    #[test]
    fn ghost_spawns_sit_inside_the_house() {
        let maze = Maze::build(MazeVariant::Labyrinth, 3);
        for (id, (x, y)) in maze.spawns_for_ghosts() {
            assert!(maze.is_ghost_house(x, y), "{id} spawn not inside house");
        }
    }

    #[test]
    fn same_variant_and_seed_is_deterministic() {
        let a = Maze::build(MazeVariant::Random, 555);
        let b = Maze::build(MazeVariant::Random, 555);
        assert_eq!(a, b);
    }
}
