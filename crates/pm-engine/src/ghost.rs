use pm_core::Direction;
use pm_core::GhostId;
use pm_core::GhostMode;
use pm_core::Tier;
use pm_core::GHOST_BASE_SPEED;

/// One ghost's moving-parts state. The canonical engine (§4.2) dispatches
/// behavior purely on `mode`; there is no per-ghost personality table here
/// because the mandated baseline AI (random-with-no-reverse) never reads
/// a ghost's identity to pick a target, only its `mode`. `id` survives
/// purely to label the ghost in snapshots and spawn lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub id: GhostId,
    pub x: i32,
    pub y: i32,
    pub progress: f32,
    pub dir: Direction,
    pub speed: f32,
    pub mode: GhostMode,
}

impl Ghost {
    pub fn at_spawn(id: GhostId, spawn: (i32, i32), tier: Tier) -> Self {
        Self {
            id,
            x: spawn.0,
            y: spawn.1,
            progress: 0.0,
            dir: Direction::Up,
            speed: GHOST_BASE_SPEED * tier.ghost_speed_multiplier(),
            mode: GhostMode::Scatter,
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn is_at_boundary(&self) -> bool {
        self.progress < pm_core::GHOST_BOUNDARY_EPSILON
    }
}
