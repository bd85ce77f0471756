use pm_core::Direction;
use pm_core::PACMAN_BASE_SPEED;

/// Pac-Man's moving-parts state: tile position, sub-tile progress toward
/// the next tile, the direction actually being walked, the direction
/// queued by the last input, and current speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacman {
    pub x: i32,
    pub y: i32,
    pub progress: f32,
    pub dir: Direction,
    pub queued: Option<Direction>,
    pub speed: f32,
}

impl Pacman {
    pub fn at_spawn(spawn: (i32, i32)) -> Self {
        Self {
            x: spawn.0,
            y: spawn.1,
            progress: 0.0,
            dir: Direction::Left,
            queued: None,
            speed: PACMAN_BASE_SPEED,
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
