use pm_core::FRUIT_LIFETIME_TICKS;
use pm_core::FRUIT_POSITION;

/// A bonus fruit sitting on the board, counting down to expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fruit {
    pub x: i32,
    pub y: i32,
    pub points: u32,
    pub ticks_remaining: u32,
}

impl Fruit {
    pub fn spawn(points: u32) -> Self {
        Self {
            x: FRUIT_POSITION.0,
            y: FRUIT_POSITION.1,
            points,
            ticks_remaining: FRUIT_LIFETIME_TICKS,
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
