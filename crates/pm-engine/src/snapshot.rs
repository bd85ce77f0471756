use pm_core::Direction;
use pm_core::GhostId;
use pm_core::GhostMode;
use serde::Deserialize;
use serde::Serialize;

/// Pac-Man's public-facing moving-parts state, as carried on a [`Snapshot`]
/// or a delta frame's `pacman` field (§6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacmanView {
    pub x: i32,
    pub y: i32,
    pub progress: f32,
    pub dir: Direction,
}

/// One ghost's public-facing state, as carried on a [`Snapshot`] or in a
/// delta frame's `ghosts[]` field (§6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostView {
    pub id: GhostId,
    pub x: i32,
    pub y: i32,
    pub progress: f32,
    pub dir: Direction,
    pub mode: GhostMode,
}

/// A fruit currently on the board, as carried on a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitView {
    pub x: i32,
    pub y: i32,
    pub points: u32,
}

/// An immutable value describing engine state at one tick (§3, §4.2). The
/// engine hands these out by value; nothing outside the engine ever
/// observes or mutates the fields backing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tick: u64,
    pub round: u32,
    pub score: u32,
    pub lives: u8,
    pub pacman: PacmanView,
    pub ghosts: [GhostView; 4],
    /// Row-major pellet bitmap, `true` where a normal pellet remains.
    pub pellets: Vec<bool>,
    pub power_pellets: Vec<(i32, i32)>,
    pub power_active: bool,
    pub power_time_remaining: u32,
    pub fruit: Option<FruitView>,
    pub game_over: bool,
    /// Hex-encoded `keccak256` replay fingerprint (§4.2 step 11, §6).
    pub state_hash: String,
}

impl Snapshot {
    pub fn remaining_pellets(&self) -> usize {
        self.pellets.iter().filter(|p| **p).count() + self.power_pellets.len()
    }
}
