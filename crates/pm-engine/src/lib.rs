//! The tick-accurate, deterministic Pac-Man match engine (§4.2).
//!
//! [`Engine`] owns one match exclusively and advances it one [`Snapshot`]
//! per call to [`Engine::tick`]; nothing here touches the network, a clock,
//! or any RNG other than the one seeded into the engine itself.
mod engine;
mod fruit;
mod ghost;
mod hash;
mod movement;
mod pacman;
mod snapshot;

pub use engine::Engine;
pub use snapshot::FruitView;
pub use snapshot::GhostView;
pub use snapshot::PacmanView;
pub use snapshot::Snapshot;
