//! Maze layouts for the engine (§4.1): four fixed variants, one seeded
//! procedural generator, and a memoizing cache in front of both.
mod cache;
mod fixed;
mod grid;
mod maze;
mod pellets;
mod procedural;
mod variant;

pub use cache::MazeCache;
pub use maze::Maze;
pub use variant::MazeVariant;
