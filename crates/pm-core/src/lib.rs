//! Foundation types shared across the arcade backend: type-safe ids,
//! fixed constants, the tier table, directions, the error taxonomy, the
//! deterministic RNG, and wei amounts.
//!
//! Nothing in this crate touches I/O; it exists so every other crate in the
//! workspace can depend on one small, stable vocabulary instead of
//! redefining `Direction` or `CoreError` per component.
pub mod constants;
mod direction;
mod error;
mod ids;
mod rng;
mod tier;
mod wei;

pub use constants::*;
pub use direction::*;
pub use error::*;
pub use ids::*;
pub use rng::*;
pub use tier::*;
pub use wei::*;
