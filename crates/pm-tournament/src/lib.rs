//! Single-elimination bracket controller (§4.4): seeds a bracket from the
//! active agent registry, schedules each round's matches as external jobs,
//! opens a betting window per match through [`pm_betting::BettingManager`],
//! and advances winners until a champion is finalized on-chain.
mod bracket;
mod manager;
mod retry;
mod types;

pub use manager::TournamentManager;
pub use types::Pairing;
pub use types::TournamentId;
