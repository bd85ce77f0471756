//! Trait surface for every external collaborator the core consumes: the
//! on-chain ledger, the real-time message bus, the durable job scheduler,
//! replay blob storage, and the optional LLM ghost advisor. Nothing in this
//! crate implements any of them — that's deliberately left to a hosting
//! layer the core never depends on.

mod advisor;
mod blob;
mod bus;
mod ledger;
mod scheduler;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod fakes;

pub use advisor::GhostAdvisor;
pub use advisor::GhostTargets;
pub use advisor::StateSummary;
pub use blob::BlobStore;
pub use bus::MessageBus;
pub use ledger::LedgerClient;
pub use scheduler::JobHandle;
pub use scheduler::JobScheduler;
pub use types::AgentAddress;
pub use types::AgentInfo;
pub use types::MatchJob;
pub use types::MatchResult;
pub use types::MatchResultSubmission;
pub use types::OnchainTournamentId;
pub use types::PoolTotals;
pub use types::Receipt;
pub use types::Side;
