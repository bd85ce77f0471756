use crate::types::AgentAddress;
use crate::types::AgentInfo;
use crate::types::MatchResultSubmission;
use crate::types::OnchainTournamentId;
use crate::types::Receipt;
use crate::types::Side;
use pm_core::MatchId;

/// The on-chain ledger, named only by the fixed function surface in §6.
/// The core treats it as an opaque transaction submitter: every call may
/// fail and every failure is retried by the caller with bounded backoff,
/// never inside this trait.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_active_agents(&self) -> anyhow::Result<Vec<AgentAddress>>;
    async fn get_agent_info(&self, addr: &AgentAddress) -> anyhow::Result<AgentInfo>;
    async fn create_tournament(
        &self,
        participants: &[AgentAddress],
        size: usize,
    ) -> anyhow::Result<OnchainTournamentId>;
    async fn advance_tournament(
        &self,
        id: OnchainTournamentId,
        winners: &[AgentAddress],
    ) -> anyhow::Result<()>;
    async fn finalize_tournament(
        &self,
        id: OnchainTournamentId,
        champion: &AgentAddress,
    ) -> anyhow::Result<()>;
    async fn lock_bets(&self, match_id: MatchId) -> anyhow::Result<()>;
    async fn settle_bets(&self, match_id: MatchId, winner: Side) -> anyhow::Result<()>;
    async fn submit_result(&self, result: MatchResultSubmission) -> anyhow::Result<Receipt>;
}
