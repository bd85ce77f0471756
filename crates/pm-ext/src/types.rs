use pm_core::Tier;
use pm_core::Wei;
use serde::Deserialize;
use serde::Serialize;

/// A registered agent's on-chain address. Opaque to the core; it is never
/// parsed, only compared and forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentAddress(pub String);

impl std::fmt::Display for AgentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the ledger knows about one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub owner: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub reputation: i64,
    pub active: bool,
}

/// The id the ledger assigns a tournament once `createTournament` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OnchainTournamentId(pub u64);

impl std::fmt::Display for OnchainTournamentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "onchain-tournament-{}", self.0)
    }
}

/// Which side of a two-agent match a ledger call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    AgentA,
    AgentB,
}

impl Side {
    /// The ledger's fixed encoding: agentA=0, agentB=1.
    pub fn code(&self) -> u8 {
        match self {
            Side::AgentA => 0,
            Side::AgentB => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::AgentA => write!(f, "agentA"),
            Side::AgentB => write!(f, "agentB"),
        }
    }
}

/// The payload `submitResult` takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResultSubmission {
    pub match_id: pm_core::MatchId,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Side,
    pub replay_uri: String,
}

/// A played match's outcome, as returned by the job system (§4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: pm_core::MatchId,
    pub score_a: u32,
    pub score_b: u32,
    pub replay_bytes: Vec<u8>,
    pub state_hash: [u8; 32],
}

impl MatchResult {
    pub fn winner(&self) -> Side {
        if self.score_a >= self.score_b {
            Side::AgentA
        } else {
            Side::AgentB
        }
    }
}

/// Everything an agent-run worker needs to play one match (§4.4 "Round start").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchJob {
    pub match_id: pm_core::MatchId,
    pub agent_a: AgentAddress,
    pub agent_b: AgentAddress,
    pub variant: String,
    pub seed: u64,
    pub tier: Tier,
    pub tournament_id: OnchainTournamentId,
    pub round: u32,
}

/// A pending on-chain receipt, opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt(pub String);

/// A wagering-side amount pair, used when a ledger call needs both totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolTotals {
    pub side_a: Wei,
    pub side_b: Wei,
}
