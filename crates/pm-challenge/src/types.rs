use pm_core::Direction;
use pm_core::Tier;
use pm_ext::AgentAddress;
use pm_ext::Side;
use pm_maze::MazeVariant;

/// Marker type; never constructed. `ChallengeId` is `ID<Challenge>`.
pub struct Challenge;
pub type ChallengeId = pm_core::ID<Challenge>;

/// Server-controlled ghosts have no real ledger address; this fixed handle
/// is the `agentB` side whenever a challenge opens a betting window.
pub fn ghost_agent() -> AgentAddress {
    AgentAddress("house-ghosts".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Pacman,
    Ghost,
}

impl Winner {
    /// Bet-settlement mapping from §4.6: `pacman → agentA`, `ghost → agentB`.
    pub fn side(self) -> Side {
        match self {
            Winner::Pacman => Side::AgentA,
            Winner::Ghost => Side::AgentB,
        }
    }
    pub fn as_str(self) -> &'static str {
        match self {
            Winner::Pacman => "pacman",
            Winner::Ghost => "ghost",
        }
    }
}

/// What the final snapshot (or a forced timeout/disconnect) resolved to.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub winner: Winner,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    WaitingAgent,
    Betting,
    Countdown,
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone)]
pub struct CreateChallengeParams {
    pub agent: AgentAddress,
    pub variant: MazeVariant,
    pub tier: Tier,
    pub seed: u64,
}

pub enum Command {
    Connect,
    Disconnect,
    Reconnect,
    Input(Option<Direction>),
}
