use pm_core::MatchId;
use pm_ext::AgentAddress;
use pm_maze::MazeVariant;

/// Marker type; never constructed. `TournamentId` is `ID<Tournament>`,
/// distinct at compile time from a session or match id.
pub struct Tournament;
pub type TournamentId = pm_core::ID<Tournament>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentStatus {
    Running,
    Failed,
}

/// One scheduled match within a round: the pairing plus the variant/seed it
/// will be played with (§4.4 round start).
#[derive(Debug, Clone)]
pub struct Pairing {
    pub match_id: MatchId,
    pub agent_a: AgentAddress,
    pub agent_b: AgentAddress,
    pub variant: MazeVariant,
    pub seed: u64,
}
