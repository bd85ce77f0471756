use pm_core::Tier;
use pm_ext::AgentAddress;
use pm_maze::MazeVariant;

/// Marker type for [`pm_core::ID`]; a session id carries no payload of its
/// own, it just keys the session map.
pub struct Session;

pub type SessionId = pm_core::ID<Session>;

/// Which lifecycle and fan-out rules a session follows. The engine itself
/// is identical across kinds; this only labels the room prefix and gives
/// orchestration crates something to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Tournament,
    Challenge,
    Survival,
}

impl SessionKind {
    /// The room prefix a session of this kind publishes under, `<kind>:<id>` (§4.3).
    pub fn room_prefix(&self) -> &'static str {
        match self {
            SessionKind::Tournament => "tournament",
            SessionKind::Challenge => "challenge",
            SessionKind::Survival => "survival",
        }
    }
}

/// Parameters for [`crate::SessionManager::create_session`].
#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub id: SessionId,
    pub kind: SessionKind,
    pub variant: MazeVariant,
    pub seed: u64,
    pub tier: Tier,
    pub participants: Vec<AgentAddress>,
}

/// Why a session's terminal `game_over` event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The engine itself reported the match finished (lives exhausted).
    Cleared,
    /// An internal invariant was violated mid-tick; the session is aborted.
    EngineFault,
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOverReason::Cleared => write!(f, "cleared"),
            GameOverReason::EngineFault => write!(f, "engine_fault"),
        }
    }
}
