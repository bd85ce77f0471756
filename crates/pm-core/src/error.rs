use std::fmt;

/// The error taxonomy callers are expected to match on (§7). Anything that
/// doesn't need to be distinguished programmatically stays an
/// [`anyhow::Error`] at the call site instead of growing another variant
/// here.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Unknown maze variant, invalid tier, malformed room id, non-directional
    /// input. Boundaries log and ignore; internal callers may still choose
    /// to panic on what is really a programmer error.
    InvalidArgument(String),
    /// Tournament creation requested against too small an agent pool.
    InsufficientAgents { wanted: usize, available: usize },
    /// A ledger call exhausted its retry budget.
    LedgerFailure(String),
    /// An internal invariant was violated mid-tick.
    EngineFault(String),
    /// Input or a lookup referenced a session id nothing owns.
    SessionNotFound,
    /// A bounded wait (connect, reconnect, round supervisor) expired.
    Timeout(String),
}

impl CoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CoreError::InvalidArgument(msg.into())
    }
    pub fn engine_fault(msg: impl Into<String>) -> Self {
        CoreError::EngineFault(msg.into())
    }
    pub fn timeout(msg: impl Into<String>) -> Self {
        CoreError::Timeout(msg.into())
    }
    /// The stable kind name used in terminal events, e.g. `reason="engine_fault"`.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidArgument(_) => "invalid_argument",
            CoreError::InsufficientAgents { .. } => "insufficient_agents",
            CoreError::LedgerFailure(_) => "ledger_failure",
            CoreError::EngineFault(_) => "engine_fault",
            CoreError::SessionNotFound => "session_not_found",
            CoreError::Timeout(_) => "timeout",
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            CoreError::InsufficientAgents { wanted, available } => write!(
                f,
                "insufficient agents: wanted {wanted}, found {available}"
            ),
            CoreError::LedgerFailure(msg) => write!(f, "ledger failure: {msg}"),
            CoreError::EngineFault(msg) => write!(f, "engine fault: {msg}"),
            CoreError::SessionNotFound => write!(f, "session not found"),
            CoreError::Timeout(msg) => write!(f, "timeout: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}
