use serde::Deserialize;
use serde::Serialize;

/// Opaque textual summary of engine state handed to the advisor. The core
/// never constructs or parses a richer shape than this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary(pub String);

/// One suggested target tile per ghost, keyed by [`pm_core::GhostId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GhostTargets(pub Vec<((i32, i32), pm_core::GhostId)>);

/// The LLM advisor used by high-tier ghost AI. The canonical engine (§4.2)
/// never calls this itself — the baseline is the random-with-no-reverse
/// rule — but a hosting layer may consult it before feeding a suggested
/// target into a higher-tier ghost personality.
#[async_trait::async_trait]
pub trait GhostAdvisor: Send + Sync {
    async fn suggest(&self, state: StateSummary) -> anyhow::Result<GhostTargets>;
}
