use crate::types::MatchJob;
use crate::types::MatchResult;

/// A handle to a scheduled job. Resolves once the job system reports
/// completion; modeled as a future instead of a `schedule`/`onComplete`
/// callback pair so the caller owns the continuation explicitly (§9's
/// note against fire-and-forget promise chains).
pub type JobHandle = tokio::sync::oneshot::Receiver<MatchResult>;

/// Durable job queue for agent-run workers. The core only ever schedules;
/// it never polls or cancels a job directly, since external workers may
/// outlive this process.
#[async_trait::async_trait]
pub trait JobScheduler: Send + Sync {
    /// Enqueues `job` and returns a handle that resolves when the job
    /// system reports completion.
    async fn schedule(&self, job: MatchJob) -> anyhow::Result<JobHandle>;
}
