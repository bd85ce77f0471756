//! In-memory fakes of the external collaborator traits, for scenario tests
//! that want to assert on call sequences without a real ledger, bus, job
//! queue, or blob store (§8 expansion).
use crate::advisor::GhostAdvisor;
use crate::advisor::GhostTargets;
use crate::advisor::StateSummary;
use crate::blob::BlobStore;
use crate::bus::MessageBus;
use crate::ledger::LedgerClient;
use crate::scheduler::JobHandle;
use crate::scheduler::JobScheduler;
use crate::types::AgentAddress;
use crate::types::AgentInfo;
use crate::types::MatchJob;
use crate::types::MatchResultSubmission;
use crate::types::OnchainTournamentId;
use crate::types::Receipt;
use crate::types::Side;
use pm_core::MatchId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// A single recorded call, rendered as a short human-readable line so tests
/// can assert on call order with simple string comparisons.
pub type CallLog = Mutex<Vec<String>>;

#[derive(Default)]
pub struct FakeLedger {
    pub calls: CallLog,
    pub agents: Mutex<HashMap<AgentAddress, AgentInfo>>,
    next_tournament_id: AtomicU64,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn seed_agent(&self, addr: AgentAddress, info: AgentInfo) {
        self.agents.lock().unwrap().insert(addr, info);
    }
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
    fn record(&self, line: impl Into<String>) {
        self.calls.lock().unwrap().push(line.into());
    }
}

#[async_trait::async_trait]
impl LedgerClient for FakeLedger {
    async fn get_active_agents(&self) -> anyhow::Result<Vec<AgentAddress>> {
        Ok(self.agents.lock().unwrap().keys().cloned().collect())
    }
    async fn get_agent_info(&self, addr: &AgentAddress) -> anyhow::Result<AgentInfo> {
        self.agents
            .lock()
            .unwrap()
            .get(addr)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown agent {addr}"))
    }
    async fn create_tournament(
        &self,
        participants: &[AgentAddress],
        size: usize,
    ) -> anyhow::Result<OnchainTournamentId> {
        self.record(format!(
            "create_tournament({:?}, {})",
            participants.iter().map(|a| a.0.clone()).collect::<Vec<_>>(),
            size
        ));
        let id = self.next_tournament_id.fetch_add(1, Ordering::SeqCst);
        Ok(OnchainTournamentId(id))
    }
    async fn advance_tournament(
        &self,
        id: OnchainTournamentId,
        winners: &[AgentAddress],
    ) -> anyhow::Result<()> {
        self.record(format!(
            "advance_tournament({}, {:?})",
            id,
            winners.iter().map(|a| a.0.clone()).collect::<Vec<_>>()
        ));
        Ok(())
    }
    async fn finalize_tournament(
        &self,
        id: OnchainTournamentId,
        champion: &AgentAddress,
    ) -> anyhow::Result<()> {
        self.record(format!("finalize_tournament({id}, {champion})"));
        Ok(())
    }
    async fn lock_bets(&self, match_id: MatchId) -> anyhow::Result<()> {
        self.record(format!("lock_bets({match_id})"));
        Ok(())
    }
    async fn settle_bets(&self, match_id: MatchId, winner: Side) -> anyhow::Result<()> {
        self.record(format!("settle_bets({match_id}, {})", winner.code()));
        Ok(())
    }
    async fn submit_result(&self, result: MatchResultSubmission) -> anyhow::Result<Receipt> {
        self.record(format!(
            "submit_result({}, {}-{}, {})",
            result.match_id, result.score_a, result.score_b, result.winner
        ));
        Ok(Receipt(format!("receipt-{}", result.match_id)))
    }
}

#[derive(Default)]
pub struct FakeBus {
    pub events: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn events_for(&self, room: &str) -> Vec<(String, serde_json::Value)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _, _)| r == room)
            .map(|(_, e, p)| (e.clone(), p.clone()))
            .collect()
    }
}

#[async_trait::async_trait]
impl MessageBus for FakeBus {
    async fn broadcast(&self, room: &str, event: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push((room.to_string(), event.to_string(), payload));
    }
    async fn join(&self, _conn: &str, _room: &str) {}
    async fn leave(&self, _conn: &str, _room: &str) {}
}

#[derive(Default)]
pub struct FakeScheduler {
    pub scheduled: Mutex<Vec<MatchJob>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl JobScheduler for FakeScheduler {
    async fn schedule(&self, job: MatchJob) -> anyhow::Result<JobHandle> {
        self.scheduled.lock().unwrap().push(job);
        let (_tx, rx) = tokio::sync::oneshot::channel();
        // The fake never completes jobs on its own; tests drive completion
        // explicitly by constructing their own sender where needed. Callers
        // that need an auto-resolving handle should use
        // `FakeScheduler::schedule_with_result` instead.
        Ok(rx)
    }
}

impl FakeScheduler {
    /// Schedules `job` and immediately resolves the handle with `result`,
    /// for tests that don't care about job-queue latency.
    pub fn schedule_with_result(
        &self,
        job: MatchJob,
        result: crate::types::MatchResult,
    ) -> JobHandle {
        self.scheduled.lock().unwrap().push(job);
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _ = tx.send(result);
        rx
    }
}

#[derive(Default)]
pub struct FakeBlobStore {
    pub uploads: Mutex<Vec<Vec<u8>>>,
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlobStore for FakeBlobStore {
    async fn put(&self, bytes: &[u8]) -> anyhow::Result<String> {
        let idx = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(bytes.to_vec());
            uploads.len() - 1
        };
        Ok(format!("blob://replays/{idx}"))
    }
}

#[derive(Default)]
pub struct NullAdvisor;

#[async_trait::async_trait]
impl GhostAdvisor for NullAdvisor {
    async fn suggest(&self, _state: StateSummary) -> anyhow::Result<GhostTargets> {
        Ok(GhostTargets::default())
    }
}
