use crate::session;
use crate::session::BettingHandle;
use crate::state::Phase;
use crate::state::Pool;
use pm_core::CoreError;
use pm_core::MatchId;
use pm_core::Wei;
use pm_core::constants::BET_WINDOW_SECONDS_MAX;
use pm_core::constants::BET_WINDOW_SECONDS_MIN;
use pm_core::constants::MAX_BET_WEI;
use pm_core::constants::MIN_BET_WEI;
use pm_ext::AgentAddress;
use pm_ext::LedgerClient;
use pm_ext::MessageBus;
use pm_ext::Side;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// Owns every open betting window in the process, one per [`MatchId`].
/// Grounded on the teacher's `Casino`: a `RwLock<HashMap<_, _>>` of handles,
/// each backed by a task spawned at open time (§4.5).
pub struct BettingManager {
    ledger: Arc<dyn LedgerClient>,
    bus: Arc<dyn MessageBus>,
    sessions: RwLock<HashMap<MatchId, BettingHandle>>,
}

impl BettingManager {
    pub fn new(ledger: Arc<dyn LedgerClient>, bus: Arc<dyn MessageBus>) -> Arc<Self> {
        Arc::new(Self { ledger, bus, sessions: RwLock::new(HashMap::new()) })
    }

    /// Opens a window for `match_id`. `window_seconds`, when absent, is
    /// drawn uniformly from `[BET_WINDOW_SECONDS_MIN, BET_WINDOW_SECONDS_MAX]`
    /// (§4.5); this pick has no bearing on engine replay state, so it is the
    /// one place in the workspace allowed to use `rand::rng()` directly.
    pub async fn open_betting_window(
        self: &Arc<Self>,
        match_id: MatchId,
        agent_a: AgentAddress,
        agent_b: AgentAddress,
        window_seconds: Option<u64>,
    ) -> Result<(), CoreError> {
        let _ = (&agent_a, &agent_b); // accepted for symmetry with the ledger's own match record; not consulted here
        {
            let sessions = self.sessions.read().await;
            if sessions.contains_key(&match_id) {
                return Err(CoreError::invalid_argument(format!("betting window already open for {match_id}")));
            }
        }
        let seconds = window_seconds.unwrap_or_else(|| rand::rng().random_range(BET_WINDOW_SECONDS_MIN..=BET_WINDOW_SECONDS_MAX));
        if !(BET_WINDOW_SECONDS_MIN..=BET_WINDOW_SECONDS_MAX).contains(&seconds) {
            return Err(CoreError::invalid_argument(format!(
                "window of {seconds}s outside [{BET_WINDOW_SECONDS_MIN}, {BET_WINDOW_SECONDS_MAX}]"
            )));
        }
        let room = format!("betting:{match_id}");
        let pool = Arc::new(Mutex::new(Pool::new()));
        let cancel = session::spawn_window(
            match_id,
            room.clone(),
            pool.clone(),
            std::time::Duration::from_secs(seconds),
            self.ledger.clone(),
            self.bus.clone(),
        );
        self.bus
            .broadcast(&room, "betting_open", serde_json::json!({ "matchId": match_id.to_string(), "windowSeconds": seconds }))
            .await;
        self.sessions.write().await.insert(match_id, BettingHandle { room, pool, cancel: Some(cancel) });
        log::info!("[pm_betting::manager] opened betting window for {match_id} ({seconds}s)");
        Ok(())
    }

    /// Records a bet. Out-of-range amounts are rejected; bets against a pool
    /// that is no longer `Open` are silently ignored (§4.5), matching the
    /// "too late" UX of a real pari-mutuel window rather than erroring.
    pub async fn record_bet(&self, match_id: MatchId, side: Side, amount: Wei) -> Result<(), CoreError> {
        if amount < Wei::from_u128(MIN_BET_WEI) || amount > Wei::from_u128(MAX_BET_WEI) {
            return Err(CoreError::invalid_argument(format!("bet of {amount} outside the allowed range")));
        }
        let sessions = self.sessions.read().await;
        let handle = sessions.get(&match_id).ok_or(CoreError::SessionNotFound)?;
        let room = handle.room.clone();
        let (odds_a, odds_b, total) = {
            let mut pool = handle.pool.lock().await;
            if pool.phase != Phase::Open {
                return Ok(());
            }
            pool.record(side, amount.clone());
            let (odds_a, odds_b) = pool.odds();
            (odds_a, odds_b, pool.total())
        };
        self.bus
            .broadcast(
                &room,
                "bet_placed",
                serde_json::json!({
                    "matchId": match_id.to_string(),
                    "side": session::winner_field(side),
                    "amount": amount,
                    "oddsA": odds_a,
                    "oddsB": odds_b,
                    "totalPool": total,
                }),
            )
            .await;
        Ok(())
    }

    /// Manually locks a window ahead of its natural expiry: cancels the
    /// window task, then runs the exact same transition the task's own
    /// timer would have run, so the locking logic has one implementation
    /// regardless of trigger (§4.5).
    pub async fn lock_bets(&self, match_id: MatchId) -> Result<(), CoreError> {
        let (room, pool) = {
            let mut sessions = self.sessions.write().await;
            let handle = sessions.get_mut(&match_id).ok_or(CoreError::SessionNotFound)?;
            if let Some(cancel) = handle.cancel.take() {
                let _ = cancel.send(());
            }
            (handle.room.clone(), handle.pool.clone())
        };
        session::do_lock(match_id, &room, &pool, &self.ledger, &self.bus).await;
        Ok(())
    }

    /// Settles a match. Locks first, defensively, if the result arrives
    /// while the window is still nominally open: a tick-accurate match
    /// typically runs far longer than a 30-60s betting window, but nothing
    /// forbids a faster finish.
    pub async fn settle_bets(&self, match_id: MatchId, winner: Side) -> Result<(), CoreError> {
        self.lock_bets(match_id).await?;
        let (room, total) = {
            let sessions = self.sessions.read().await;
            let handle = sessions.get(&match_id).ok_or(CoreError::SessionNotFound)?;
            let mut pool = handle.pool.lock().await;
            pool.phase = Phase::Settled;
            (handle.room.clone(), pool.total())
        };
        self.ledger
            .settle_bets(match_id, winner)
            .await
            .map_err(|err| CoreError::LedgerFailure(err.to_string()))?;
        self.bus
            .broadcast(
                &room,
                "bets_settled",
                serde_json::json!({
                    "matchId": match_id.to_string(),
                    "winner": session::winner_field(winner),
                    "totalPool": total,
                }),
            )
            .await;
        self.sessions.write().await.remove(&match_id);
        Ok(())
    }

    pub async fn active_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Cancels every outstanding window task without settling; used on
    /// process shutdown.
    pub async fn shutdown(&self) {
        let mut sessions = self.sessions.write().await;
        for (_, handle) in sessions.iter_mut() {
            if let Some(cancel) = handle.cancel.take() {
                let _ = cancel.send(());
            }
        }
        sessions.clear();
    }
}
