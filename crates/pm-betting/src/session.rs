use crate::state::Phase;
use crate::state::Pool;
use pm_core::MatchId;
use pm_ext::LedgerClient;
use pm_ext::MessageBus;
use pm_ext::Side;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::oneshot;

/// What the manager keeps per open match. The pool is shared with the
/// window task below so `record_bet` never has to go through a channel.
pub struct BettingHandle {
    pub room: String,
    pub pool: Arc<Mutex<Pool>>,
    /// Firing this asks the window task to stop without taking the lock
    /// transition itself; used when a caller locks or removes a session
    /// ahead of its natural expiry.
    pub cancel: Option<oneshot::Sender<()>>,
}

/// Spawns the task that owns one match's betting window: broadcasts
/// `odds_update` on [`pm_core::constants::ODDS_BROADCAST_INTERVAL`] and
/// locks the pool when `window` elapses (§4.5). Mirrors the session
/// driver's one-task-per-entity shape.
pub fn spawn_window(
    match_id: MatchId,
    room: String,
    pool: Arc<Mutex<Pool>>,
    window: std::time::Duration,
    ledger: Arc<dyn LedgerClient>,
    bus: Arc<dyn MessageBus>,
) -> oneshot::Sender<()> {
    let (cancel_tx, mut cancel_rx) = oneshot::channel();
    tokio::spawn(async move {
        let deadline = tokio::time::Instant::now() + window;
        let mut odds_timer = tokio::time::interval(pm_core::constants::ODDS_BROADCAST_INTERVAL);
        odds_timer.tick().await; // first tick fires immediately; the open event already carries odds
        loop {
            tokio::select! {
                _ = &mut cancel_rx => {
                    log::debug!("[pm_betting::session] window for {match_id} canceled");
                    return;
                }
                _ = tokio::time::sleep_until(deadline) => {
                    do_lock(match_id, &room, &pool, &ledger, &bus).await;
                    return;
                }
                _ = odds_timer.tick() => {
                    broadcast_odds(match_id, &room, &pool, &bus).await;
                }
            }
        }
    });
    cancel_tx
}

/// Transitions `pool` from `Open` to `Locked` and tells the ledger, idempotent
/// on phase so the window task and a manual `lock_bets` call can race safely.
/// Ledger failure is logged but does not prevent the in-memory lock (§4.5).
pub async fn do_lock(match_id: MatchId, room: &str, pool: &Arc<Mutex<Pool>>, ledger: &Arc<dyn LedgerClient>, bus: &Arc<dyn MessageBus>) {
    let total = {
        let mut guard = pool.lock().await;
        if guard.phase != Phase::Open {
            return;
        }
        guard.phase = Phase::Locked;
        guard.total()
    };
    if let Err(err) = ledger.lock_bets(match_id).await {
        log::warn!("[pm_betting::session] ledger lock_bets failed for {match_id}: {err}");
    }
    bus.broadcast(
        room,
        "bets_locked",
        serde_json::json!({ "matchId": match_id.to_string(), "totalPool": total }),
    )
    .await;
}

async fn broadcast_odds(match_id: MatchId, room: &str, pool: &Arc<Mutex<Pool>>, bus: &Arc<dyn MessageBus>) {
    let (odds_a, odds_b, total) = {
        let guard = pool.lock().await;
        let (odds_a, odds_b) = guard.odds();
        (odds_a, odds_b, guard.total())
    };
    bus.broadcast(
        room,
        "odds_update",
        serde_json::json!({ "matchId": match_id.to_string(), "oddsA": odds_a, "oddsB": odds_b, "totalPool": total }),
    )
    .await;
}

/// Winner-side wire string for the `bets_settled` event. Deliberately not
/// `Side`'s own derive, which would emit `"AgentA"`/`"AgentB"`.
pub fn winner_field(side: Side) -> &'static str {
    match side {
        Side::AgentA => "agentA",
        Side::AgentB => "agentB",
    }
}
