use pm_engine::Snapshot;
use pm_session::GameOverReason;
use pm_session::SessionId;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

pub type GameOverSignal = (GameOverReason, Snapshot);

/// Bridges [`pm_session::SessionManager`]'s single global `on_game_over`
/// callback (a plain synchronous closure, §7) back to whichever challenge
/// driver task is waiting on that session. One registry per
/// [`crate::ChallengeManager`], since that manager owns its own
/// `SessionManager` instance.
#[derive(Default)]
pub struct GameOverRegistry {
    waiters: Mutex<HashMap<SessionId, oneshot::Sender<GameOverSignal>>>,
}

impl GameOverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, id: SessionId, tx: oneshot::Sender<GameOverSignal>) {
        self.waiters.lock().unwrap().insert(id, tx);
    }

    pub fn unbind(&self, id: SessionId) {
        self.waiters.lock().unwrap().remove(&id);
    }

    pub fn fire(&self, id: SessionId, reason: GameOverReason, snapshot: &Snapshot) {
        if let Some(tx) = self.waiters.lock().unwrap().remove(&id) {
            let _ = tx.send((reason, snapshot.clone()));
        }
    }
}
