use crate::driver;
use crate::handle;
use crate::handle::ChallengeHandle;
use crate::registry::GameOverRegistry;
use crate::types::ChallengeId;
use crate::types::Command;
use crate::types::CreateChallengeParams;
use crate::types::Status;
use pm_betting::BettingManager;
use pm_core::CoreError;
use pm_core::Direction;
use pm_core::MatchId;
use pm_core::constants::CHALLENGE_MAX_CONCURRENT;
use pm_ext::MessageBus;
use pm_session::SessionManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;
use tokio::sync::Semaphore;

/// Owns one-agent-versus-the-house challenge matches: bounded concurrency,
/// one driver task per challenge, an internal [`SessionManager`] no other
/// crate shares (§4.6). Grounded on [`pm_tournament::TournamentManager`]'s
/// shape, scaled down to a flat command channel per entity instead of a
/// bracket.
pub struct ChallengeManager {
    sessions: Arc<SessionManager>,
    betting: Option<Arc<BettingManager>>,
    bus: Arc<dyn MessageBus>,
    registry: Arc<GameOverRegistry>,
    concurrency: Arc<Semaphore>,
    next_match_id: AtomicU64,
    handles: RwLock<HashMap<ChallengeId, ChallengeHandle>>,
}

impl ChallengeManager {
    pub fn new(bus: Arc<dyn MessageBus>, betting: Option<Arc<BettingManager>>) -> Arc<Self> {
        Self::with_tick_period(bus, betting, pm_core::constants::TICK_PERIOD)
    }

    /// Same as [`Self::new`], but the internal [`SessionManager`] ticks at
    /// `tick_period` instead of the fixed 60 Hz constant (§1 EXPANSION).
    pub fn with_tick_period(bus: Arc<dyn MessageBus>, betting: Option<Arc<BettingManager>>, tick_period: std::time::Duration) -> Arc<Self> {
        let sessions = SessionManager::with_tick_period(bus.clone(), tick_period);
        let registry = Arc::new(GameOverRegistry::new());
        let registry_for_callback = registry.clone();
        sessions.set_on_game_over(move |id, reason, snapshot| {
            registry_for_callback.fire(id, reason, snapshot);
        });
        Arc::new(Self {
            sessions,
            betting,
            bus,
            registry,
            concurrency: Arc::new(Semaphore::new(CHALLENGE_MAX_CONCURRENT)),
            next_match_id: AtomicU64::new(0),
            handles: RwLock::new(HashMap::new()),
        })
    }

    /// Admits a new challenge if a concurrency slot is free, and spawns its
    /// driver task. Rejects outright rather than queuing: §4.6 bounds
    /// concurrent challenges, it does not say callers should wait for one.
    pub async fn create_challenge(self: &Arc<Self>, params: CreateChallengeParams) -> Result<ChallengeId, CoreError> {
        let permit = self
            .concurrency
            .clone()
            .try_acquire_owned()
            .map_err(|_| CoreError::invalid_argument("too many concurrent challenges"))?;

        let id = ChallengeId::default();
        let match_id = MatchId(self.next_match_id.fetch_add(1, Ordering::SeqCst));
        let (challenge_handle, driver_channels) = handle::pair(Status::WaitingAgent);
        self.handles.write().await.insert(id, challenge_handle);

        let manager = self.clone();
        tokio::spawn(async move {
            driver::run(
                id,
                match_id,
                params,
                driver_channels,
                permit,
                manager.sessions.clone(),
                manager.betting.clone(),
                manager.bus.clone(),
                manager.registry.clone(),
            )
            .await;
            manager.handles.write().await.remove(&id);
            log::info!("[pm_challenge::manager] challenge {id} retired");
        });

        log::info!("[pm_challenge::manager] created challenge {id} as match {match_id}");
        Ok(id)
    }

    pub async fn connect(&self, id: ChallengeId) -> Result<(), CoreError> {
        self.send(id, Command::Connect).await
    }

    pub async fn disconnect(&self, id: ChallengeId) -> Result<(), CoreError> {
        self.send(id, Command::Disconnect).await
    }

    pub async fn reconnect(&self, id: ChallengeId) -> Result<(), CoreError> {
        self.send(id, Command::Reconnect).await
    }

    pub async fn queue_input(&self, id: ChallengeId, direction: Option<Direction>) -> Result<(), CoreError> {
        self.send(id, Command::Input(direction)).await
    }

    pub async fn status(&self, id: ChallengeId) -> Result<Status, CoreError> {
        let handles = self.handles.read().await;
        let handle = handles.get(&id).ok_or(CoreError::SessionNotFound)?;
        Ok(*handle.status.borrow())
    }

    pub async fn active_challenge_count(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn shutdown(&self) {
        self.handles.write().await.clear();
    }

    async fn send(&self, id: ChallengeId, command: Command) -> Result<(), CoreError> {
        let handles = self.handles.read().await;
        let handle = handles.get(&id).ok_or(CoreError::SessionNotFound)?;
        let _ = handle.commands.send(command);
        Ok(())
    }
}
