use crate::frame::Frame;
use crate::handle;
use crate::handle::Command;
use crate::handle::SessionHandle;
use crate::types::CreateSessionParams;
use crate::types::GameOverReason;
use crate::types::SessionId;
use pm_core::CoreError;
use pm_core::Direction;
use pm_engine::Engine;
use pm_engine::Snapshot;
use pm_ext::AgentAddress;
use pm_ext::MessageBus;
use pm_maze::MazeCache;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock as SyncRwLock;
use tokio::sync::RwLock;

type RoundChangeFn = dyn Fn(SessionId, u32) + Send + Sync;
type GameOverFn = dyn Fn(SessionId, GameOverReason, &Snapshot) + Send + Sync;
type FrameFn = dyn Fn(SessionId, &Frame) + Send + Sync;

/// Lifecycle callbacks a host registers once, shared by every session the
/// manager drives (§4.3). Held behind `std::sync::RwLock` rather than
/// `tokio::sync::RwLock`: registration is a plain synchronous swap, and
/// driver tasks only ever hold the read guard long enough to clone the
/// `Arc` out, never across an `.await`.
#[derive(Default)]
pub struct Callbacks {
    pub(crate) on_round_change: SyncRwLock<Option<Arc<RoundChangeFn>>>,
    pub(crate) on_game_over: SyncRwLock<Option<Arc<GameOverFn>>>,
    pub(crate) on_frame: SyncRwLock<Option<Arc<FrameFn>>>,
}

/// Hosts every live match, driving each at 60 Hz on its own task and fanning
/// state out to its room (§4.3). Mirrors the teacher's `Casino`: a shared,
/// lock-guarded map of handles, one task per live entity, a watcher that
/// retires the entry when the task finishes.
pub struct SessionManager {
    cache: Arc<MazeCache>,
    bus: Arc<dyn MessageBus>,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    callbacks: Arc<Callbacks>,
    tick_period: std::time::Duration,
}

impl SessionManager {
    pub fn new(bus: Arc<dyn MessageBus>) -> Arc<Self> {
        Self::with_tick_period(bus, pm_core::constants::TICK_PERIOD)
    }

    /// Same as [`Self::new`], but ticking at `tick_period` instead of the
    /// fixed 60 Hz constant (§1 EXPANSION's "tick rate override for
    /// tests"). Production hosts should use [`Self::new`]; this exists so a
    /// test can observe many ticks without waiting out real wall-clock time.
    pub fn with_tick_period(bus: Arc<dyn MessageBus>, tick_period: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            cache: Arc::new(MazeCache::new()),
            bus,
            sessions: RwLock::new(HashMap::new()),
            callbacks: Arc::new(Callbacks::default()),
            tick_period,
        })
    }

    /// Builds the engine for `params`, spawns its driver task, and registers
    /// a watcher that removes the session's entry once the driver returns.
    /// The session starts paused; call [`Self::start_session`] to begin
    /// ticking (§4.3 "Round start").
    pub async fn create_session(
        self: &Arc<Self>,
        params: CreateSessionParams,
    ) -> Result<SessionId, CoreError> {
        if params.participants.is_empty() {
            return Err(CoreError::invalid_argument(
                "a session needs at least one participant",
            ));
        }
        let id = params.id;
        if self.sessions.read().await.contains_key(&id) {
            return Err(CoreError::invalid_argument(format!(
                "session {id} already exists"
            )));
        }
        let engine = Engine::new(params.variant, params.seed, params.tier, self.cache.clone());
        let initial = engine.snapshot();
        let (session_handle, driver_channels) = handle::pair(id, params.kind, initial);
        self.sessions.write().await.insert(id, session_handle);

        let manager = self.clone();
        let bus = self.bus.clone();
        let callbacks = self.callbacks.clone();
        let kind = params.kind;
        let tick_period = self.tick_period;
        tokio::spawn(async move {
            crate::driver::run(id, kind, engine, driver_channels, bus, callbacks, tick_period).await;
            manager.sessions.write().await.remove(&id);
            log::info!("[pm_session::manager] session {id} retired");
        });

        log::info!(
            "[pm_session::manager] created session {id} kind={:?} variant={} tier={:?}",
            params.kind,
            params.variant,
            params.tier
        );
        Ok(id)
    }

    /// Sessions start driving their first tick as soon as
    /// [`Self::create_session`] spawns the driver task; this exists for
    /// symmetry with the spec's explicit `startSession` call and currently
    /// only checks the session is still live.
    pub async fn start_session(&self, id: SessionId) -> Result<(), CoreError> {
        self.with_session(id, |_| {}).await
    }

    pub async fn stop_session(&self, id: SessionId) -> Result<(), CoreError> {
        self.with_session(id, |handle| {
            let _ = handle.commands.send(Command::Stop);
        })
        .await
    }

    /// Stops the session's driver (if still running) and drops its map
    /// entry immediately rather than waiting for the driver's own cleanup
    /// watcher to observe the task finishing.
    pub async fn remove_session(&self, id: SessionId) -> Result<(), CoreError> {
        let mut sessions = self.sessions.write().await;
        let handle = sessions.remove(&id).ok_or(CoreError::SessionNotFound)?;
        let _ = handle.commands.send(Command::Stop);
        Ok(())
    }

    /// Queues `direction` for the session's next tick. `participant` is
    /// accepted for contract fidelity with §4.3's `queueInput(id, participant,
    /// direction)` but is not forwarded to the engine: the baseline engine
    /// takes one direction per tick regardless of who issued it, so beyond
    /// confirming the session exists there is nothing further to do with it
    /// here.
    pub async fn queue_input(
        &self,
        id: SessionId,
        _participant: &AgentAddress,
        direction: Option<Direction>,
    ) -> Result<(), CoreError> {
        self.with_session(id, |handle| {
            let _ = handle.commands.send(Command::QueueInput(direction));
        })
        .await
    }

    /// Returns the most recently published snapshot for `id`, or `None` if
    /// no session with that id is live (§6 `fullSync`).
    pub async fn full_sync(&self, id: SessionId) -> Option<Snapshot> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(SessionHandle::current_snapshot)
    }

    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub fn set_on_round_change<F>(&self, callback: F)
    where
        F: Fn(SessionId, u32) + Send + Sync + 'static,
    {
        *self.callbacks.on_round_change.write().unwrap() = Some(Arc::new(callback));
    }

    pub fn set_on_game_over<F>(&self, callback: F)
    where
        F: Fn(SessionId, GameOverReason, &Snapshot) + Send + Sync + 'static,
    {
        *self.callbacks.on_game_over.write().unwrap() = Some(Arc::new(callback));
    }

    pub fn set_on_frame<F>(&self, callback: F)
    where
        F: Fn(SessionId, &Frame) + Send + Sync + 'static,
    {
        *self.callbacks.on_frame.write().unwrap() = Some(Arc::new(callback));
    }

    async fn with_session(
        &self,
        id: SessionId,
        action: impl FnOnce(&SessionHandle),
    ) -> Result<(), CoreError> {
        let sessions = self.sessions.read().await;
        let handle = sessions.get(&id).ok_or(CoreError::SessionNotFound)?;
        action(handle);
        Ok(())
    }
}
