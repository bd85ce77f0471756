use crate::types::GameOverReason;
use crate::types::SessionId;
use crate::types::SessionKind;
use pm_core::Direction;
use pm_engine::Snapshot;
use tokio::sync::watch;

/// A command sent from [`crate::SessionManager`] to a running session's
/// driver task. The driver owns the [`pm_engine::Engine`] exclusively; every
/// external touch goes through one of these instead of a shared lock.
pub enum Command {
    /// Replaces the queued direction for the next tick. The spec accepts a
    /// participant address alongside the direction (§4.3) but the engine
    /// itself is single-input; the manager checks the caller is a
    /// participant before sending this, the driver never needs the address.
    QueueInput(Option<Direction>),
    /// Pauses the tick loop; the engine is left exactly where it stood.
    Stop,
}

/// What the manager keeps per live session. Mirrors the teacher's
/// `RoomHandle`: channel endpoints plus whatever state a caller can read
/// without waiting on the driver task.
pub struct SessionHandle {
    pub id: SessionId,
    pub kind: SessionKind,
    pub commands: tokio::sync::mpsc::UnboundedSender<Command>,
    /// Always holds the most recent snapshot; `fullSync` reads it without
    /// going through the driver task at all.
    pub latest: watch::Receiver<Snapshot>,
    /// Resolves once with the reason the match ended. A dropped sender
    /// (driver panicked past its own catch_unwind, which should never
    /// happen) reads the same as any other channel closure to a waiter.
    pub done: tokio::sync::broadcast::Sender<GameOverReason>,
}

impl SessionHandle {
    pub fn current_snapshot(&self) -> Snapshot {
        self.latest.borrow().clone()
    }
}

/// What the driver task owns: the receiving end of every channel whose
/// sending end lives on the [`SessionHandle`] the manager keeps.
pub struct DriverChannels {
    pub commands: tokio::sync::mpsc::UnboundedReceiver<Command>,
    pub publish: watch::Sender<Snapshot>,
    pub done: tokio::sync::broadcast::Sender<GameOverReason>,
}

/// Builds a [`SessionHandle`] for the manager's map and the matching
/// [`DriverChannels`] for the task `tokio::spawn`-ed to own the engine.
pub fn pair(id: SessionId, kind: SessionKind, initial: Snapshot) -> (SessionHandle, DriverChannels) {
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
    let (snap_tx, snap_rx) = watch::channel(initial);
    let (done_tx, _done_rx) = tokio::sync::broadcast::channel(1);
    let handle = SessionHandle {
        id,
        kind,
        commands: cmd_tx,
        latest: snap_rx,
        done: done_tx.clone(),
    };
    let driver = DriverChannels {
        commands: cmd_rx,
        publish: snap_tx,
        done: done_tx,
    };
    (handle, driver)
}
