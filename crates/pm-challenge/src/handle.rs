use crate::types::Command;
use crate::types::Status;
use tokio::sync::mpsc;
use tokio::sync::watch;

/// What the manager keeps per challenge: a command sender and a cheap,
/// non-blocking read of the current lifecycle status (§4.6's state
/// machine). Mirrors [`pm_session::handle::SessionHandle`]'s split from the
/// task-owned receiving ends.
pub struct ChallengeHandle {
    pub commands: mpsc::UnboundedSender<Command>,
    pub status: watch::Receiver<Status>,
}

pub struct DriverChannels {
    pub commands: mpsc::UnboundedReceiver<Command>,
    pub status: watch::Sender<Status>,
}

pub fn pair(initial: Status) -> (ChallengeHandle, DriverChannels) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(initial);
    (ChallengeHandle { commands: cmd_tx, status: status_rx }, DriverChannels { commands: cmd_rx, status: status_tx })
}
