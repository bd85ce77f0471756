use crate::frame::BOARD_WIDTH;
use crate::frame::Frame;
use crate::frame::diff;
use crate::handle::Command;
use crate::handle::DriverChannels;
use crate::manager::Callbacks;
use crate::types::GameOverReason;
use crate::types::SessionId;
use crate::types::SessionKind;
use pm_core::Direction;
use pm_engine::Engine;
use pm_engine::Snapshot;
use pm_ext::MessageBus;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// The per-session driver task: owns one [`Engine`] exclusively and steps it
/// at `TICK_HZ`, fanning every tick out as a [`crate::frame::Frame`] over
/// `bus` and into whatever callbacks [`crate::SessionManager`] has
/// registered (§4.3). Mirrors the teacher's `Room::run` in shape: take
/// ownership, loop until a terminal condition, signal `done` on the way out.
pub async fn run(
    id: SessionId,
    kind: SessionKind,
    mut engine: Engine,
    mut channels: DriverChannels,
    bus: Arc<dyn MessageBus>,
    callbacks: Arc<Callbacks>,
    tick_period: std::time::Duration,
) {
    let room = format!("{}:{id}", kind.room_prefix());
    let mut interval = tokio::time::interval(tick_period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut queued: Option<Direction> = None;
    let mut first_tick = true;
    let mut last_round = engine.snapshot().round;

    log::debug!("[pm_session::driver] session {id} starting in room {room}");

    loop {
        tokio::select! {
            cmd = channels.commands.recv() => match cmd {
                Some(Command::QueueInput(dir)) => {
                    queued = dir;
                    continue;
                }
                Some(Command::Stop) | None => {
                    log::debug!("[pm_session::driver] session {id} stopped");
                    break;
                }
            },
            _ = interval.tick() => {}
        }

        let input = queued.take();
        match std::panic::catch_unwind(AssertUnwindSafe(|| engine.tick(input))) {
            Ok(snapshot) => {
                if snapshot.round != last_round {
                    last_round = snapshot.round;
                    invoke_round_change(&callbacks, id, snapshot.round);
                }
                let frame = publish_and_broadcast(&room, &bus, &mut channels, &snapshot, &mut first_tick).await;
                invoke_frame(&callbacks, id, &frame);
                if snapshot.game_over {
                    invoke_game_over(&callbacks, id, GameOverReason::Cleared, &snapshot);
                    let _ = channels.done.send(GameOverReason::Cleared);
                    return;
                }
            }
            Err(_) => {
                log::error!("[pm_session::driver] session {id} engine fault mid-tick");
                let mut fault = channels.publish.borrow().clone();
                fault.game_over = true;
                let frame = publish_and_broadcast(&room, &bus, &mut channels, &fault, &mut first_tick).await;
                invoke_frame(&callbacks, id, &frame);
                invoke_game_over(&callbacks, id, GameOverReason::EngineFault, &fault);
                let _ = channels.done.send(GameOverReason::EngineFault);
                return;
            }
        }
    }
}

async fn publish_and_broadcast(
    room: &str,
    bus: &Arc<dyn MessageBus>,
    channels: &mut DriverChannels,
    snapshot: &Snapshot,
    first_tick: &mut bool,
) -> Frame {
    let frame = if *first_tick {
        *first_tick = false;
        Frame::Full(snapshot.clone())
    } else {
        let prev = channels.publish.borrow().clone();
        Frame::Delta(diff(&prev, snapshot, BOARD_WIDTH))
    };
    let _ = channels.publish.send(snapshot.clone());
    match serde_json::to_value(&frame) {
        Ok(payload) => bus.broadcast(room, "frame", payload).await,
        Err(err) => log::error!("[pm_session::driver] frame serialization failed: {err}"),
    }
    frame
}

/// Every callback invocation runs inside its own `catch_unwind` (§7's
/// "shielded context"): a broken caller-supplied closure must never take the
/// tick loop down with it.
fn invoke_round_change(callbacks: &Callbacks, id: SessionId, round: u32) {
    let Some(cb) = callbacks.on_round_change.read().unwrap().clone() else {
        return;
    };
    if std::panic::catch_unwind(AssertUnwindSafe(|| cb(id, round))).is_err() {
        log::error!("[pm_session::driver] on_round_change callback panicked for session {id}");
    }
}

fn invoke_frame(callbacks: &Callbacks, id: SessionId, frame: &Frame) {
    let Some(cb) = callbacks.on_frame.read().unwrap().clone() else {
        return;
    };
    if std::panic::catch_unwind(AssertUnwindSafe(|| cb(id, frame))).is_err() {
        log::error!("[pm_session::driver] on_frame callback panicked for session {id}");
    }
}

fn invoke_game_over(callbacks: &Callbacks, id: SessionId, reason: GameOverReason, snapshot: &Snapshot) {
    let Some(cb) = callbacks.on_game_over.read().unwrap().clone() else {
        return;
    };
    if std::panic::catch_unwind(AssertUnwindSafe(|| cb(id, reason, snapshot))).is_err() {
        log::error!("[pm_session::driver] on_game_over callback panicked for session {id}");
    }
}
