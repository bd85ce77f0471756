use crate::handle::DriverChannels;
use crate::registry::GameOverRegistry;
use crate::types::Command;
use crate::types::CreateChallengeParams;
use crate::types::ChallengeId;
use crate::types::Outcome;
use crate::types::Status;
use crate::types::Winner;
use crate::types::ghost_agent;
use pm_betting::BettingManager;
use pm_core::MatchId;
use pm_core::constants::CHALLENGE_BET_WINDOW;
use pm_core::constants::CHALLENGE_CONNECT_TIMEOUT;
use pm_core::constants::CHALLENGE_COUNTDOWN;
use pm_core::constants::CHALLENGE_MAX_DURATION;
use pm_core::constants::CHALLENGE_RECONNECT_GRACE;
use pm_engine::Snapshot;
use pm_ext::MessageBus;
use pm_session::CreateSessionParams;
use pm_session::SessionId;
use pm_session::SessionManager;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::oneshot;

/// Drives one challenge through `waitingAgent → betting? → countdown →
/// active → (completed|expired)` (§4.6). One task per challenge, in the
/// same one-task-per-entity shape as [`pm_session::driver::run`] and
/// [`pm_betting`]'s window task; `_permit` is held for the task's whole
/// lifetime to enforce the bounded-concurrency limit.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    id: ChallengeId,
    match_id: MatchId,
    params: CreateChallengeParams,
    mut channels: DriverChannels,
    _permit: OwnedSemaphorePermit,
    sessions: Arc<SessionManager>,
    betting: Option<Arc<BettingManager>>,
    bus: Arc<dyn MessageBus>,
    registry: Arc<GameOverRegistry>,
) {
    let room = format!("challenge:{id}");
    log::debug!("[pm_challenge::driver] challenge {id} waiting for agent connect");

    if !wait_for_connect(&mut channels).await {
        let _ = channels.status.send(Status::Expired);
        bus.broadcast(&room, "match_result", serde_json::json!({ "winner": "ghost", "reason": "connect_timeout" })).await;
        log::info!("[pm_challenge::driver] challenge {id} expired waiting for connect");
        return;
    }

    if let Some(betting) = &betting {
        let _ = channels.status.send(Status::Betting);
        if let Err(err) = betting
            .open_betting_window(match_id, params.agent.clone(), ghost_agent(), Some(CHALLENGE_BET_WINDOW.as_secs()))
            .await
        {
            log::warn!("[pm_challenge::driver] failed to open betting window for challenge {id}: {err}");
        }
        bus.broadcast(&room, "round_start", serde_json::json!({ "phase": "betting", "windowSeconds": CHALLENGE_BET_WINDOW.as_secs() }))
            .await;
        tokio::time::sleep(CHALLENGE_BET_WINDOW).await;
    }

    let _ = channels.status.send(Status::Countdown);
    bus.broadcast(&room, "round_start", serde_json::json!({ "phase": "countdown", "seconds": CHALLENGE_COUNTDOWN.as_secs() })).await;
    tokio::time::sleep(CHALLENGE_COUNTDOWN).await;

    let _ = channels.status.send(Status::Active);
    let session_params = CreateSessionParams {
        id: SessionId::default(),
        kind: pm_session::SessionKind::Challenge,
        variant: params.variant,
        seed: params.seed,
        tier: params.tier,
        participants: vec![params.agent.clone()],
    };
    let session_id = match sessions.create_session(session_params).await {
        Ok(sid) => sid,
        Err(err) => {
            log::error!("[pm_challenge::driver] challenge {id} failed to start its session: {err}");
            let _ = channels.status.send(Status::Expired);
            bus.broadcast(&room, "match_result", serde_json::json!({ "winner": "ghost", "reason": "engine_fault" })).await;
            return;
        }
    };

    let outcome = drive_active(session_id, &params, &mut channels, &sessions, &registry).await;

    let _ = channels.status.send(Status::Completed);
    if let Some(betting) = &betting {
        if let Err(err) = betting.settle_bets(match_id, outcome.winner.side()).await {
            log::warn!("[pm_challenge::driver] settle_bets failed for challenge {id}: {err}");
        }
    }
    bus.broadcast(
        &room,
        "match_result",
        serde_json::json!({ "matchId": match_id.to_string(), "winner": outcome.winner.as_str(), "reason": outcome.reason }),
    )
    .await;
    log::info!("[pm_challenge::driver] challenge {id} completed: {} ({})", outcome.winner.as_str(), outcome.reason);
}

async fn wait_for_connect(channels: &mut DriverChannels) -> bool {
    let deadline = tokio::time::sleep(CHALLENGE_CONNECT_TIMEOUT);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            cmd = channels.commands.recv() => match cmd {
                Some(Command::Connect) => return true,
                Some(_) => continue,
                None => return false,
            },
            _ = &mut deadline => return false,
        }
    }
}

async fn drive_active(
    session_id: SessionId,
    params: &CreateChallengeParams,
    channels: &mut DriverChannels,
    sessions: &Arc<SessionManager>,
    registry: &Arc<GameOverRegistry>,
) -> Outcome {
    let (game_over_tx, mut game_over_rx) = oneshot::channel();
    registry.bind(session_id, game_over_tx);
    let deadline = tokio::time::Instant::now() + CHALLENGE_MAX_DURATION;
    let mut disconnected_since: Option<tokio::time::Instant> = None;

    let outcome = loop {
        let grace_deadline = disconnected_since.map(|since| since + CHALLENGE_RECONNECT_GRACE);
        tokio::select! {
            result = &mut game_over_rx => {
                break match result {
                    Ok((pm_session::GameOverReason::Cleared, snapshot)) => outcome_from_snapshot(&snapshot, "cleared"),
                    Ok((pm_session::GameOverReason::EngineFault, _)) => Outcome { winner: Winner::Ghost, reason: "engine_fault".into() },
                    Err(_) => Outcome { winner: Winner::Ghost, reason: "aborted".into() },
                };
            }
            _ = tokio::time::sleep_until(deadline) => {
                let snapshot = sessions.full_sync(session_id).await;
                let _ = sessions.stop_session(session_id).await;
                break match snapshot {
                    Some(snapshot) => outcome_from_snapshot(&snapshot, "timeout"),
                    None => Outcome { winner: Winner::Ghost, reason: "timeout".into() },
                };
            }
            cmd = channels.commands.recv() => match cmd {
                Some(Command::Disconnect) => disconnected_since = Some(tokio::time::Instant::now()),
                Some(Command::Reconnect) => disconnected_since = None,
                Some(Command::Input(direction)) => {
                    let _ = sessions.queue_input(session_id, &params.agent, direction).await;
                }
                Some(Command::Connect) => {}
                None => {
                    let _ = sessions.stop_session(session_id).await;
                    break Outcome { winner: Winner::Ghost, reason: "aborted".into() };
                }
            },
            _ = tokio::time::sleep_until(grace_deadline.unwrap_or_else(|| tokio::time::Instant::now() + CHALLENGE_MAX_DURATION)), if grace_deadline.is_some() => {
                let _ = sessions.stop_session(session_id).await;
                break Outcome { winner: Winner::Ghost, reason: "disconnect".into() };
            }
        }
    };
    registry.unbind(session_id);
    outcome
}

fn outcome_from_snapshot(snapshot: &Snapshot, reason: &str) -> Outcome {
    let winner = if snapshot.lives > 0 { Winner::Pacman } else { Winner::Ghost };
    Outcome { winner, reason: reason.to_string() }
}
