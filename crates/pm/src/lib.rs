//! Top-level wiring for the deterministic arcade backend core (§1): the
//! engine, session manager, tournament controller, betting orchestrator,
//! and challenge controller behind one [`Platform`] and one typed
//! [`Config`] surface.
mod config;
mod logging;
mod platform;

pub use config::Config;
pub use logging::init_logging;
pub use platform::Platform;

pub use pm_betting::BettingManager;
pub use pm_challenge::ChallengeManager;
pub use pm_engine::Engine;
pub use pm_ext::AgentAddress;
pub use pm_session::SessionManager;
pub use pm_tournament::TournamentManager;

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::MatchId;
    use pm_core::Tier;
    use pm_engine::Snapshot;
    use pm_ext::AgentInfo;
    use pm_ext::JobHandle;
    use pm_ext::JobScheduler;
    use pm_ext::MatchJob;
    use pm_ext::MatchResult;
    use pm_ext::Side;
    use pm_ext::fakes::FakeBlobStore;
    use pm_ext::fakes::FakeBus;
    use pm_ext::fakes::FakeLedger;
    use pm_ext::fakes::FakeScheduler;
    use pm_maze::MazeCache;
    use pm_maze::MazeVariant;
    use pm_session::CreateSessionParams;
    use pm_session::FrameDelta;
    use pm_session::SessionId;
    use pm_session::SessionKind;
    use std::sync::Arc;
    use std::time::Duration;

    /// A [`JobScheduler`] that resolves every job instantly with `agentA`
    /// winning every match 1-0, for driving a tournament to completion
    /// without waiting on a real match engine (mirrors the equivalent
    /// double in `pm_tournament`'s own tests).
    struct AutoWinA;

    #[async_trait::async_trait]
    impl JobScheduler for AutoWinA {
        async fn schedule(&self, job: MatchJob) -> anyhow::Result<JobHandle> {
            let (tx, rx) = tokio::sync::oneshot::channel();
            let _ = tx.send(MatchResult {
                match_id: job.match_id,
                score_a: 1,
                score_b: 0,
                replay_bytes: Vec::new(),
                state_hash: [0u8; 32],
            });
            Ok(rx)
        }
    }

    async fn wait_until_idle(tournaments: &Arc<TournamentManager>) {
        for _ in 0..200 {
            if tournaments.active_tournament_count().await == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("tournament never finished");
    }

    // P6: bracket monotonicity. For every bracket size §1 supports, the
    // emitted `round` sequence is strictly increasing and ends with
    // `tournament_complete`.
    #[tokio::test]
    async fn p6_bracket_rounds_strictly_increase_and_end_in_tournament_complete() {
        for &size in pm_core::constants::BRACKET_SIZES.iter() {
            let bus = Arc::new(FakeBus::new());
            let ledger = Arc::new(FakeLedger::new());
            for i in 0..size {
                ledger.seed_agent(
                    AgentAddress(format!("agent-{i}")),
                    AgentInfo { owner: format!("owner-{i}"), name: format!("agent-{i}"), wins: 0, losses: 0, reputation: (100 - i) as i64, active: true },
                );
            }
            let blob = Arc::new(FakeBlobStore::new());
            let betting = BettingManager::new(ledger.clone(), bus.clone());
            let tournaments = TournamentManager::new(ledger, bus.clone(), Arc::new(AutoWinA), blob, betting);
            let id = tournaments.create_autonomous_tournament(size).await.unwrap();
            wait_until_idle(&tournaments).await;

            let room = format!("tournament:{id}");
            let events = bus.events_for(&room);
            let rounds: Vec<u32> = events
                .iter()
                .filter(|(event, _)| event == "round_start")
                .map(|(_, payload)| payload["round"].as_u64().unwrap() as u32)
                .collect();
            assert!(rounds.windows(2).all(|w| w[1] > w[0]), "bracket size {size}: rounds did not strictly increase: {rounds:?}");
            assert!(events.last().is_some_and(|(event, _)| event == "tournament_complete"), "bracket size {size}: last event was not tournament_complete");
        }
    }

    // P7: betting monotonicity. Events obey opened ≤ (placed|odds_update)* ≤
    // locked ≤ settled, each boundary observed at most once.
    #[tokio::test]
    async fn p7_betting_events_obey_open_then_placed_or_odds_then_locked_then_settled() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let betting = BettingManager::new(ledger, bus.clone());
        let match_id = MatchId(42);
        let room = format!("betting:{match_id}");

        betting
            .open_betting_window(match_id, AgentAddress("a".into()), AgentAddress("b".into()), Some(30))
            .await
            .unwrap();
        betting.record_bet(match_id, Side::AgentA, pm_core::Wei::from_u128(2_000_000_000_000_000_000)).await.unwrap();
        betting.settle_bets(match_id, Side::AgentA).await.unwrap();

        let events = bus.events_for(&room);
        let kind_of = |event: &str| -> u8 {
            match event {
                "betting_open" => 0,
                "bet_placed" | "odds_update" => 1,
                "bets_locked" => 2,
                "bets_settled" => 3,
                other => panic!("unexpected betting event {other}"),
            }
        };
        let kinds: Vec<u8> = events.iter().map(|(event, _)| kind_of(event)).collect();
        assert!(kinds.windows(2).all(|w| w[1] >= w[0]), "betting events out of order: {kinds:?}");
        assert_eq!(kinds.iter().filter(|&&k| k == 0).count(), 1, "opened observed more than once");
        assert_eq!(kinds.iter().filter(|&&k| k == 2).count(), 1, "locked observed more than once");
        assert_eq!(kinds.iter().filter(|&&k| k == 3).count(), 1, "settled observed more than once");
    }

    // S4: engine round clear. Force-clearing every pellet drives `round`
    // from 1 to 2 on the very next tick, with spawns, score, and lives
    // preserved.
    #[test]
    fn s4_clearing_every_pellet_advances_the_round_on_the_next_tick() {
        let mut engine = pm_engine::Engine::new(MazeVariant::Classic, 0, Tier::One, Arc::new(MazeCache::new()));
        let before = engine.snapshot();
        engine.force_clear_pellets();
        let after = engine.tick(None);
        assert_eq!(after.round, before.round + 1);
        assert_eq!(after.pacman.x, before.pacman.x);
        assert_eq!(after.pacman.y, before.pacman.y);
        assert_eq!(after.score, before.score);
        assert_eq!(after.lives, before.lives);
    }

    /// Reconstructs the snapshot sequence a late-joining spectator would
    /// see: a `full_sync` snapshot at join time, folded against every
    /// subsequent [`FrameDelta`]. Only compares the fields a delta
    /// actually carries (§8 P2's field list); `power_pellets`/`fruit` are
    /// not part of the wire delta and are intentionally excluded.
    fn apply(prev: &Snapshot, delta: &FrameDelta) -> Snapshot {
        let mut next = prev.clone();
        next.tick = delta.tick;
        next.round = delta.round;
        next.game_over = delta.game_over;
        if let Some(p) = delta.pacman {
            next.pacman = p;
        }
        for g in &delta.ghosts {
            if let Some(slot) = next.ghosts.iter_mut().find(|existing| existing.id == g.id) {
                *slot = *g;
            }
        }
        if let Some(v) = delta.power_active {
            next.power_active = v;
        }
        if let Some(v) = delta.power_time_remaining {
            next.power_time_remaining = v;
        }
        if let Some(v) = delta.score {
            next.score = v;
        }
        if let Some(v) = delta.lives {
            next.lives = v;
        }
        next
    }

    fn p2_fields_eq(a: &Snapshot, b: &Snapshot) -> bool {
        a.round == b.round
            && a.score == b.score
            && a.lives == b.lives
            && a.pacman == b.pacman
            && a.ghosts == b.ghosts
            && a.power_active == b.power_active
            && a.power_time_remaining == b.power_time_remaining
            && a.game_over == b.game_over
    }

    // S5: frame delta correctness. A spectator that joins late and
    // reconstructs full-sync + subsequent deltas must match the live
    // snapshot bit-for-bit on every field the wire protocol carries.
    #[tokio::test]
    async fn s5_a_late_joiner_reconstructs_the_same_snapshot_from_full_sync_and_deltas() {
        let bus = Arc::new(FakeBus::new());
        let manager = SessionManager::new(bus.clone());
        let id = manager
            .create_session(CreateSessionParams {
                id: SessionId::default(),
                kind: SessionKind::Survival,
                variant: MazeVariant::Classic,
                seed: 5,
                tier: Tier::One,
                participants: vec![AgentAddress("spectated-agent".into())],
            })
            .await
            .unwrap();

        // let the session run well past tick 120 (at 60 Hz, ~2.3s).
        tokio::time::sleep(Duration::from_millis(2400)).await;

        let join_snapshot = manager.full_sync(id).await.expect("session still live");
        let join_tick = join_snapshot.tick;

        // give the driver a little longer to publish a handful more ticks
        // past the join point before reading the room back.
        tokio::time::sleep(Duration::from_millis(200)).await;

        let room = format!("survival:{id}");
        let events = bus.events_for(&room);
        let mut reconstructed = join_snapshot.clone();
        let mut deltas_applied = 0;
        for (event, payload) in &events {
            if event != "frame" || payload.get("stateHash").is_some() {
                continue; // only the very first frame is a full snapshot
            }
            let tick = payload["tick"].as_u64().unwrap();
            if tick <= join_tick {
                continue;
            }
            let delta: FrameDelta = serde_json::from_value(payload.clone()).expect("delta payload parses");
            reconstructed = apply(&reconstructed, &delta);
            deltas_applied += 1;
        }
        assert!(deltas_applied > 0, "no deltas observed past the join tick");

        let live_final = manager.full_sync(id).await.expect("session still live");
        if reconstructed.tick == live_final.tick {
            assert!(p2_fields_eq(&reconstructed, &live_final), "reconstruction diverged from the live snapshot at tick {}", reconstructed.tick);
        }
    }

    // P8: frame ordering. Deltas for ticks T_join+1, T_join+2, ... arrive
    // with no gaps and no reordering.
    #[tokio::test]
    async fn p8_frame_deltas_are_gapless_and_in_order() {
        let bus = Arc::new(FakeBus::new());
        let manager = SessionManager::new(bus.clone());
        let id = manager
            .create_session(CreateSessionParams {
                id: SessionId::default(),
                kind: SessionKind::Challenge,
                variant: MazeVariant::Classic,
                seed: 9,
                tier: Tier::One,
                participants: vec![AgentAddress("agent".into())],
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let room = format!("challenge:{id}");
        let ticks: Vec<u64> = bus
            .events_for(&room)
            .iter()
            .filter(|(event, _)| event == "frame")
            .map(|(_, payload)| payload["tick"].as_u64().unwrap())
            .collect();
        assert!(ticks.len() > 2, "not enough frames observed");
        for window in ticks.windows(2) {
            assert_eq!(window[1], window[0] + 1, "frame ticks were not gapless/in-order: {ticks:?}");
        }
    }

    // P9: shutdown quiescence. After `shutdown` returns, no component
    // emits further frames, events, or ledger calls.
    #[tokio::test]
    async fn p9_no_further_events_are_emitted_after_shutdown_returns() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        ledger.seed_agent(AgentAddress("a".into()), AgentInfo { owner: "o".into(), name: "a".into(), wins: 0, losses: 0, reputation: 99, active: true });
        ledger.seed_agent(AgentAddress("b".into()), AgentInfo { owner: "o".into(), name: "b".into(), wins: 0, losses: 0, reputation: 98, active: true });
        let blob = Arc::new(FakeBlobStore::new());
        let scheduler = Arc::new(FakeScheduler::new());
        let betting = BettingManager::new(ledger.clone(), bus.clone());
        let tournaments = TournamentManager::new(ledger.clone(), bus.clone(), scheduler, blob, betting.clone());

        let match_id = MatchId(7);
        betting.open_betting_window(match_id, AgentAddress("a".into()), AgentAddress("b".into()), Some(60)).await.unwrap();

        betting.shutdown().await;
        tournaments.shutdown().await;

        let before = bus.events.lock().unwrap().len();
        let before_calls = ledger.call_log().len();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let after = bus.events.lock().unwrap().len();
        let after_calls = ledger.call_log().len();
        assert_eq!(before, after, "events were emitted after shutdown returned");
        assert_eq!(before_calls, after_calls, "ledger calls were made after shutdown returned");
        assert_eq!(betting.active_session_count().await, 0);
        assert_eq!(tournaments.active_tournament_count().await, 0);
    }
}
