//! Pari-mutuel betting windows bound to a match (§4.5): one background task
//! per open match broadcasting odds and locking itself out at expiry, plus a
//! [`BettingManager`] the tournament and challenge controllers share.
mod manager;
mod session;
mod state;

pub use manager::BettingManager;
pub use state::Phase;
pub use state::Pool;
pub use state::odds_for;

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::MatchId;
    use pm_core::Wei;
    use pm_ext::AgentAddress;
    use pm_ext::Side;
    use pm_ext::fakes::FakeBus;
    use pm_ext::fakes::FakeLedger;
    use std::sync::Arc;
    use std::time::Duration;

    fn agents() -> (AgentAddress, AgentAddress) {
        (AgentAddress("agent-a".into()), AgentAddress("agent-b".into()))
    }

    /// Literal scenario S3 (§8): open a 30s window, record two bets, let the
    /// window expire, then settle. Exercises pool math, lock-on-expiry, and
    /// the settle-time broadcast shape in one pass.
    #[tokio::test]
    async fn a_bet_lifecycle_locks_on_expiry_and_settles_with_the_right_payload() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let manager = BettingManager::new(ledger.clone(), bus.clone());
        let match_id = MatchId(1);
        let (agent_a, agent_b) = agents();

        manager.open_betting_window(match_id, agent_a, agent_b, Some(1)).await.unwrap();
        manager.record_bet(match_id, Side::AgentA, Wei::from_u128(2_000_000_000_000_000_000)).await.unwrap();
        manager.record_bet(match_id, Side::AgentB, Wei::from_u128(1_000_000_000_000_000_000)).await.unwrap();

        let room = format!("betting:{match_id}");
        let placed: Vec<_> = bus.events_for(&room).into_iter().filter(|(e, _)| e == "bet_placed").collect();
        assert_eq!(placed.len(), 2);
        let (_, last) = placed.last().unwrap();
        assert!((last["oddsA"].as_f64().unwrap() - 1.5).abs() < 1e-6);
        assert!((last["oddsB"].as_f64().unwrap() - 3.0).abs() < 1e-6);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let locked = bus.events_for(&room).into_iter().find(|(e, _)| e == "bets_locked");
        let (_, payload) = locked.expect("window should have auto-locked by now");
        assert_eq!(payload["totalPool"], "3000000000000000000");

        manager.settle_bets(match_id, Side::AgentA).await.unwrap();
        assert!(ledger.call_log().iter().any(|line| line == &format!("settle_bets({match_id}, 0)")));
        let (_, settled) = bus
            .events_for(&room)
            .into_iter()
            .find(|(e, _)| e == "bets_settled")
            .expect("settlement should broadcast");
        assert_eq!(settled["winner"], "agentA");
        assert_eq!(settled["totalPool"], "3000000000000000000");
        assert_eq!(manager.active_session_count().await, 0);
    }

    #[tokio::test]
    async fn a_bet_placed_after_the_window_locks_is_silently_ignored() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let manager = BettingManager::new(ledger, bus.clone());
        let match_id = MatchId(2);
        let (agent_a, agent_b) = agents();
        manager.open_betting_window(match_id, agent_a, agent_b, Some(30)).await.unwrap();
        manager.lock_bets(match_id).await.unwrap();
        manager
            .record_bet(match_id, Side::AgentA, Wei::from_u128(2_000_000_000_000_000_000))
            .await
            .unwrap();
        let room = format!("betting:{match_id}");
        assert!(bus.events_for(&room).into_iter().all(|(e, _)| e != "bet_placed"));
    }

    #[tokio::test]
    async fn a_bet_outside_the_allowed_range_is_rejected() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let manager = BettingManager::new(ledger, bus.clone());
        let match_id = MatchId(3);
        let (agent_a, agent_b) = agents();
        manager.open_betting_window(match_id, agent_a, agent_b, Some(30)).await.unwrap();
        let err = manager.record_bet(match_id, Side::AgentA, Wei::from_u128(1)).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn opening_a_window_twice_for_the_same_match_is_rejected() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let manager = BettingManager::new(ledger, bus);
        let match_id = MatchId(4);
        let (agent_a, agent_b) = agents();
        manager.open_betting_window(match_id, agent_a.clone(), agent_b.clone(), Some(30)).await.unwrap();
        let err = manager.open_betting_window(match_id, agent_a, agent_b, Some(30)).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }
}
