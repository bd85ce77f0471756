//! One-agent-versus-the-house challenge matches (§4.6): bounded
//! concurrency, a four-named-timeout lifecycle, and an optional betting
//! window against the house ghosts.
mod driver;
mod handle;
mod manager;
mod registry;
mod types;

pub use manager::ChallengeManager;
pub use types::ChallengeId;
pub use types::CreateChallengeParams;
pub use types::Status;
pub use types::ghost_agent;

#[cfg(test)]
mod tests {
    use super::*;
    use pm_betting::BettingManager;
    use pm_core::Tier;
    use pm_core::constants::CHALLENGE_BET_WINDOW;
    use pm_core::constants::CHALLENGE_RECONNECT_GRACE;
    use pm_ext::AgentAddress;
    use pm_ext::fakes::FakeBus;
    use pm_ext::fakes::FakeLedger;
    use pm_maze::MazeVariant;
    use std::sync::Arc;
    use std::time::Duration;

    fn params() -> CreateChallengeParams {
        CreateChallengeParams {
            agent: AgentAddress("agent-a".into()),
            variant: MazeVariant::Classic,
            tier: Tier::One,
            seed: 7,
        }
    }

    #[tokio::test]
    async fn connecting_then_waiting_out_the_countdown_reaches_the_active_phase() {
        let bus = Arc::new(FakeBus::new());
        let manager = ChallengeManager::new(bus.clone(), None);
        let id = manager.create_challenge(params()).await.unwrap();
        assert_eq!(manager.status(id).await.unwrap(), Status::WaitingAgent);
        manager.connect(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(manager.status(id).await.unwrap(), Status::Countdown);
        tokio::time::sleep(pm_core::constants::CHALLENGE_COUNTDOWN + Duration::from_millis(200)).await;
        assert_eq!(manager.status(id).await.unwrap(), Status::Active);
    }

    #[tokio::test]
    async fn a_challenge_waiting_for_its_agent_counts_toward_the_concurrency_limit() {
        let bus = Arc::new(FakeBus::new());
        let manager = ChallengeManager::new(bus.clone(), None);
        let id = manager.create_challenge(params()).await.unwrap();
        assert_eq!(manager.active_challenge_count().await, 1);
        assert_eq!(manager.status(id).await.unwrap(), Status::WaitingAgent);
    }

    #[tokio::test]
    async fn a_full_house_of_challenges_rejects_the_next_one() {
        let bus = Arc::new(FakeBus::new());
        let manager = ChallengeManager::new(bus.clone(), None);
        for _ in 0..pm_core::constants::CHALLENGE_MAX_CONCURRENT {
            manager.create_challenge(params()).await.unwrap();
        }
        let err = manager.create_challenge(params()).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn the_house_ghosts_have_a_fixed_synthetic_address() {
        assert_eq!(ghost_agent(), AgentAddress("house-ghosts".to_string()));
    }

    #[tokio::test]
    async fn a_disconnected_agent_forfeits_to_the_ghosts_after_the_reconnect_grace_expires() {
        let bus = Arc::new(FakeBus::new());
        let ledger = Arc::new(FakeLedger::new());
        let betting = BettingManager::new(ledger.clone(), bus.clone());
        let manager = ChallengeManager::new(bus.clone(), Some(betting));

        let id = manager.create_challenge(params()).await.unwrap();
        manager.connect(id).await.unwrap();

        // let the betting window and countdown elapse, then disconnect two
        // seconds into the active phase.
        tokio::time::sleep(CHALLENGE_BET_WINDOW + pm_core::constants::CHALLENGE_COUNTDOWN + Duration::from_secs(2)).await;
        manager.disconnect(id).await.unwrap();

        // wait past the reconnect grace without ever reconnecting.
        tokio::time::sleep(CHALLENGE_RECONNECT_GRACE + Duration::from_secs(2)).await;

        let room = format!("challenge:{id}");
        let events = bus.events_for(&room);
        let (_, payload) = events
            .iter()
            .rev()
            .find(|(event, _)| event == "match_result")
            .expect("no match_result broadcast for the disconnected challenge");
        assert_eq!(payload["winner"], "ghost");
        assert_eq!(payload["reason"], "disconnect");
        assert!(
            ledger.call_log().iter().any(|line| line.starts_with("settle_bets(") && line.ends_with(", 1)")),
            "ledger call log missing a ghost-side settlement: {:?}",
            ledger.call_log()
        );
        assert_eq!(manager.active_challenge_count().await, 0);
    }
}
