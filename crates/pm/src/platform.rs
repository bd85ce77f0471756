use crate::config::Config;
use pm_betting::BettingManager;
use pm_challenge::ChallengeManager;
use pm_ext::BlobStore;
use pm_ext::JobScheduler;
use pm_ext::LedgerClient;
use pm_ext::MessageBus;
use pm_session::SessionManager;
use pm_tournament::TournamentManager;
use std::sync::Arc;

/// Wires every orchestration crate behind one set of external
/// collaborators, leaf-first (§9 "cyclic references... break by dependency
/// injection at construction; wire up leaf-first"): `betting` has no
/// dependency on `tournament` or `challenge`, `tournament` and `challenge`
/// each depend on `betting`, and nothing depends on `session` except
/// `challenge`'s own private instance plus whatever a host wires up for
/// survival-mode play.
pub struct Platform {
    pub sessions: Arc<SessionManager>,
    pub betting: Arc<BettingManager>,
    pub tournaments: Arc<TournamentManager>,
    pub challenges: Arc<ChallengeManager>,
}

impl Platform {
    pub fn new(
        config: &Config,
        ledger: Arc<dyn LedgerClient>,
        bus: Arc<dyn MessageBus>,
        scheduler: Arc<dyn JobScheduler>,
        blob: Arc<dyn BlobStore>,
    ) -> Self {
        let sessions = SessionManager::with_tick_period(bus.clone(), config.tick_period);
        let betting = BettingManager::new(ledger.clone(), bus.clone());
        let tournaments = TournamentManager::new(ledger, bus.clone(), scheduler, blob, betting.clone());
        let challenges = ChallengeManager::with_tick_period(bus, Some(betting.clone()), config.tick_period);
        Self { sessions, betting, tournaments, challenges }
    }

    /// Cancels every owned timer and marks all live state terminal across
    /// every orchestration crate (§5 "shutdown() on any component..."). Each
    /// component's own `shutdown` already bounds how long it waits on
    /// in-flight ledger calls; this just fans the call out to all of them.
    pub async fn shutdown(&self) {
        self.tournaments.shutdown().await;
        self.betting.shutdown().await;
        self.challenges.shutdown().await;
    }
}
