use crate::bracket;
use crate::retry::ledger_call;
use crate::types::Pairing;
use crate::types::TournamentId;
use crate::types::TournamentStatus;
use pm_betting::BettingManager;
use pm_core::CoreError;
use pm_core::Tier;
use pm_core::Xorshift128Plus;
use pm_core::constants::BRACKET_SIZES;
use pm_core::constants::ROUND_SUPERVISOR_TIMEOUT;
use pm_ext::AgentAddress;
use pm_ext::BlobStore;
use pm_ext::JobScheduler;
use pm_ext::LedgerClient;
use pm_ext::MatchJob;
use pm_ext::MatchResult;
use pm_ext::MatchResultSubmission;
use pm_ext::MessageBus;
use pm_ext::OnchainTournamentId;
use pm_ext::Side;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

struct Bracket {
    onchain_id: OnchainTournamentId,
    round: u32,
    pairings: Vec<Pairing>,
    winners: HashMap<pm_core::MatchId, AgentAddress>,
    status: TournamentStatus,
    /// Seeded once from `onchain_id` so every round's pairing variant/seed
    /// draw is part of one deterministic, replayable stream (§8 P1/P6).
    rng: Xorshift128Plus,
}

/// Owns every live tournament, one [`Bracket`] per id behind its own mutex
/// so concurrent match-completion callbacks serialize only against each
/// other, never against unrelated tournaments (§5). Grounded on the
/// teacher's `Casino`: one owning map, construction-time trait-object
/// injection for every external collaborator.
pub struct TournamentManager {
    ledger: Arc<dyn LedgerClient>,
    bus: Arc<dyn MessageBus>,
    scheduler: Arc<dyn JobScheduler>,
    blob: Arc<dyn BlobStore>,
    betting: Arc<BettingManager>,
    next_match_id: AtomicU64,
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<Bracket>>>>,
}

impl TournamentManager {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        bus: Arc<dyn MessageBus>,
        scheduler: Arc<dyn JobScheduler>,
        blob: Arc<dyn BlobStore>,
        betting: Arc<BettingManager>,
    ) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            bus,
            scheduler,
            blob,
            betting,
            next_match_id: AtomicU64::new(1),
            tournaments: RwLock::new(HashMap::new()),
        })
    }

    /// Builds an 8- or 16-agent bracket from the active registry, seeded by
    /// reputation, and kicks off round 1 (§4.4 construction).
    pub async fn create_autonomous_tournament(self: &Arc<Self>, size: usize) -> Result<TournamentId, CoreError> {
        if !BRACKET_SIZES.contains(&size) {
            return Err(CoreError::invalid_argument(format!("unsupported bracket size {size}")));
        }
        let addresses = self
            .ledger
            .get_active_agents()
            .await
            .map_err(|err| CoreError::LedgerFailure(err.to_string()))?;
        let mut agents = Vec::with_capacity(addresses.len());
        for addr in addresses {
            let info = self
                .ledger
                .get_agent_info(&addr)
                .await
                .map_err(|err| CoreError::LedgerFailure(err.to_string()))?;
            agents.push((addr, info));
        }
        let participants = bracket::seed_participants(agents, size)?;

        let onchain_id = {
            let ledger = self.ledger.clone();
            let participants = participants.clone();
            ledger_call("create_tournament", || {
                let ledger = ledger.clone();
                let participants = participants.clone();
                async move { ledger.create_tournament(&participants, size).await }
            })
            .await?
        };

        let mut rng = Xorshift128Plus::seed(onchain_id.0);
        let pairings = bracket::build_pairings(&participants, &self.next_match_id, &mut rng);
        let id = TournamentId::default();
        let state = Bracket { onchain_id, round: 1, pairings: pairings.clone(), winners: HashMap::new(), status: TournamentStatus::Running, rng };
        self.tournaments.write().await.insert(id, Arc::new(Mutex::new(state)));
        log::info!("[pm_tournament::manager] tournament {id} created with {size} agents, onchain id {onchain_id}");
        self.start_round(id, pairings).await;
        Ok(id)
    }

    pub async fn active_tournament_count(&self) -> usize {
        self.tournaments.read().await.len()
    }

    /// Cancels every live tournament without advancing further; pending
    /// match jobs still run to completion, but their results are dropped
    /// (the map entry is gone by the time they arrive).
    pub async fn shutdown(&self) {
        self.tournaments.write().await.clear();
    }

    async fn start_round(self: &Arc<Self>, id: TournamentId, pairings: Vec<Pairing>) {
        let (room, onchain_id, round) = {
            let Some(bracket) = self.tournaments.read().await.get(&id).cloned() else { return };
            let bracket = bracket.lock().await;
            (format!("tournament:{id}"), bracket.onchain_id, bracket.round)
        };

        let matchups: Vec<_> = pairings
            .iter()
            .map(|p| {
                serde_json::json!({
                    "matchId": p.match_id.to_string(),
                    "agentA": p.agent_a.to_string(),
                    "agentB": p.agent_b.to_string(),
                    "variant": p.variant.to_string(),
                    "seed": p.seed,
                })
            })
            .collect();
        self.bus.broadcast(&room, "round_start", serde_json::json!({ "round": round, "matchups": matchups })).await;

        for pairing in &pairings {
            if let Err(err) = self
                .betting
                .open_betting_window(pairing.match_id, pairing.agent_a.clone(), pairing.agent_b.clone(), None)
                .await
            {
                log::warn!("[pm_tournament::manager] failed to open betting for {}: {err}", pairing.match_id);
            }
        }

        for pairing in pairings {
            let job = MatchJob {
                match_id: pairing.match_id,
                agent_a: pairing.agent_a,
                agent_b: pairing.agent_b,
                variant: pairing.variant.to_string(),
                seed: pairing.seed,
                tier: Tier::Three,
                tournament_id: onchain_id,
                round,
            };
            let manager = self.clone();
            tokio::spawn(async move { manager.run_match(id, job).await });
        }

        let manager = self.clone();
        tokio::spawn(async move { manager.supervise_round(id, round).await });
    }

    async fn run_match(self: Arc<Self>, id: TournamentId, job: MatchJob) {
        let match_id = job.match_id;
        let handle = match self.scheduler.schedule(job).await {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("[pm_tournament::manager] failed to schedule {match_id}: {err}");
                self.fail_tournament(id).await;
                return;
            }
        };
        match handle.await {
            Ok(result) => self.handle_match_result(id, result).await,
            Err(_) => log::warn!("[pm_tournament::manager] job handle for {match_id} dropped without a result"),
        }
    }

    /// Match-completion handling, in the order §4.4 specifies: replay
    /// upload, on-chain result, bet settlement, then winner bookkeeping.
    async fn handle_match_result(self: Arc<Self>, id: TournamentId, result: MatchResult) {
        let match_id = result.match_id;
        let winner = result.winner();

        let replay_uri = match self.blob.put(&result.replay_bytes).await {
            Ok(uri) => uri,
            Err(err) => {
                log::warn!("[pm_tournament::manager] replay upload failed for {match_id}: {err}");
                String::new()
            }
        };
        if let Err(err) = self
            .ledger
            .submit_result(MatchResultSubmission {
                match_id,
                score_a: result.score_a,
                score_b: result.score_b,
                winner,
                replay_uri,
            })
            .await
        {
            log::warn!("[pm_tournament::manager] submit_result failed for {match_id}: {err}");
        }
        if let Err(err) = self.betting.settle_bets(match_id, winner).await {
            log::warn!("[pm_tournament::manager] settle_bets failed for {match_id}: {err}");
        }

        let round_complete = {
            let Some(bracket) = self.tournaments.read().await.get(&id).cloned() else { return };
            let mut bracket = bracket.lock().await;
            if bracket.status != TournamentStatus::Running {
                return;
            }
            let Some(pairing) = bracket.pairings.iter().find(|p| p.match_id == match_id) else { return };
            let winner_addr = if winner == Side::AgentA { pairing.agent_a.clone() } else { pairing.agent_b.clone() };
            bracket.winners.insert(match_id, winner_addr);
            bracket.winners.len() == bracket.pairings.len()
        };

        let room = format!("tournament:{id}");
        self.bus
            .broadcast(
                &room,
                "match_result",
                serde_json::json!({
                    "matchId": match_id.to_string(),
                    "winner": winner.to_string(),
                    "scoreA": result.score_a,
                    "scoreB": result.score_b,
                    "gameLogHash": hex::encode(result.state_hash),
                }),
            )
            .await;

        if round_complete {
            self.advance(id).await;
        }
    }

    /// Advances a fully-resolved round: the final round (one winner left)
    /// submits `finalizeTournament` only; every other round submits
    /// `advanceTournament` and builds the next round's pairings over the
    /// survivors (§4.4 advancement — exactly one `advanceTournament` call
    /// per round boundary that is not the last).
    async fn advance(self: Arc<Self>, id: TournamentId) {
        let (onchain_id, winners, room) = {
            let Some(bracket) = self.tournaments.read().await.get(&id).cloned() else { return };
            let bracket = bracket.lock().await;
            let winners: Vec<AgentAddress> = bracket
                .pairings
                .iter()
                .map(|p| bracket.winners.get(&p.match_id).cloned().expect("round_complete implies every match has a winner"))
                .collect();
            (bracket.onchain_id, winners, format!("tournament:{id}"))
        };

        if winners.len() == 1 {
            let champion = winners[0].clone();
            let finalized = {
                let ledger = self.ledger.clone();
                let champion = champion.clone();
                ledger_call("finalize_tournament", || {
                    let ledger = ledger.clone();
                    let champion = champion.clone();
                    async move { ledger.finalize_tournament(onchain_id, &champion).await }
                })
                .await
            };
            if let Err(err) = finalized {
                log::error!("[pm_tournament::manager] {err}; marking tournament {id} failed");
                self.fail_tournament(id).await;
                return;
            }
            self.bus
                .broadcast(&room, "tournament_complete", serde_json::json!({ "tournamentId": onchain_id.to_string(), "champion": champion.to_string() }))
                .await;
            self.tournaments.write().await.remove(&id);
            log::info!("[pm_tournament::manager] tournament {id} complete, champion {champion}");
            return;
        }

        let advanced = {
            let ledger = self.ledger.clone();
            let winners = winners.clone();
            ledger_call("advance_tournament", || {
                let ledger = ledger.clone();
                let winners = winners.clone();
                async move { ledger.advance_tournament(onchain_id, &winners).await }
            })
            .await
        };
        if let Err(err) = advanced {
            log::error!("[pm_tournament::manager] {err}; marking tournament {id} failed");
            self.fail_tournament(id).await;
            return;
        }

        let next_round = {
            let Some(bracket) = self.tournaments.read().await.get(&id).cloned() else { return };
            let mut bracket = bracket.lock().await;
            let pairings = bracket::build_pairings(&winners, &self.next_match_id, &mut bracket.rng);
            bracket.round += 1;
            bracket.pairings = pairings.clone();
            bracket.winners.clear();
            (bracket.round, pairings)
        };
        self.bus
            .broadcast(&room, "tournament_advance", serde_json::json!({ "tournamentId": onchain_id.to_string(), "round": next_round.0 }))
            .await;
        self.start_round(id, next_round.1).await;
    }

    async fn fail_tournament(&self, id: TournamentId) {
        let room = format!("tournament:{id}");
        if let Some(bracket) = self.tournaments.read().await.get(&id) {
            bracket.lock().await.status = TournamentStatus::Failed;
        }
        self.bus.broadcast(&room, "tournament_failed", serde_json::json!({ "tournamentId": id.to_string() })).await;
        self.tournaments.write().await.remove(&id);
        log::error!("[pm_tournament::manager] tournament {id} marked failed");
    }

    /// Per-round supervisor timeout (§4.4): if a tournament is still on the
    /// same round after [`ROUND_SUPERVISOR_TIMEOUT`], a job never returned
    /// and the round is stalled.
    async fn supervise_round(self: Arc<Self>, id: TournamentId, round: u32) {
        tokio::time::sleep(ROUND_SUPERVISOR_TIMEOUT).await;
        let stalled = match self.tournaments.read().await.get(&id).cloned() {
            Some(bracket) => {
                let bracket = bracket.lock().await;
                bracket.status == TournamentStatus::Running && bracket.round == round
            }
            None => false,
        };
        if stalled {
            log::error!("[pm_tournament::manager] tournament {id} stalled on round {round} past its supervisor timeout");
            self.fail_tournament(id).await;
        }
    }
}
