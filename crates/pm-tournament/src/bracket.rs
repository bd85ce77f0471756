use crate::types::Pairing;
use pm_core::CoreError;
use pm_core::MatchId;
use pm_core::Xorshift128Plus;
use pm_ext::AgentAddress;
use pm_ext::AgentInfo;
use pm_maze::MazeVariant;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Sorts by reputation descending, registry order breaking ties (`sort_by`
/// is stable), and takes the top `size`. Fails `insufficient_agents` if
/// fewer than `size` are active (§4.4 construction).
pub fn seed_participants(mut agents: Vec<(AgentAddress, AgentInfo)>, size: usize) -> Result<Vec<AgentAddress>, CoreError> {
    if agents.len() < size {
        return Err(CoreError::InsufficientAgents { wanted: size, available: agents.len() });
    }
    agents.sort_by(|a, b| b.1.reputation.cmp(&a.1.reputation));
    Ok(agents.into_iter().take(size).map(|(addr, _)| addr).collect())
}

/// Pairs `agents[2i]` against `agents[2i+1]`, assigning each pairing a fresh
/// monotonic match id and a variant/seed drawn from `rng`. Called both for
/// the opening round and for every advancement round over survivors; `rng`
/// is the tournament's own deterministic stream (seeded once from the
/// ledger's onchain tournament id, §8 P1/P6) so replaying the same
/// tournament reproduces the same pairings every time, the same way the
/// engine and maze generator never touch `rand::rng()` mid-match.
pub fn build_pairings(agents: &[AgentAddress], next_match_id: &AtomicU64, rng: &mut Xorshift128Plus) -> Vec<Pairing> {
    agents
        .chunks_exact(2)
        .map(|pair| Pairing {
            match_id: MatchId(next_match_id.fetch_add(1, Ordering::SeqCst)),
            agent_a: pair[0].clone(),
            agent_b: pair[1].clone(),
            variant: *rng.pick(&MazeVariant::ALL),
            seed: rng.next_below(1_000_000),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str, reputation: i64) -> (AgentAddress, AgentInfo) {
        (
            AgentAddress(name.into()),
            AgentInfo { owner: "owner".into(), name: name.into(), wins: 0, losses: 0, reputation, active: true },
        )
    }

    #[test]
    fn seeding_takes_the_top_n_by_reputation() {
        let agents = vec![agent("a", 10), agent("b", 99), agent("c", 50), agent("d", 1)];
        let seeded = seed_participants(agents, 2).unwrap();
        assert_eq!(seeded, vec![AgentAddress("b".into()), AgentAddress("c".into())]);
    }

    #[test]
    fn equal_reputations_keep_registry_order() {
        let agents = vec![agent("a", 5), agent("b", 5), agent("c", 5)];
        let seeded = seed_participants(agents, 3).unwrap();
        assert_eq!(seeded, vec![AgentAddress("a".into()), AgentAddress("b".into()), AgentAddress("c".into())]);
    }

    #[test]
    fn too_few_agents_is_rejected() {
        let agents = vec![agent("a", 1), agent("b", 2)];
        let err = seed_participants(agents, 8).unwrap_err();
        assert_eq!(err.kind(), "insufficient_agents");
    }

    #[test]
    fn eight_agents_pair_into_four_matchups_with_unique_ids() {
        let agents: Vec<_> = (0..8).map(|i| AgentAddress(format!("agent-{i}"))).collect();
        let counter = AtomicU64::new(0);
        let mut rng = Xorshift128Plus::seed(1);
        let pairings = build_pairings(&agents, &counter, &mut rng);
        assert_eq!(pairings.len(), 4);
        assert_eq!(pairings[0].agent_a, agents[0]);
        assert_eq!(pairings[0].agent_b, agents[1]);
        let ids: std::collections::HashSet<_> = pairings.iter().map(|p| p.match_id).collect();
        assert_eq!(ids.len(), 4);
    }
}
