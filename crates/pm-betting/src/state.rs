use pm_core::Wei;
use pm_ext::Side;

/// The one-way phases a betting session moves through (§4.5). Every
/// transition below fires at most once; a phase is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Open,
    Locked,
    Settled,
}

/// A live match's wagering pool. Totals tracked here are a UX mirror of the
/// authoritative ledger-side pool (§4.5); nothing here is consulted to
/// decide a payout.
#[derive(Debug, Clone)]
pub struct Pool {
    pub phase: Phase,
    pub side_a: Wei,
    pub side_b: Wei,
    pub bets_a: u32,
    pub bets_b: u32,
}

impl Pool {
    pub fn new() -> Self {
        Self {
            phase: Phase::Open,
            side_a: Wei::zero(),
            side_b: Wei::zero(),
            bets_a: 0,
            bets_b: 0,
        }
    }

    pub fn total(&self) -> Wei {
        &self.side_a + &self.side_b
    }

    pub fn record(&mut self, side: Side, amount: Wei) {
        match side {
            Side::AgentA => {
                self.side_a = &self.side_a + &amount;
                self.bets_a += 1;
            }
            Side::AgentB => {
                self.side_b = &self.side_b + &amount;
                self.bets_b += 1;
            }
        }
    }

    /// `(oddsA, oddsB)` per the glossary's pari-mutuel formula, with the
    /// 99.99 sentinel on an empty side and the 2.0/2.0 baseline when the
    /// whole pool is still empty (§4.5).
    pub fn odds(&self) -> (f64, f64) {
        odds_for(&self.side_a, &self.side_b)
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure odds computation, factored out of [`Pool`] so it can be exercised
/// directly against the boundary cases in §4.5 without standing up a whole
/// session.
pub fn odds_for(side_a: &Wei, side_b: &Wei) -> (f64, f64) {
    let total = side_a + side_b;
    if total.is_zero() {
        return (2.0, 2.0);
    }
    let odds_a = total.ratio(side_a).unwrap_or(99.99);
    let odds_b = total.ratio(side_b).unwrap_or(99.99);
    (odds_a, odds_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn an_untouched_pool_quotes_even_money_on_both_sides() {
        let pool = Pool::new();
        assert_eq!(pool.odds(), (2.0, 2.0));
    }

    #[test]
    fn a_lopsided_pool_quotes_long_odds_on_the_empty_side() {
        let (odds_a, odds_b) = odds_for(&Wei::from_u128(5_000_000_000_000_000_000), &Wei::zero());
        assert!((odds_a - 1.0).abs() < 1e-9);
        assert_eq!(odds_b, 99.99);
    }

    #[test]
    fn matching_the_scenario_s3_pool_quotes_one_point_five_and_three() {
        let mut pool = Pool::new();
        pool.record(Side::AgentA, Wei::from_u128(2_000_000_000_000_000_000));
        pool.record(Side::AgentB, Wei::from_u128(1_000_000_000_000_000_000));
        let (odds_a, odds_b) = pool.odds();
        assert!((odds_a - 1.5).abs() < 1e-6);
        assert!((odds_b - 3.0).abs() < 1e-6);
        assert_eq!(pool.total().to_decimal_string(), "3000000000000000000");
    }

    #[test]
    fn recording_a_bet_increments_that_side_count_only() {
        let mut pool = Pool::new();
        pool.record(Side::AgentA, Wei::from_u128(10));
        pool.record(Side::AgentA, Wei::from_u128(10));
        pool.record(Side::AgentB, Wei::from_u128(10));
        assert_eq!(pool.bets_a, 2);
        assert_eq!(pool.bets_b, 1);
    }

    proptest! {
        #[test]
        fn odds_are_never_below_even_money_unless_they_are_the_sentinel(
            a in 0u128..10_000_000_000_000_000_000u128,
            b in 0u128..10_000_000_000_000_000_000u128,
        ) {
            let (odds_a, odds_b) = odds_for(&Wei::from_u128(a), &Wei::from_u128(b));
            if a == 0 && b == 0 {
                prop_assert_eq!(odds_a, 2.0);
                prop_assert_eq!(odds_b, 2.0);
            } else {
                prop_assert!(odds_a >= 1.0 || odds_a == 99.99);
                prop_assert!(odds_b >= 1.0 || odds_b == 99.99);
            }
        }
    }
}
