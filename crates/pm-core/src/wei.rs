use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::ops::Add;

/// A wei-denominated amount. Wagers run up to 10^19 wei (§6), comfortably
/// past `u64`'s range, so the internal model keeps amounts as an arbitrary
/// precision unsigned integer and only stringifies at the broadcast/ledger
/// boundary, per the design note on BigInt handling in §9.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Wei(BigUint);

impl Wei {
    pub fn zero() -> Self {
        Wei(BigUint::zero())
    }

    pub fn from_u128(value: u128) -> Self {
        Wei(BigUint::from(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Decimal string form, the only representation that crosses the
    /// broadcast boundary (e.g. `bets_settled {totalPool: "3000000000000000000"}`).
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }

    /// Ratio `self / other` as `f64`, used for pari-mutuel odds. Returns
    /// `None` if `other` is zero.
    pub fn ratio(&self, other: &Wei) -> Option<f64> {
        if other.is_zero() {
            return None;
        }
        // Both sides are well within f64's safe integer range for realistic
        // pool sizes; odds are a UX quantity, not an on-chain settlement.
        let a: f64 = self.0.to_string().parse().unwrap_or(f64::MAX);
        let b: f64 = other.0.to_string().parse().unwrap_or(1.0);
        Some(a / b)
    }
}

impl Add for Wei {
    type Output = Wei;
    fn add(self, rhs: Wei) -> Wei {
        Wei(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Wei> for &'a Wei {
    type Output = Wei;
    fn add(self, rhs: &'a Wei) -> Wei {
        Wei(&self.0 + &rhs.0)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Wei::from_u128(value)
    }
}

impl serde::Serialize for Wei {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> serde::Deserialize<'de> for Wei {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<BigUint>()
            .map(Wei)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringifies_large_amounts_exactly() {
        let w = Wei::from_u128(10_000_000_000_000_000_000);
        assert_eq!(w.to_decimal_string(), "10000000000000000000");
    }

    #[test]
    fn odds_ratio() {
        let total = Wei::from_u128(3_000_000_000_000_000_000);
        let side_a = Wei::from_u128(2_000_000_000_000_000_000);
        let odds_a = total.ratio(&side_a).unwrap();
        assert!((odds_a - 1.5).abs() < 1e-9);
    }

    #[test]
    fn empty_side_has_no_ratio() {
        let total = Wei::from_u128(5);
        assert_eq!(total.ratio(&Wei::zero()), None);
    }
}
