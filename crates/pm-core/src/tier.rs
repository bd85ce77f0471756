use crate::error::CoreError;

/// Difficulty level 1–5, controlling ghost speed, chase/scatter cadence,
/// power-pellet duration, and whether higher-tier coordination (the LLM
/// advisor) is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Tier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Tier {
    pub fn from_u8(value: u8) -> Result<Self, CoreError> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            other => Err(CoreError::invalid_argument(format!("invalid tier {other}"))),
        }
    }

    /// Multiplier applied to every ghost's base speed.
    pub fn ghost_speed_multiplier(&self) -> f32 {
        match self {
            Tier::One => 0.75,
            Tier::Two => 0.85,
            Tier::Three => 0.95,
            Tier::Four => 1.00,
            Tier::Five => 1.05,
        }
    }

    /// Seconds a power pellet's frightened phase lasts at this tier.
    pub fn power_seconds(&self) -> u32 {
        match self {
            Tier::One => 8,
            Tier::Two => 6,
            Tier::Three => 4,
            Tier::Four => 2,
            Tier::Five => 1,
        }
    }

    /// Whether this tier's ghosts consult the external LLM advisor. The
    /// canonical deterministic engine never calls the advisor itself (see
    /// §4.2); this flag is exposed for a hosting layer that wants to wrap
    /// ghost decisions with advisor input before feeding them to the engine.
    pub fn uses_advisor(&self) -> bool {
        matches!(self, Tier::Four | Tier::Five)
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Three
    }
}
