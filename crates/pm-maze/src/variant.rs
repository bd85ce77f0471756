use pm_core::CoreError;

/// Which of the five layouts a maze was (or should be) built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MazeVariant {
    Classic,
    Labyrinth,
    Speedway,
    Fortress,
    Random,
}

impl MazeVariant {
    pub const ALL: [MazeVariant; 5] = [
        MazeVariant::Classic,
        MazeVariant::Labyrinth,
        MazeVariant::Speedway,
        MazeVariant::Fortress,
        MazeVariant::Random,
    ];

    pub fn is_fixed(&self) -> bool {
        !matches!(self, MazeVariant::Random)
    }
}

impl std::fmt::Display for MazeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MazeVariant::Classic => write!(f, "classic"),
            MazeVariant::Labyrinth => write!(f, "labyrinth"),
            MazeVariant::Speedway => write!(f, "speedway"),
            MazeVariant::Fortress => write!(f, "fortress"),
            MazeVariant::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for MazeVariant {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(MazeVariant::Classic),
            "labyrinth" => Ok(MazeVariant::Labyrinth),
            "speedway" => Ok(MazeVariant::Speedway),
            "fortress" => Ok(MazeVariant::Fortress),
            "random" => Ok(MazeVariant::Random),
            other => Err(CoreError::invalid_argument(format!(
                "unknown maze variant {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_parse() {
        for variant in MazeVariant::ALL {
            let parsed: MazeVariant = variant.to_string().parse().unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn unknown_variant_is_invalid_argument() {
        let err = "nightmare".parse::<MazeVariant>().unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }
}
