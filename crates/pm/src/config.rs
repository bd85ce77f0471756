use std::time::Duration;

/// The small typed surface over the constants a host process would
/// otherwise hardcode (§1 EXPANSION): tick rate override for tests, bracket
/// sizes, betting window bounds. Everything else in §6's "Fixed constants"
/// table is genuinely fixed and stays in [`pm_core::constants`].
#[derive(Debug, Clone)]
pub struct Config {
    pub tick_period: Duration,
    pub bracket_sizes: Vec<usize>,
    pub bet_window_seconds_min: u64,
    pub bet_window_seconds_max: u64,
    pub challenge_max_concurrent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period: pm_core::constants::TICK_PERIOD,
            bracket_sizes: pm_core::constants::BRACKET_SIZES.to_vec(),
            bet_window_seconds_min: pm_core::constants::BET_WINDOW_SECONDS_MIN,
            bet_window_seconds_max: pm_core::constants::BET_WINDOW_SECONDS_MAX,
            challenge_max_concurrent: pm_core::constants::CHALLENGE_MAX_CONCURRENT,
        }
    }
}

impl Config {
    /// A configuration with an accelerated tick rate, for tests that want
    /// to observe many ticks without waiting out real wall-clock time.
    pub fn accelerated(tick_period: Duration) -> Self {
        Self { tick_period, ..Self::default() }
    }
}
