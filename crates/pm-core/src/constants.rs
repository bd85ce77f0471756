//! Fixed constants shared across every component, per the wire/data contract.
#![allow(dead_code)]

/// Maze width in tiles.
pub const GRID_W: usize = 28;
/// Maze height in tiles.
pub const GRID_H: usize = 31;
/// Row carrying both tunnel ends.
pub const TUNNEL_ROW: usize = 14;

/// Simulation tick rate in Hz.
pub const TICK_HZ: u32 = 60;
/// Simulation tick period, for host processes that need a real duration.
pub const TICK_PERIOD: std::time::Duration = std::time::Duration::from_nanos(1_000_000_000 / TICK_HZ as u64);

/// Pac-Man's base speed, in tiles per second, before any tier scaling (the
/// spec ties tier scaling only to ghosts; Pac-Man's pace is fixed).
pub const PACMAN_BASE_SPEED: f32 = 8.0;
/// A ghost's base speed, in tiles per second, before tier and mode scaling.
pub const GHOST_BASE_SPEED: f32 = 8.0;
/// Speed multiplier applied to a ghost while `frightened`.
pub const GHOST_FRIGHTENED_SPEED_MULTIPLIER: f32 = 0.5;
/// Speed multiplier applied to a ghost while `eaten` and returning to spawn.
pub const GHOST_EATEN_SPEED_MULTIPLIER: f32 = 2.0;
/// A ghost is considered at a tile boundary, eligible to pick a new
/// direction, below this sub-tile progress.
pub const GHOST_BOUNDARY_EPSILON: f32 = 0.01;

/// Starting lives per match.
pub const INITIAL_LIVES: u8 = 3;
/// Score threshold at which one extra life is awarded, once.
pub const EXTRA_LIFE_THRESHOLD: u32 = 10_000;

/// Points for a normal pellet.
pub const PELLET_POINTS: u32 = 10;
/// Points for a power pellet.
pub const POWER_PELLET_POINTS: u32 = 50;
/// Points awarded for the Nth ghost eaten during one power phase, saturating.
pub const GHOST_COMBO_POINTS: [u32; 4] = [200, 400, 800, 1600];

/// Inclusive range of fruit point values.
pub const FRUIT_POINTS_MIN: u32 = 100;
pub const FRUIT_POINTS_MAX: u32 = 500;
/// Ticks a spawned fruit remains on the board before expiring uneaten.
pub const FRUIT_LIFETIME_TICKS: u32 = 600;
/// Pellets-eaten counts that trigger a fruit spawn, each once per round.
pub const FRUIT_SPAWN_THRESHOLDS: [u32; 2] = [70, 170];
/// Tile a fruit spawns on.
pub const FRUIT_POSITION: (i32, i32) = (14, 17);

/// Pac-Man's fixed spawn tile.
pub const PACMAN_SPAWN: (i32, i32) = (14, 23);

/// Inclusive bounds, in seconds, for an unspecified betting window.
pub const BET_WINDOW_SECONDS_MIN: u64 = 30;
pub const BET_WINDOW_SECONDS_MAX: u64 = 60;
/// Cadence of the live-odds broadcast while a window is open.
pub const ODDS_BROADCAST_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Minimum and maximum wager, in wei.
pub const MIN_BET_WEI: u128 = 1_000_000_000_000_000; // 10^15
pub const MAX_BET_WEI: u128 = 10_000_000_000_000_000_000; // 10^19

/// Bracket sizes the tournament controller accepts.
pub const BRACKET_SIZES: [usize; 2] = [8, 16];

/// Default per-round supervisor timeout before a tournament is marked failed.
pub const ROUND_SUPERVISOR_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30 * 60);
/// Bounded retry budget for ledger calls.
pub const LEDGER_RETRY_ATTEMPTS: u32 = 5;
pub const LEDGER_RETRY_BASE: std::time::Duration = std::time::Duration::from_secs(1);
pub const LEDGER_RETRY_CAP: std::time::Duration = std::time::Duration::from_secs(30);

/// Challenge match constants (§4.6).
pub const CHALLENGE_MAX_CONCURRENT: usize = 10;
pub const CHALLENGE_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);
pub const CHALLENGE_MAX_DURATION: std::time::Duration = std::time::Duration::from_secs(5 * 60);
pub const CHALLENGE_RECONNECT_GRACE: std::time::Duration = std::time::Duration::from_secs(10);
pub const CHALLENGE_COUNTDOWN: std::time::Duration = std::time::Duration::from_secs(3);
pub const CHALLENGE_BET_WINDOW: std::time::Duration = std::time::Duration::from_secs(30);
