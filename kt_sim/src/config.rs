//! Simulator configuration management.
//!
//! Reads every knob from the environment (after `.env` is loaded) and lets
//! command-line flags override them.

use kaali_teeri::{
    GameSettings,
    constants::{DEFAULT_PAUSE_SECS, DEFAULT_ROUND_LIMIT, MAX_PLAYERS, MIN_PLAYERS},
    room::RoomConfig,
};

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Rooms run side by side
    pub rooms: usize,
    /// Seats per room
    pub players: usize,
    pub round_limit: u32,
    /// Base seed; room `i` shuffles with `seed + i`
    pub seed: Option<u64>,
    /// When false, bots send an explicit `EndTurn` after every card
    pub auto_end_turn: bool,
    /// Give up on a room after this long
    pub timeout_secs: u64,
}

/// Values given on the command line; each wins over its environment variable.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub rooms: Option<usize>,
    pub players: Option<usize>,
    pub round_limit: Option<u32>,
    pub seed: Option<u64>,
    pub manual_end_turn: bool,
}

impl SimConfig {
    /// Load configuration from environment variables
    pub fn from_env(overrides: Overrides) -> Self {
        Self {
            rooms: overrides
                .rooms
                .unwrap_or_else(|| parse_env_or("SIM_ROOMS", 4)),
            players: overrides
                .players
                .unwrap_or_else(|| parse_env_or("SIM_PLAYERS", MIN_PLAYERS)),
            round_limit: overrides
                .round_limit
                .unwrap_or_else(|| parse_env_or("SIM_ROUND_LIMIT", DEFAULT_ROUND_LIMIT)),
            seed: overrides.seed.or_else(|| {
                std::env::var("SIM_SEED")
                    .ok()
                    .and_then(|v| v.parse().ok())
            }),
            auto_end_turn: !overrides.manual_end_turn && parse_env_or("SIM_AUTO_END_TURN", true),
            timeout_secs: parse_env_or("SIM_TIMEOUT_SECS", 60),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rooms == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_ROOMS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::Invalid {
                var: "SIM_PLAYERS".to_string(),
                reason: format!("Must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.room_config(0)
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "SIM_ROUND_LIMIT".to_string(),
                reason: e.to_string(),
            })
    }

    /// Room configuration for room number `index`.
    pub fn room_config(&self, index: usize) -> RoomConfig {
        RoomConfig {
            seed: self.seed.map(|seed| seed.wrapping_add(index as u64)),
            settings: GameSettings {
                round_limit: self.round_limit,
                pause_duration_secs: DEFAULT_PAUSE_SECS,
                auto_end_turn: self.auto_end_turn,
            },
            ..RoomConfig::default()
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
