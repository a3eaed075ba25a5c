//! Room configuration models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::GameSettings;

/// Default inbox size for each room actor.
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Default per-subscriber notification buffer.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Inbox capacity must be at least 1")]
    ZeroInboxCapacity,

    #[error("Subscriber buffer must be at least 1")]
    ZeroSubscriberBuffer,

    #[error("Invalid game settings: {0}")]
    Settings(String),
}

/// Room configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Bounded inbox size; senders wait once it is full.
    pub inbox_capacity: usize,

    /// Notifications buffered per subscriber before new ones are dropped.
    pub subscriber_buffer: usize,

    /// Fixed shuffle seed, for reproducible rooms.
    pub seed: Option<u64>,

    pub settings: GameSettings,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            seed: None,
            settings: GameSettings::default(),
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inbox_capacity == 0 {
            return Err(ConfigError::ZeroInboxCapacity);
        }
        if self.subscriber_buffer == 0 {
            return Err(ConfigError::ZeroSubscriberBuffer);
        }
        self.settings.validate().map_err(ConfigError::Settings)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
