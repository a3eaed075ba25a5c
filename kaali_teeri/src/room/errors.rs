//! Room actor and registry errors.

use thiserror::Error;

use super::config::ConfigError;
use super::store::StoreError;
use crate::game::GameError;

pub type RoomResult<T> = Result<T, RoomError>;

#[derive(Debug, Error)]
pub enum RoomError {
    /// The actor has stopped; the handle is stale.
    #[error("Room {0} is closed")]
    Closed(String),

    #[error("Room {0} not found")]
    NotFound(String),

    #[error("Room {0} already exists")]
    AlreadyExists(String),

    #[error("Invalid room code: {0:?}")]
    InvalidCode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The command reached the room and was rejected by the rules.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RoomError {
    /// The rule rejection, if that's what this is.
    #[must_use]
    pub fn as_game_error(&self) -> Option<&GameError> {
        match self {
            Self::Game(e) => Some(e),
            _ => None,
        }
    }
}
