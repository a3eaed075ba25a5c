//! Rule engine error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entities::Phase;

/// Why a card play or end-of-turn was refused.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MoveRejection {
    CardNotInHand,
    MustFollowSuit,
    AlreadyPlayed,
    NothingToEnd,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CardNotInHand => "card not in hand",
            Self::MustFollowSuit => "must follow the led suit",
            Self::AlreadyPlayed => "already played this turn",
            Self::NothingToEnd => "play a card before ending the turn",
        };
        f.write_str(repr)
    }
}

/// Why a partner call or trump confirmation was refused.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CallRejection {
    UnknownRank(String),
    HeldByBidder,
    Duplicate,
    LimitReached { required: usize },
    WrongCount { required: usize, called: usize },
}

impl fmt::Display for CallRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRank(token) => write!(f, "unknown rank {token:?}"),
            Self::HeldByBidder => f.write_str("you hold that card"),
            Self::Duplicate => f.write_str("card already called"),
            Self::LimitReached { required } => {
                write!(f, "already called {required} partner card(s)")
            }
            Self::WrongCount { required, called } => {
                write!(f, "must call {required} partner card(s), called {called}")
            }
        }
    }
}

/// Errors returned for rejected commands. A rejected command never leaves a
/// partial change behind.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("bid {value} outside 150..=250")]
    InvalidBid { value: u32 },
    #[error("illegal move: {reason}")]
    IllegalMove { reason: MoveRejection },
    #[error("invalid partner call: {reason}")]
    InvalidCall { reason: CallRejection },
    #[error("not allowed during {actual}, need {expected}")]
    PhaseViolation { expected: Phase, actual: Phase },
    #[error("room is full")]
    RoomFull,
    #[error("only the bid winner can do that")]
    NotBidder,
    #[error("not your turn")]
    NotTurn,
    #[error("player is not in this room")]
    UnknownPlayer,
    #[error("{0} players can't be dealt, need 4 to 8")]
    UnsupportedPlayerCount(usize),
    #[error("can't read card {0:?}")]
    InvalidCard(String),
    #[error("can't read suit {0:?}")]
    InvalidSuit(String),
}

impl GameError {
    /// Stable machine-readable code for transports.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBid { .. } => "INVALID_BID",
            Self::IllegalMove { .. } => "ILLEGAL_MOVE",
            Self::InvalidCall { .. } => "INVALID_CALL",
            Self::PhaseViolation { .. } => "PHASE_VIOLATION",
            Self::RoomFull => "ROOM_FULL",
            Self::NotBidder => "NOT_BIDDER",
            Self::NotTurn => "NOT_TURN",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::UnsupportedPlayerCount(_) => "UNSUPPORTED_PLAYER_COUNT",
            Self::InvalidCard(_) => "INVALID_CARD",
            Self::InvalidSuit(_) => "INVALID_SUIT",
        }
    }

    pub(crate) fn illegal(reason: MoveRejection) -> Self {
        Self::IllegalMove { reason }
    }

    pub(crate) fn call(reason: CallRejection) -> Self {
        Self::InvalidCall { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::PhaseViolation {
            expected: Phase::Bidding,
            actual: Phase::Lobby,
        };
        assert_eq!(err.to_string(), "not allowed during lobby, need bidding");

        let err = GameError::call(CallRejection::WrongCount {
            required: 2,
            called: 1,
        });
        assert!(err.to_string().contains("must call 2"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GameError::RoomFull.code(), "ROOM_FULL");
        assert_eq!(
            GameError::illegal(MoveRejection::MustFollowSuit).code(),
            "ILLEGAL_MOVE"
        );
        assert_eq!(GameError::InvalidBid { value: 10 }.code(), "INVALID_BID");
    }
}
