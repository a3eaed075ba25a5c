//! Rule engine: cards, auction, partner selection, tricks and scoring, tied
//! together by the [`Room`] state machine.
//!
//! Everything in here is synchronous and free of I/O. The leaf modules are
//! pure functions over plain data; [`Room`] owns the state and is the only
//! thing that mutates it.

pub mod bidding;
pub mod commands;
pub mod constants;
pub mod deck;
pub mod entities;
pub mod errors;
pub mod partners;
pub mod scoring;
pub mod seating;
pub mod snapshot;
pub mod state_machine;
pub mod tricks;

pub use commands::{Command, CommandKind, LegalActions};
pub use errors::{CallRejection, GameError, MoveRejection};
pub use snapshot::RoomSnapshot;
pub use state_machine::{GameEvent, GameSettings, Room};
