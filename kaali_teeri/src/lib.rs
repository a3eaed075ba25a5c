//! # Kaali Teeri
//!
//! Authoritative rule engine for Kaali Teeri, a "56"-family trick-taking
//! game for 4 to 8 players: an ascending auction, hidden partners named by
//! card, trump tricks and threshold scoring.
//!
//! ## Architecture
//!
//! A room moves through five phases:
//!
//! - **Lobby**: players join and mark themselves ready
//! - **Bidding**: ascending auction from 150 to 250, skips are permanent
//! - **PartnerTrump**: the bid winner calls partner cards and names trump
//! - **Playing**: tricks until every hand is empty, then scoring
//! - **Ended**: the round limit has been passed
//!
//! ## Core Modules
//!
//! - [`game`]: cards, rules and the [`Room`] state machine
//! - [`room`]: per-room actors, the room registry and snapshot storage
//! - [`utils`]: room codes
//!
//! ## Example
//!
//! ```
//! use kaali_teeri::{Command, GameSettings, PlayerId, Room, entities::Phase};
//!
//! let mut room = Room::create("MAIN", PlayerId::new("a"), "A", GameSettings::default());
//! for id in ["b", "c", "d"] {
//!     room.apply(&PlayerId::new(id), Command::JoinRoom { name: id.into() }).unwrap();
//! }
//! for id in ["a", "b", "c", "d"] {
//!     room.apply(&PlayerId::new(id), Command::SetReady).unwrap();
//! }
//! assert_eq!(room.phase(), Phase::Bidding);
//! assert_eq!(room.turn(), Some(&PlayerId::new("b")));
//! ```

/// Rule engine and room state machine.
pub mod game;
pub use game::{
    Command, CommandKind, GameError, GameEvent, GameSettings, LegalActions, Room, RoomSnapshot,
    constants,
    entities::{self, Card, PlayerId, Rank, Suit},
};

/// Per-room actors and registry.
pub mod room;

pub mod utils;
