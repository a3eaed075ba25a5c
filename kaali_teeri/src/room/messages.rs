//! Room actor message types.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::game::{
    Command, GameError, LegalActions, RoomSnapshot,
    entities::{Phase, PlayerId, RoundResult},
};

pub type CommandReply = Result<RoomSnapshot, GameError>;

/// Messages that can be sent to a RoomActor
#[derive(Debug)]
pub enum RoomMessage {
    /// Player command; answered with the post-commit snapshot or the rejection
    Command {
        player_id: PlayerId,
        command: Command,
        response: oneshot::Sender<CommandReply>,
    },

    /// Current snapshot, redacted for `viewer` when given
    GetSnapshot {
        viewer: Option<PlayerId>,
        response: oneshot::Sender<RoomSnapshot>,
    },

    LegalCommands {
        player_id: PlayerId,
        response: oneshot::Sender<LegalActions>,
    },

    /// Append-only round history
    GetHistory {
        response: oneshot::Sender<Vec<RoundResult>>,
    },

    GetInfo {
        response: oneshot::Sender<RoomInfo>,
    },

    /// Subscribe to state change notifications
    Subscribe {
        subscriber_id: Uuid,
        sender: mpsc::Sender<StateChangeNotification>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { subscriber_id: Uuid },

    /// Stop the actor after answering
    Close { response: oneshot::Sender<()> },
}

/// Notification sent when room state changes
#[derive(Debug, Clone)]
pub enum StateChangeNotification {
    /// A command was committed
    StateChanged(Arc<RoomSnapshot>),
    /// Player joined or left
    PlayerListChanged,
    RoundCompleted(RoundResult),
    GameEnded,
    /// The actor stopped; no more notifications follow
    Closed,
}

/// Room summary for discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub code: String,
    pub host_id: PlayerId,
    pub phase: Phase,
    pub round: u32,
    pub player_count: usize,
}
