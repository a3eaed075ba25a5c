//! Serializable room snapshot handed to persistence and replication layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bidding::BiddingState;
use super::entities::{Card, PartnerCall, PauseMarker, Phase, Play, Player, PlayerId, RoundResult, Suit};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub code: String,
    pub host_id: PlayerId,
    pub phase: Phase,
    pub round: u32,
    pub dealer_id: Option<PlayerId>,
    pub turn: Option<PlayerId>,
    /// Stable seating order; the maps below don't carry it.
    pub seats: Vec<PlayerId>,
    pub players: BTreeMap<PlayerId, Player>,
    pub hands: BTreeMap<PlayerId, Vec<Card>>,
    pub table: Vec<Play>,
    pub piles: BTreeMap<PlayerId, u32>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub bidding: Option<BiddingState>,
    pub trump: Option<Suit>,
    pub partner_calls: Vec<PartnerCall>,
    pub revealed_partners: Vec<PlayerId>,
    pub last_round: Option<RoundResult>,
    pub timeout: Option<PauseMarker>,
}

impl RoomSnapshot {
    /// Copy safe to send to `viewer`: every other player's hand is emptied.
    #[must_use]
    pub fn redacted_for(&self, viewer: &PlayerId) -> Self {
        let mut view = self.clone();
        for (id, hand) in &mut view.hands {
            if id != viewer {
                hand.clear();
            }
        }
        view
    }

    /// Cards still in hands plus cards on the table.
    #[must_use]
    pub fn cards_in_play(&self) -> usize {
        self.hands.values().map(Vec::len).sum::<usize>() + self.table.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
