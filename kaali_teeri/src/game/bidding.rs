//! Ascending auction with permanent skips.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::constants::{MAX_BID, MIN_BID};
use super::entities::PlayerId;
use super::errors::GameError;
use super::seating::next_seat;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingState {
    pub bids: BTreeMap<PlayerId, u32>,
    pub winner_id: Option<PlayerId>,
    pub value: Option<u32>,
    pub skipped: BTreeSet<PlayerId>,
}

/// What the auction does after a bid or skip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BidOutcome {
    /// Turn passes to this player.
    Next(PlayerId),
    /// Auction over; `winner` is `None` when nobody bid at all.
    Closed { winner: Option<PlayerId> },
}

impl BiddingState {
    /// Records a bid. Turn and phase are checked by the caller.
    pub fn place_bid(
        &mut self,
        order: &[PlayerId],
        player: &PlayerId,
        value: u32,
    ) -> Result<BidOutcome, GameError> {
        if !(MIN_BID..=MAX_BID).contains(&value) {
            return Err(GameError::InvalidBid { value });
        }

        self.bids.insert(player.clone(), value);
        // Ties keep the earlier bidder.
        if self.value.is_none_or(|current| value > current) {
            self.winner_id = Some(player.clone());
            self.value = Some(value);
        }

        if value == MAX_BID {
            self.skipped.extend(order.iter().cloned());
            return Ok(BidOutcome::Closed {
                winner: self.winner_id.clone(),
            });
        }

        Ok(self.advance(order, player))
    }

    /// Marks `player` out of the auction for the rest of the round. A standing
    /// high bid stays standing.
    pub fn skip(&mut self, order: &[PlayerId], player: &PlayerId) -> BidOutcome {
        self.skipped.insert(player.clone());
        self.advance(order, player)
    }

    /// First seat after `from` that hasn't skipped. `from` itself is eligible
    /// again once the turn comes all the way round.
    #[must_use]
    pub fn next_eligible(&self, order: &[PlayerId], from: &PlayerId) -> Option<PlayerId> {
        let mut cursor = from.clone();
        for _ in 0..order.len() {
            cursor = next_seat(order, &cursor)?;
            if !self.skipped.contains(&cursor) {
                return Some(cursor);
            }
        }
        None
    }

    fn advance(&self, order: &[PlayerId], from: &PlayerId) -> BidOutcome {
        match self.next_eligible(order, from) {
            Some(next) => BidOutcome::Next(next),
            None => BidOutcome::Closed {
                winner: self.winner_id.clone(),
            },
        }
    }
}
