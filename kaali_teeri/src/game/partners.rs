//! Hidden partner nominations and trump confirmation checks.

use std::collections::BTreeSet;

use super::entities::{Card, PartnerCall, Rank, Suit};
use super::errors::{CallRejection, GameError};

/// Partner cards the bidder must call at a table of `player_count`.
#[must_use]
pub fn required_calls(player_count: usize) -> usize {
    if player_count <= 5 { 1 } else { 2 }
}

/// Validates a new call against the bidder's current hand and the calls
/// already made.
pub fn validate_call(
    rank_token: &str,
    suit: Suit,
    bidder_hand: &BTreeSet<Card>,
    calls: &[PartnerCall],
    required: usize,
) -> Result<PartnerCall, GameError> {
    let rank = Rank::parse_token(rank_token)
        .ok_or_else(|| GameError::call(CallRejection::UnknownRank(rank_token.to_string())))?;
    let call = PartnerCall { rank, suit };

    if bidder_hand.contains(&call.card()) {
        return Err(GameError::call(CallRejection::HeldByBidder));
    }
    if calls.contains(&call) {
        return Err(GameError::call(CallRejection::Duplicate));
    }
    if calls.len() >= required {
        return Err(GameError::call(CallRejection::LimitReached { required }));
    }

    Ok(call)
}

/// Trump can only be fixed once exactly the required calls are in.
pub fn validate_confirm(calls: &[PartnerCall], required: usize) -> Result<(), GameError> {
    if calls.len() != required {
        return Err(GameError::call(CallRejection::WrongCount {
            required,
            called: calls.len(),
        }));
    }
    Ok(())
}

/// Whether `card` is one of the called partner cards.
#[must_use]
pub fn is_called(calls: &[PartnerCall], card: Card) -> bool {
    calls.iter().any(|call| call.card() == card)
}
