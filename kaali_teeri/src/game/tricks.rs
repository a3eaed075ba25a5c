//! Follow-suit legality and trick resolution.

use std::collections::BTreeSet;

use super::entities::{Card, Play, Suit};
use super::errors::MoveRejection;

#[must_use]
pub fn led_suit(table: &[Play]) -> Option<Suit> {
    table.first().map(|play| play.card.suit)
}

/// Checks that `card` may go on `table` from `hand`. The leader plays
/// anything; followers must match the led suit while they hold it.
pub fn check_play(hand: &BTreeSet<Card>, table: &[Play], card: Card) -> Result<(), MoveRejection> {
    if !hand.contains(&card) {
        return Err(MoveRejection::CardNotInHand);
    }
    if let Some(led) = led_suit(table)
        && card.suit != led
        && hand.iter().any(|c| c.suit == led)
    {
        return Err(MoveRejection::MustFollowSuit);
    }
    Ok(())
}

/// Every card in `hand` that may legally be played on `table`.
#[must_use]
pub fn legal_cards(hand: &BTreeSet<Card>, table: &[Play]) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|card| check_play(hand, table, *card).is_ok())
        .collect()
}

/// Winner of a trick: highest trump if any trump was played, otherwise the
/// highest card of the led suit. Off-suit discards never win.
#[must_use]
pub fn trick_winner(table: &[Play], trump: Suit) -> Option<&Play> {
    let led = led_suit(table)?;
    let best_of = |suit: Suit| {
        table
            .iter()
            .filter(|play| play.card.suit == suit)
            .max_by_key(|play| play.card.rank)
    };
    best_of(trump).or_else(|| best_of(led))
}

/// Sum of card points on the table.
#[must_use]
pub fn trick_points(table: &[Play]) -> u32 {
    table.iter().map(|play| play.card.points()).sum()
}
