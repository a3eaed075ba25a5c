//! Deck building and dealing.

use rand::{Rng, seq::SliceRandom};
use std::collections::{BTreeSet, HashMap};

use super::constants::{MAX_PLAYERS, MIN_PLAYERS};
use super::entities::{Card, PlayerId, Rank, Suit};
use super::errors::GameError;

/// How many twos come out of the deck so it divides evenly between
/// `player_count` players.
pub fn twos_removed(player_count: usize) -> Result<usize, GameError> {
    match player_count {
        4 => Ok(0),
        5 => Ok(2),
        6 => Ok(4),
        7 => Ok(3),
        8 => Ok(4),
        n => Err(GameError::UnsupportedPlayerCount(n)),
    }
}

/// Deck size for a table of `player_count`.
pub fn deck_size(player_count: usize) -> Result<usize, GameError> {
    Ok(52 - twos_removed(player_count)?)
}

/// All 52 cards, suit by suit, highest rank first.
#[must_use]
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::DESCENDING.into_iter().map(move |rank| Card::new(rank, suit)))
        .collect()
}

/// Builds the shuffled deck for `player_count` players. Which twos get
/// dropped is itself random.
pub fn build_deck<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Result<Vec<Card>, GameError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(GameError::UnsupportedPlayerCount(player_count));
    }
    let to_remove = twos_removed(player_count)?;

    let (mut twos, mut deck): (Vec<Card>, Vec<Card>) = full_deck()
        .into_iter()
        .partition(|card| card.rank == Rank::Two);
    twos.shuffle(rng);
    deck.extend(twos.into_iter().skip(to_remove));
    deck.shuffle(rng);

    Ok(deck)
}

/// Deals the whole deck round-robin, first card to the first seat of
/// `rotation`.
pub fn deal(deck: Vec<Card>, rotation: &[PlayerId]) -> HashMap<PlayerId, BTreeSet<Card>> {
    let mut hands: HashMap<PlayerId, BTreeSet<Card>> = rotation
        .iter()
        .map(|id| (id.clone(), BTreeSet::new()))
        .collect();
    if rotation.is_empty() {
        return hands;
    }
    for (i, card) in deck.into_iter().enumerate() {
        if let Some(hand) = hands.get_mut(&rotation[i % rotation.len()]) {
            hand.insert(card);
        }
    }
    hands
}
