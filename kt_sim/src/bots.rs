//! Seat bots that play random legal moves through a room handle.

use kaali_teeri::{
    Card, Command, CommandKind, LegalActions, PlayerId, Rank, RoomSnapshot, Suit,
    constants::{MAX_BID, MIN_BID},
    entities::Phase,
    room::{RoomError, RoomHandle, StateChangeNotification},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

/// Bid step used when raising the standing bid.
const RAISE_STEP: u32 = 10;

/// Chance of opening when nobody has bid yet.
const OPEN_PROBABILITY: f64 = 0.7;

/// Chance of raising a standing bid.
const RAISE_PROBABILITY: f64 = 0.35;

/// Picks one move for one seat. Holds its own RNG so a seeded simulation
/// replays the same decisions.
pub struct SeatBot {
    me: PlayerId,
    rng: StdRng,
}

impl SeatBot {
    pub fn new(me: PlayerId, seed: u64) -> Self {
        Self {
            me,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.me
    }

    /// Chooses a command among those `legal` allows, or `None` when the seat
    /// has nothing to do.
    pub fn decide(&mut self, snapshot: &RoomSnapshot, legal: &LegalActions) -> Option<Command> {
        if legal.allows(CommandKind::PlayCard) {
            return legal
                .playable_cards
                .choose(&mut self.rng)
                .map(|card| Command::PlayCard { card: *card });
        }
        if legal.allows(CommandKind::EndTurn) {
            return Some(Command::EndTurn);
        }
        if legal.allows(CommandKind::PlaceBid) {
            return Some(self.decide_bid(snapshot));
        }
        if legal.allows(CommandKind::AddPartnerCall) {
            return self.decide_call(snapshot);
        }
        if legal.allows(CommandKind::ConfirmTrump) {
            return Some(Command::ConfirmTrump {
                suit: longest_suit(self.hand(snapshot)),
            });
        }
        if legal.allows(CommandKind::SetReady) {
            return Some(Command::SetReady);
        }
        None
    }

    fn hand<'a>(&self, snapshot: &'a RoomSnapshot) -> &'a [Card] {
        snapshot
            .hands
            .get(&self.me)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn decide_bid(&mut self, snapshot: &RoomSnapshot) -> Command {
        let standing = snapshot.bidding.as_ref().and_then(|b| b.value);
        let (next, probability) = match standing {
            None => (MIN_BID, OPEN_PROBABILITY),
            Some(value) => (value + RAISE_STEP, RAISE_PROBABILITY),
        };

        if next <= MAX_BID && self.rng.random_bool(probability) {
            Command::PlaceBid { value: next }
        } else {
            Command::SkipBid
        }
    }

    /// Calls a random card that is neither in hand nor already called.
    fn decide_call(&mut self, snapshot: &RoomSnapshot) -> Option<Command> {
        let hand = self.hand(snapshot);
        let candidates: Vec<Card> = Rank::DESCENDING
            .iter()
            .filter(|rank| **rank != Rank::Two)
            .flat_map(|rank| Suit::ALL.iter().map(move |suit| Card::new(*rank, *suit)))
            .filter(|card| {
                !hand.contains(card) && !snapshot.partner_calls.iter().any(|c| c.card() == *card)
            })
            .collect();

        candidates.choose(&mut self.rng).map(|card| Command::AddPartnerCall {
            rank: card.rank.token().to_string(),
            suit: card.suit,
        })
    }
}

/// Suit with the most cards in `hand`; spades on an empty hand.
fn longest_suit(hand: &[Card]) -> Suit {
    Suit::ALL
        .iter()
        .copied()
        .max_by_key(|suit| hand.iter().filter(|c| c.suit == *suit).count())
        .unwrap_or(Suit::Spade)
}

/// Plays one seat until the game ends or the room closes.
pub async fn run_seat(handle: RoomHandle, mut bot: SeatBot) -> Result<(), RoomError> {
    let (subscriber_id, mut updates) = handle.subscribe().await?;
    let me = bot.id().clone();

    loop {
        if handle.info().await?.phase == Phase::Ended {
            break;
        }

        let legal = handle.legal_commands(me.clone()).await?;
        let snapshot = handle.snapshot(Some(me.clone())).await?;
        if let Some(command) = bot.decide(&snapshot, &legal) {
            log::trace!("{} -> {:?}", me, command);
            match handle.command(me.clone(), command).await {
                Ok(_) => continue,
                // Another seat moved first; re-read and try again.
                Err(RoomError::Game(e)) => {
                    log::debug!("{} rejected: {}", me, e);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        match updates.recv().await {
            Some(StateChangeNotification::GameEnded)
            | Some(StateChangeNotification::Closed)
            | None => break,
            Some(_) => {}
        }
    }

    // Room may already be gone.
    let _ = handle.unsubscribe(subscriber_id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaali_teeri::{GameSettings, Room};

    fn id(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn dealt_room() -> Room {
        let mut room = Room::create("BOT", id("a"), "A", GameSettings::default()).with_seed(4);
        for name in ["b", "c", "d"] {
            room.apply(
                &id(name),
                Command::JoinRoom {
                    name: name.to_string(),
                },
            )
            .unwrap();
        }
        for name in ["a", "b", "c", "d"] {
            room.apply(&id(name), Command::SetReady).unwrap();
        }
        room
    }

    #[test]
    fn test_longest_suit() {
        let hand: Vec<Card> = ["AH", "KH", "3S", "10D", "9H"]
            .iter()
            .map(|s| s.parse::<Card>().unwrap())
            .collect();
        assert_eq!(longest_suit(&hand), Suit::Heart);
        assert_eq!(longest_suit(&[]), Suit::Spade);
    }

    #[test]
    fn test_bot_only_chooses_legal_moves() {
        let mut room = dealt_room();
        let mut bots: Vec<SeatBot> = room
            .seat_order()
            .into_iter()
            .enumerate()
            .map(|(i, p)| SeatBot::new(p, i as u64))
            .collect();

        let mut moves = 0;
        while room.phase() != Phase::Lobby && moves < 500 {
            let mut acted = false;
            for bot in &mut bots {
                let legal = room.legal_commands(bot.id());
                let snapshot = room.snapshot().redacted_for(bot.id());
                if let Some(command) = bot.decide(&snapshot, &legal) {
                    room.apply(bot.id(), command).unwrap();
                    acted = true;
                    moves += 1;
                    break;
                }
            }
            assert!(acted, "no bot could move in {}", room.phase());
        }

        assert_eq!(room.phase(), Phase::Lobby);
        assert_eq!(room.history().len(), 1);
    }

    #[test]
    fn test_opening_bid_is_minimum() {
        let room = dealt_room();
        let turn = room.turn().cloned().unwrap();
        let legal = room.legal_commands(&turn);
        let snapshot = room.snapshot();

        for seed in 0..20 {
            let mut bot = SeatBot::new(turn.clone(), seed);
            match bot.decide(&snapshot, &legal) {
                Some(Command::PlaceBid { value }) => assert_eq!(value, MIN_BID),
                Some(Command::SkipBid) => {}
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_idle_seat_does_nothing() {
        let room = dealt_room();
        let dealer = id("a");
        assert_ne!(room.turn(), Some(&dealer));
        let mut bot = SeatBot::new(dealer.clone(), 1);
        assert_eq!(
            bot.decide(&room.snapshot(), &room.legal_commands(&dealer)),
            None
        );
    }
}
