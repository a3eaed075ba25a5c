use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::constants::{FIVE_POINTS, HONOUR_POINTS, KAALI_TEERI_POINTS};
use super::errors::GameError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    #[serde(rename = "S")]
    Spade,
    #[serde(rename = "H")]
    Heart,
    #[serde(rename = "D")]
    Diamond,
    #[serde(rename = "C")]
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Spade => 'S',
            Self::Heart => 'H',
            Self::Diamond => 'D',
            Self::Club => 'C',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Suit {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" | "SPADE" | "SPADES" | "♠" => Ok(Self::Spade),
            "H" | "HEART" | "HEARTS" | "♥" => Ok(Self::Heart),
            "D" | "DIAMOND" | "DIAMONDS" | "♦" => Ok(Self::Diamond),
            "C" | "CLUB" | "CLUBS" | "♣" => Ok(Self::Club),
            _ => Err(GameError::InvalidSuit(s.to_string())),
        }
    }
}

/// Card ranks. Declaration order is low to high so the derived `Ord`
/// ranks an ace above a king.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks, highest first.
    pub const DESCENDING: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }

    /// Parses a user-entered rank token. Surrounding whitespace and case are
    /// ignored, and `T` is accepted for ten.
    #[must_use]
    pub fn parse_token(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_uppercase();
        let normalized = if normalized == "T" { "10" } else { normalized.as_str() };
        Self::DESCENDING
            .into_iter()
            .find(|rank| rank.token() == normalized)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl From<Rank> for String {
    fn from(value: Rank) -> Self {
        value.token().to_string()
    }
}

impl TryFrom<String> for Rank {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_token(&value).ok_or(GameError::InvalidCard(value))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

/// The three of spades.
pub const KAALI_TEERI: Card = Card {
    suit: Suit::Spade,
    rank: Rank::Three,
};

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Points this card is worth when it sits in a captured trick.
    #[must_use]
    pub fn points(self) -> u32 {
        if self == KAALI_TEERI {
            return KAALI_TEERI_POINTS;
        }
        match self.rank {
            Rank::Ace | Rank::King | Rank::Queen | Rank::Jack | Rank::Ten => HONOUR_POINTS,
            Rank::Five => FIVE_POINTS,
            _ => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(suit_ch) = trimmed.chars().last() else {
            return Err(GameError::InvalidCard(s.to_string()));
        };
        let rank_part = &trimmed[..trimmed.len() - suit_ch.len_utf8()];
        let rank = Rank::parse_token(rank_part).ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        let suit = suit_ch
            .to_string()
            .parse::<Suit>()
            .map_err(|_| GameError::InvalidCard(s.to_string()))?;
        Ok(Self { suit, rank })
    }
}

impl From<Card> for String {
    fn from(value: Card) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        let name = match name.trim() {
            "" => format!("Player-{id}"),
            trimmed => trimmed.to_string(),
        };
        Self {
            id,
            name,
            is_ready: false,
            joined_at: Utc::now(),
        }
    }
}

/// One card put on the table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub player_id: PlayerId,
    pub card: Card,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PartnerCall {
    pub rank: Rank,
    pub suit: Suit,
}

impl PartnerCall {
    #[must_use]
    pub fn card(self) -> Card {
        Card::new(self.rank, self.suit)
    }
}

impl fmt::Display for PartnerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.card().fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Lobby,
    Bidding,
    PartnerTrump,
    Playing,
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Bidding => "bidding",
            Self::PartnerTrump => "partner_trump",
            Self::Playing => "playing",
            Self::Ended => "ended",
        };
        f.write_str(repr)
    }
}

/// Advisory "waiting for someone" marker. Nothing in the engine acts on it
/// expiring.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseMarker {
    pub active: bool,
    pub player_id: PlayerId,
    pub expires_at: DateTime<Utc>,
}

/// Archived outcome of one round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round: u32,
    pub success: bool,
    pub team_points: u32,
    pub opposing_points: u32,
    pub team: Vec<PlayerId>,
    pub bidder_id: PlayerId,
    pub bid_value: u32,
    pub trump: Suit,
    pub partner_calls: Vec<PartnerCall>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Card Tests ===

    #[test]
    fn test_card_parse_and_display() {
        let card: Card = "10H".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Heart));
        assert_eq!(card.to_string(), "10H");

        let card: Card = "ts".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Spade));

        let card: Card = " as ".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ace, Suit::Spade));
    }

    #[test]
    fn test_card_parse_rejects_garbage() {
        for token in ["", "S", "1S", "AX", "11H", "ZZ"] {
            assert!(token.parse::<Card>().is_err(), "{token} should not parse");
        }
    }

    #[test]
    fn test_card_points() {
        assert_eq!(KAALI_TEERI.points(), 30);
        assert_eq!(Card::new(Rank::Three, Suit::Heart).points(), 0);
        assert_eq!(Card::new(Rank::Five, Suit::Club).points(), 5);
        for rank in [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten] {
            assert_eq!(Card::new(rank, Suit::Diamond).points(), 10);
        }
        assert_eq!(Card::new(Rank::Nine, Suit::Spade).points(), 0);
    }

    #[test]
    fn test_rank_order_is_high_to_low() {
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::Ten > Rank::Nine);
        assert!(Rank::Three > Rank::Two);
        let mut sorted = Rank::DESCENDING.to_vec();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, Rank::DESCENDING.to_vec());
    }

    #[test]
    fn test_card_serializes_as_token() {
        let json = serde_json::to_string(&Card::new(Rank::Queen, Suit::Club)).unwrap();
        assert_eq!(json, "\"QC\"");
        let card: Card = serde_json::from_str("\"3S\"").unwrap();
        assert_eq!(card, KAALI_TEERI);
    }

    // === Misc ===

    #[test]
    fn test_phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::PartnerTrump).unwrap();
        assert_eq!(json, "\"partner_trump\"");
    }

    #[test]
    fn test_player_default_name() {
        let player = Player::new(PlayerId::new("abc"), "   ");
        assert_eq!(player.name, "Player-abc");
        assert!(!player.is_ready);
    }
}
