//! The authoritative room state machine.
//!
//! A [`Room`] owns every piece of state for one table and is the only thing
//! that mutates it. Each public command validates against the current state
//! and only then commits, so a rejected command never leaves a partial change.
//! Concurrency is handled one level up: a room is driven by exactly one
//! [`crate::room::RoomActor`].

use chrono::{TimeDelta, Utc};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    fmt,
};

use super::bidding::{BidOutcome, BiddingState};
use super::commands::{Command, CommandKind, LegalActions};
use super::constants::{DEFAULT_PAUSE_SECS, DEFAULT_ROUND_LIMIT, MAX_PLAYERS, MIN_PLAYERS};
use super::deck;
use super::entities::{
    Card, PartnerCall, PauseMarker, Phase, Play, Player, PlayerId, RoundResult, Suit,
};
use super::errors::{GameError, MoveRejection};
use super::partners;
use super::scoring::{self, RoundLedger, ScoringInput};
use super::seating;
use super::snapshot::RoomSnapshot;
use super::tricks;

/// Rule knobs that may differ between rooms.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    /// The game ends once the round counter exceeds this.
    pub round_limit: u32,
    /// Lifetime of an advisory pause marker.
    pub pause_duration_secs: i64,
    /// When false, a player keeps the turn after playing a card until they
    /// send `EndTurn`.
    pub auto_end_turn: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_limit: DEFAULT_ROUND_LIMIT,
            pause_duration_secs: DEFAULT_PAUSE_SECS,
            auto_end_turn: true,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.round_limit == 0 {
            return Err("Round limit must be at least 1".to_string());
        }
        if self.pause_duration_secs <= 0 {
            return Err("Pause duration must be positive".to_string());
        }
        Ok(())
    }
}

/// Things that happened inside the room, in order.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    Joined(PlayerId),
    Left(PlayerId),
    Ready(PlayerId),
    Dealt { round: u32, dealer: Option<PlayerId> },
    Redealt,
    BidPlaced { player: PlayerId, value: u32 },
    BidSkipped(PlayerId),
    BiddingClosed { winner: PlayerId, value: u32 },
    PartnerCalled(PartnerCall),
    TrumpConfirmed(Suit),
    CardPlayed(Play),
    PartnerRevealed(PlayerId),
    TrickWon { winner: PlayerId, points: u32 },
    RoundCompleted(RoundResult),
    RoundAbandoned,
    GameEnded,
    Paused(PlayerId),
    PauseCleared,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Joined(id) => format!("{id} joined"),
            Self::Left(id) => format!("{id} left"),
            Self::Ready(id) => format!("{id} is ready"),
            Self::Dealt { round, dealer } => match dealer {
                Some(dealer) => format!("round {round} dealt by {dealer}"),
                None => format!("round {round} dealt"),
            },
            Self::Redealt => "nobody bid, cards redealt".to_string(),
            Self::BidPlaced { player, value } => format!("{player} bid {value}"),
            Self::BidSkipped(id) => format!("{id} skipped"),
            Self::BiddingClosed { winner, value } => format!("{winner} won the bid at {value}"),
            Self::PartnerCalled(call) => format!("partner card {call} called"),
            Self::TrumpConfirmed(suit) => format!("trump is {suit}"),
            Self::CardPlayed(play) => format!("{} played {}", play.player_id, play.card),
            Self::PartnerRevealed(id) => format!("{id} revealed as partner"),
            Self::TrickWon { winner, points } => format!("{winner} took a trick worth {points}"),
            Self::RoundCompleted(result) => {
                let verdict = if result.success { "made" } else { "missed" };
                format!(
                    "round {} over: {} {verdict} {} with {}",
                    result.round, result.bidder_id, result.bid_value, result.team_points
                )
            }
            Self::RoundAbandoned => "round abandoned".to_string(),
            Self::GameEnded => "game over".to_string(),
            Self::Paused(id) => format!("paused for {id}"),
            Self::PauseCleared => "pause cleared".to_string(),
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug)]
pub struct Room {
    code: String,
    host_id: PlayerId,
    settings: GameSettings,
    phase: Phase,
    round: u32,
    dealer_id: Option<PlayerId>,
    turn: Option<PlayerId>,
    /// Stable join order.
    seats: Vec<Player>,
    hands: HashMap<PlayerId, BTreeSet<Card>>,
    table: Vec<Play>,
    piles: HashMap<PlayerId, u32>,
    scores: HashMap<PlayerId, u32>,
    bidding: Option<BiddingState>,
    trump: Option<Suit>,
    partner_calls: Vec<PartnerCall>,
    revealed_partners: BTreeSet<PlayerId>,
    ledger: RoundLedger,
    deck_size: usize,
    awaiting_end_turn: bool,
    pause: Option<PauseMarker>,
    last_round: Option<RoundResult>,
    history: Vec<RoundResult>,
    events: VecDeque<GameEvent>,
    rng: StdRng,
}

impl Room {
    /// Opens a room with `host` seated and dealing first.
    #[must_use]
    pub fn create(code: &str, host: PlayerId, host_name: &str, settings: GameSettings) -> Self {
        let host_player = Player::new(host.clone(), host_name);
        let mut room = Self {
            code: code.to_string(),
            host_id: host.clone(),
            settings,
            phase: Phase::Lobby,
            round: 1,
            dealer_id: Some(host.clone()),
            turn: None,
            seats: vec![host_player],
            hands: HashMap::new(),
            table: Vec::new(),
            piles: HashMap::new(),
            scores: HashMap::from([(host.clone(), 0)]),
            bidding: None,
            trump: None,
            partner_calls: Vec::new(),
            revealed_partners: BTreeSet::new(),
            ledger: RoundLedger::default(),
            deck_size: 0,
            awaiting_end_turn: false,
            pause: None,
            last_round: None,
            history: Vec::new(),
            events: VecDeque::new(),
            rng: StdRng::from_os_rng(),
        };
        room.events.push_back(GameEvent::Joined(host));
        room
    }

    /// Replaces the shuffler with a seeded one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn host_id(&self) -> &PlayerId {
        &self.host_id
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn dealer_id(&self) -> Option<&PlayerId> {
        self.dealer_id.as_ref()
    }

    #[must_use]
    pub fn turn(&self) -> Option<&PlayerId> {
        self.turn.as_ref()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn seat_order(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|p| p.id.clone()).collect()
    }

    #[must_use]
    pub fn contains_player(&self, id: &PlayerId) -> bool {
        self.seats.iter().any(|p| &p.id == id)
    }

    #[must_use]
    pub fn hand(&self, id: &PlayerId) -> Option<&BTreeSet<Card>> {
        self.hands.get(id)
    }

    #[must_use]
    pub fn table(&self) -> &[Play] {
        &self.table
    }

    #[must_use]
    pub fn bidding(&self) -> Option<&BiddingState> {
        self.bidding.as_ref()
    }

    #[must_use]
    pub fn bidder(&self) -> Option<&PlayerId> {
        self.bidding.as_ref().and_then(|b| b.winner_id.as_ref())
    }

    #[must_use]
    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    #[must_use]
    pub fn partner_calls(&self) -> &[PartnerCall] {
        &self.partner_calls
    }

    #[must_use]
    pub fn revealed_partners(&self) -> &BTreeSet<PlayerId> {
        &self.revealed_partners
    }

    #[must_use]
    pub fn score(&self, id: &PlayerId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn pile(&self, id: &PlayerId) -> u32 {
        self.piles.get(id).copied().unwrap_or(0)
    }

    /// Size of the deck dealt this round; 0 outside a round.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    #[must_use]
    pub fn last_round(&self) -> Option<&RoundResult> {
        self.last_round.as_ref()
    }

    /// Every finished round, oldest first. Never rewritten.
    #[must_use]
    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Command dispatch ===

    /// Applies `command` on behalf of `player`.
    pub fn apply(&mut self, player: &PlayerId, command: Command) -> Result<(), GameError> {
        match command {
            Command::JoinRoom { name } => self.join(player, &name),
            Command::SetReady => self.set_ready(player),
            Command::LeaveRoom => self.leave(player),
            Command::PlaceBid { value } => self.place_bid(player, value),
            Command::SkipBid => self.skip_bid(player),
            Command::AddPartnerCall { rank, suit } => self.add_partner_call(player, &rank, suit),
            Command::ConfirmTrump { suit } => self.confirm_trump(player, suit),
            Command::PlayCard { card } => self.play_card(player, card),
            Command::EndTurn => self.end_turn(player),
            Command::SetPause { player_id } => self.set_pause(player, &player_id),
            Command::ClearPause => self.clear_pause(player),
        }
    }

    // === Lifecycle ===

    /// Seats a new player, or refreshes the name of one already seated.
    pub fn join(&mut self, id: &PlayerId, name: &str) -> Result<(), GameError> {
        if let Some(seat) = self.seats.iter_mut().find(|p| &p.id == id) {
            if !name.trim().is_empty() {
                seat.name = name.trim().to_string();
            }
            return Ok(());
        }
        self.require_phase(Phase::Lobby)?;
        if self.seats.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }

        self.seats.push(Player::new(id.clone(), name));
        self.scores.entry(id.clone()).or_insert(0);
        if self.dealer_id.is_none() {
            self.dealer_id = Some(id.clone());
        }
        self.events.push_back(GameEvent::Joined(id.clone()));
        Ok(())
    }

    /// Removes a player. Leaving mid-round abandons the round.
    pub fn leave(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;

        let order = self.seat_order();
        if self.dealer_id.as_ref() == Some(id) {
            self.dealer_id = seating::next_seat(&order, id).filter(|next| next != id);
        }
        self.seats.retain(|p| &p.id != id);
        self.hands.remove(id);
        self.events.push_back(GameEvent::Left(id.clone()));

        match self.phase {
            Phase::Bidding | Phase::PartnerTrump | Phase::Playing => self.abandon_round(),
            Phase::Lobby => self.start_if_all_ready()?,
            Phase::Ended => {}
        }
        Ok(())
    }

    /// Marks a player ready; the last one in deals the round.
    pub fn set_ready(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;
        self.require_phase(Phase::Lobby)?;

        if let Some(seat) = self.seats.iter_mut().find(|p| &p.id == id)
            && !seat.is_ready
        {
            seat.is_ready = true;
            self.events.push_back(GameEvent::Ready(id.clone()));
        }
        self.start_if_all_ready()
    }

    pub fn set_pause(&mut self, id: &PlayerId, target: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;
        self.require_seated(target)?;
        self.pause = Some(PauseMarker {
            active: true,
            player_id: target.clone(),
            expires_at: Utc::now() + TimeDelta::seconds(self.settings.pause_duration_secs),
        });
        self.events.push_back(GameEvent::Paused(target.clone()));
        Ok(())
    }

    pub fn clear_pause(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;
        if self.pause.take().is_some() {
            self.events.push_back(GameEvent::PauseCleared);
        }
        Ok(())
    }

    fn start_if_all_ready(&mut self) -> Result<(), GameError> {
        let n = self.seats.len();
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) && self.seats.iter().all(|p| p.is_ready) {
            self.deal_round()?;
        }
        Ok(())
    }

    /// Builds, shuffles and deals a fresh deck, then opens bidding.
    fn deal_round(&mut self) -> Result<(), GameError> {
        let order = self.seat_order();
        let deck = deck::build_deck(order.len(), &mut self.rng)?;
        let rotation = seating::rotation(&order, self.dealer_id.as_ref());

        self.deck_size = deck.len();
        self.hands = deck::deal(deck, &rotation);
        self.ledger = RoundLedger::new(self.hands.clone());
        self.piles = order.iter().map(|id| (id.clone(), 0)).collect();
        self.table.clear();
        self.trump = None;
        self.partner_calls.clear();
        self.revealed_partners.clear();
        self.awaiting_end_turn = false;
        self.bidding = Some(BiddingState::default());
        self.turn = rotation.first().cloned();
        self.phase = Phase::Bidding;

        log::info!(
            "Room {}: round {} dealt {} cards to {} players",
            self.code,
            self.round,
            self.deck_size,
            order.len()
        );
        self.events.push_back(GameEvent::Dealt {
            round: self.round,
            dealer: self.dealer_id.clone(),
        });
        Ok(())
    }

    // === Bidding ===

    pub fn place_bid(&mut self, id: &PlayerId, value: u32) -> Result<(), GameError> {
        self.require_turn(Phase::Bidding, id)?;
        let order = self.seat_order();
        let outcome = self
            .bidding
            .get_or_insert_with(BiddingState::default)
            .place_bid(&order, id, value)?;

        self.events.push_back(GameEvent::BidPlaced {
            player: id.clone(),
            value,
        });
        self.after_bid(outcome)
    }

    pub fn skip_bid(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.require_turn(Phase::Bidding, id)?;
        let order = self.seat_order();
        let outcome = self
            .bidding
            .get_or_insert_with(BiddingState::default)
            .skip(&order, id);

        self.events.push_back(GameEvent::BidSkipped(id.clone()));
        self.after_bid(outcome)
    }

    fn after_bid(&mut self, outcome: BidOutcome) -> Result<(), GameError> {
        match outcome {
            BidOutcome::Next(next) => {
                self.turn = Some(next);
                Ok(())
            }
            BidOutcome::Closed {
                winner: Some(winner),
            } => {
                let value = self.bidding.as_ref().and_then(|b| b.value).unwrap_or(0);
                log::info!("Room {}: {} won the bid at {}", self.code, winner, value);
                self.turn = None;
                self.phase = Phase::PartnerTrump;
                self.events
                    .push_back(GameEvent::BiddingClosed { winner, value });
                Ok(())
            }
            BidOutcome::Closed { winner: None } => {
                log::info!("Room {}: everyone skipped, redealing", self.code);
                self.events.push_back(GameEvent::Redealt);
                self.deal_round()
            }
        }
    }

    // === Partner and trump ===

    pub fn add_partner_call(
        &mut self,
        id: &PlayerId,
        rank_token: &str,
        suit: Suit,
    ) -> Result<(), GameError> {
        self.require_bidder(id)?;
        let required = partners::required_calls(self.seats.len());
        let empty = BTreeSet::new();
        let hand = self.hands.get(id).unwrap_or(&empty);
        let call = partners::validate_call(rank_token, suit, hand, &self.partner_calls, required)?;

        self.partner_calls.push(call);
        self.events.push_back(GameEvent::PartnerCalled(call));
        Ok(())
    }

    pub fn confirm_trump(&mut self, id: &PlayerId, suit: Suit) -> Result<(), GameError> {
        self.require_bidder(id)?;
        partners::validate_confirm(
            &self.partner_calls,
            partners::required_calls(self.seats.len()),
        )?;

        self.trump = Some(suit);
        self.phase = Phase::Playing;
        self.turn = Some(id.clone());
        self.table.clear();
        self.revealed_partners.clear();
        self.awaiting_end_turn = false;
        self.events.push_back(GameEvent::TrumpConfirmed(suit));
        Ok(())
    }

    // === Tricks ===

    pub fn play_card(&mut self, id: &PlayerId, card: Card) -> Result<(), GameError> {
        self.require_turn(Phase::Playing, id)?;
        if self.awaiting_end_turn {
            return Err(GameError::illegal(MoveRejection::AlreadyPlayed));
        }
        let Some(hand) = self.hands.get_mut(id) else {
            return Err(GameError::illegal(MoveRejection::CardNotInHand));
        };
        tricks::check_play(hand, &self.table, card).map_err(GameError::illegal)?;

        hand.remove(&card);
        let play = Play {
            player_id: id.clone(),
            card,
        };
        self.table.push(play.clone());
        self.ledger.record(play.clone());
        self.events.push_back(GameEvent::CardPlayed(play));

        if partners::is_called(&self.partner_calls, card) && self.revealed_partners.insert(id.clone())
        {
            self.events.push_back(GameEvent::PartnerRevealed(id.clone()));
        }

        if self.settings.auto_end_turn {
            self.advance_turn(id);
        } else {
            self.awaiting_end_turn = true;
        }
        Ok(())
    }

    pub fn end_turn(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.require_turn(Phase::Playing, id)?;
        if !self.awaiting_end_turn {
            return Err(GameError::illegal(MoveRejection::NothingToEnd));
        }
        self.awaiting_end_turn = false;
        self.advance_turn(id);
        Ok(())
    }

    /// Cards `id` may legally play right now.
    #[must_use]
    pub fn legal_cards(&self, id: &PlayerId) -> Vec<Card> {
        if self.phase != Phase::Playing || self.turn.as_ref() != Some(id) || self.awaiting_end_turn
        {
            return Vec::new();
        }
        self.hands
            .get(id)
            .map(|hand| tricks::legal_cards(hand, &self.table))
            .unwrap_or_default()
    }

    fn advance_turn(&mut self, current: &PlayerId) {
        if self.table.len() < self.seats.len() {
            self.turn = seating::next_seat(&self.seat_order(), current);
            return;
        }
        self.resolve_trick();
    }

    fn resolve_trick(&mut self) {
        let Some(trump) = self.trump else {
            log::error!("Room {}: trick completed without trump", self.code);
            return;
        };
        let Some(winner) = tricks::trick_winner(&self.table, trump).map(|p| p.player_id.clone())
        else {
            return;
        };
        let points = tricks::trick_points(&self.table);

        *self.piles.entry(winner.clone()).or_insert(0) += points;
        self.table.clear();
        self.turn = Some(winner.clone());
        log::debug!("Room {}: {} took a trick worth {}", self.code, winner, points);
        self.events.push_back(GameEvent::TrickWon { winner, points });

        if self.hands.values().all(BTreeSet::is_empty) {
            self.finish_round();
        }
    }

    // === Scoring ===

    fn finish_round(&mut self) {
        let order = self.seat_order();
        let (Some(bidder), Some(bid_value), Some(trump)) = (
            self.bidder().cloned(),
            self.bidding.as_ref().and_then(|b| b.value),
            self.trump,
        ) else {
            log::error!("Room {}: round ended without a contract", self.code);
            self.abandon_round();
            return;
        };

        let team = scoring::resolve_team(
            &bidder,
            &order,
            &self.revealed_partners,
            &self.partner_calls,
            &self.ledger,
        );
        let outcome = scoring::score_round(ScoringInput {
            round: self.round,
            seats: &order,
            bidder: &bidder,
            bid_value,
            trump,
            calls: &self.partner_calls,
            team: &team,
            piles: &self.piles,
        });

        for (id, award) in &outcome.awards {
            *self.scores.entry(id.clone()).or_insert(0) += award;
        }
        log::info!("Room {}: {}", self.code, GameEvent::RoundCompleted(outcome.result.clone()));
        self.last_round = Some(outcome.result.clone());
        self.history.push(outcome.result.clone());
        self.events.push_back(GameEvent::RoundCompleted(outcome.result));

        self.round += 1;
        self.dealer_id = seating::next_dealer(&order, self.dealer_id.as_ref());
        self.reset_round();
        if self.round > self.settings.round_limit {
            self.phase = Phase::Ended;
            log::info!("Room {}: game over after {} rounds", self.code, self.history.len());
            self.events.push_back(GameEvent::GameEnded);
        } else {
            self.phase = Phase::Lobby;
        }
    }

    fn abandon_round(&mut self) {
        log::info!("Room {}: round {} abandoned", self.code, self.round);
        self.reset_round();
        self.phase = Phase::Lobby;
        self.events.push_back(GameEvent::RoundAbandoned);
    }

    /// Drops all per-round state and ready flags. Scores and history stay.
    fn reset_round(&mut self) {
        self.hands.clear();
        self.table.clear();
        self.piles.clear();
        self.bidding = None;
        self.trump = None;
        self.partner_calls.clear();
        self.revealed_partners.clear();
        self.turn = None;
        self.ledger = RoundLedger::default();
        self.deck_size = 0;
        self.awaiting_end_turn = false;
        for seat in &mut self.seats {
            seat.is_ready = false;
        }
    }

    // === Queries ===

    /// Commands `id` may issue in the current state, plus playable cards.
    #[must_use]
    pub fn legal_commands(&self, id: &PlayerId) -> LegalActions {
        let mut commands = Vec::new();
        if !self.contains_player(id) {
            if self.phase == Phase::Lobby && self.seats.len() < MAX_PLAYERS {
                commands.push(CommandKind::JoinRoom);
            }
            return LegalActions {
                commands,
                playable_cards: Vec::new(),
            };
        }

        commands.extend([CommandKind::JoinRoom, CommandKind::LeaveRoom, CommandKind::SetPause]);
        if self.pause.is_some() {
            commands.push(CommandKind::ClearPause);
        }

        let my_turn = self.turn.as_ref() == Some(id);
        let mut playable_cards = Vec::new();
        match self.phase {
            Phase::Lobby => {
                if self.seats.iter().any(|p| &p.id == id && !p.is_ready) {
                    commands.push(CommandKind::SetReady);
                }
            }
            Phase::Bidding if my_turn => {
                commands.extend([CommandKind::PlaceBid, CommandKind::SkipBid]);
            }
            Phase::PartnerTrump if self.bidder() == Some(id) => {
                let required = partners::required_calls(self.seats.len());
                if self.partner_calls.len() < required {
                    commands.push(CommandKind::AddPartnerCall);
                } else {
                    commands.push(CommandKind::ConfirmTrump);
                }
            }
            Phase::Playing if my_turn => {
                if self.awaiting_end_turn {
                    commands.push(CommandKind::EndTurn);
                } else {
                    commands.push(CommandKind::PlayCard);
                    playable_cards = self.legal_cards(id);
                }
            }
            _ => {}
        }

        LegalActions {
            commands,
            playable_cards,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            host_id: self.host_id.clone(),
            phase: self.phase,
            round: self.round,
            dealer_id: self.dealer_id.clone(),
            turn: self.turn.clone(),
            seats: self.seat_order(),
            players: self
                .seats
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            hands: self
                .hands
                .iter()
                .map(|(id, hand)| (id.clone(), hand.iter().copied().collect()))
                .collect(),
            table: self.table.clone(),
            piles: self.piles.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            scores: self.scores.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            bidding: self.bidding.clone(),
            trump: self.trump,
            partner_calls: self.partner_calls.clone(),
            revealed_partners: self.revealed_partners.iter().cloned().collect(),
            last_round: self.last_round.clone(),
            timeout: self.pause.clone(),
        }
    }

    // === Guards ===

    fn require_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::PhaseViolation {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn require_seated(&self, id: &PlayerId) -> Result<(), GameError> {
        if !self.contains_player(id) {
            return Err(GameError::UnknownPlayer);
        }
        Ok(())
    }

    fn require_turn(&self, phase: Phase, id: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;
        self.require_phase(phase)?;
        if self.turn.as_ref() != Some(id) {
            return Err(GameError::NotTurn);
        }
        Ok(())
    }

    fn require_bidder(&self, id: &PlayerId) -> Result<(), GameError> {
        self.require_seated(id)?;
        self.require_phase(Phase::PartnerTrump)?;
        if self.bidder() != Some(id) {
            return Err(GameError::NotBidder);
        }
        Ok(())
    }
}
