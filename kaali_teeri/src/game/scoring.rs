//! Team formation and threshold scoring.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::entities::{Card, PartnerCall, Play, PlayerId, RoundResult, Suit};
use super::partners::is_called;

/// Everything dealt and played this round. Hidden partners are resolved
/// against this rather than the (by then empty) hands.
#[derive(Clone, Debug, Default)]
pub struct RoundLedger {
    pub dealt: HashMap<PlayerId, BTreeSet<Card>>,
    pub plays: Vec<Play>,
}

impl RoundLedger {
    pub fn new(dealt: HashMap<PlayerId, BTreeSet<Card>>) -> Self {
        Self {
            dealt,
            plays: Vec::new(),
        }
    }

    pub fn record(&mut self, play: Play) {
        self.plays.push(play);
    }

    /// Whether `player` was dealt or played any called card this round.
    #[must_use]
    pub fn touched_call(&self, player: &PlayerId, calls: &[PartnerCall]) -> bool {
        let dealt = self
            .dealt
            .get(player)
            .is_some_and(|hand| hand.iter().any(|card| is_called(calls, *card)));
        dealt
            || self
                .plays
                .iter()
                .any(|play| &play.player_id == player && is_called(calls, play.card))
    }
}

/// The bidder's side: the bidder, everyone revealed by play, and anyone the
/// ledger shows holding a called card.
#[must_use]
pub fn resolve_team(
    bidder: &PlayerId,
    seats: &[PlayerId],
    revealed: &BTreeSet<PlayerId>,
    calls: &[PartnerCall],
    ledger: &RoundLedger,
) -> BTreeSet<PlayerId> {
    let mut team = BTreeSet::from([bidder.clone()]);
    team.extend(revealed.iter().cloned());
    team.extend(
        seats
            .iter()
            .filter(|id| ledger.touched_call(id, calls))
            .cloned(),
    );
    team
}

/// What a finished round produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundOutcome {
    pub result: RoundResult,
    /// Score added to each credited player.
    pub awards: BTreeMap<PlayerId, u32>,
}

/// Inputs to [`score_round`], all taken from the room at round end.
pub struct ScoringInput<'a> {
    pub round: u32,
    pub seats: &'a [PlayerId],
    pub bidder: &'a PlayerId,
    pub bid_value: u32,
    pub trump: Suit,
    pub calls: &'a [PartnerCall],
    pub team: &'a BTreeSet<PlayerId>,
    pub piles: &'a HashMap<PlayerId, u32>,
}

/// Compares the team's captured points with the bid. Success pays the bid
/// value to every team member; failure pays it to every opponent.
#[must_use]
pub fn score_round(input: ScoringInput<'_>) -> RoundOutcome {
    let (team_points, opposing_points) =
        input
            .piles
            .iter()
            .fold((0, 0), |(team, opp), (id, points)| {
                if input.team.contains(id) {
                    (team + points, opp)
                } else {
                    (team, opp + points)
                }
            });

    let success = team_points >= input.bid_value;
    let awards = input
        .seats
        .iter()
        .filter(|id| input.team.contains(*id) == success)
        .map(|id| (id.clone(), input.bid_value))
        .collect();

    RoundOutcome {
        result: RoundResult {
            round: input.round,
            success,
            team_points,
            opposing_points,
            team: input.team.iter().cloned().collect(),
            bidder_id: input.bidder.clone(),
            bid_value: input.bid_value,
            trump: input.trump,
            partner_calls: input.calls.to_vec(),
        },
        awards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Rank;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::new(n)).collect()
    }

    fn cards(tokens: &[&str]) -> BTreeSet<Card> {
        tokens.iter().map(|t| t.parse().unwrap()).collect()
    }

    fn call(rank: Rank, suit: Suit) -> PartnerCall {
        PartnerCall { rank, suit }
    }

    #[test]
    fn test_hidden_partner_found_from_dealt_hand() {
        let seats = ids(&["a", "b", "c", "d"]);
        let dealt = HashMap::from([
            (seats[0].clone(), cards(&["AS"])),
            (seats[1].clone(), cards(&["KH"])),
            (seats[2].clone(), cards(&["QD"])),
            (seats[3].clone(), cards(&["JC"])),
        ]);
        let ledger = RoundLedger::new(dealt);
        let calls = [call(Rank::Queen, Suit::Diamond)];

        let team = resolve_team(&seats[0], &seats, &BTreeSet::new(), &calls, &ledger);
        assert_eq!(team, BTreeSet::from([seats[0].clone(), seats[2].clone()]));
    }

    #[test]
    fn test_partner_found_from_play_history() {
        let seats = ids(&["a", "b", "c", "d"]);
        let mut ledger = RoundLedger::default();
        ledger.record(Play {
            player_id: seats[3].clone(),
            card: "KH".parse().unwrap(),
        });
        let calls = [call(Rank::King, Suit::Heart)];

        let team = resolve_team(&seats[1], &seats, &BTreeSet::new(), &calls, &ledger);
        assert!(team.contains(&seats[3]));
        assert_eq!(team.len(), 2);
    }

    #[test]
    fn test_success_pays_team() {
        let seats = ids(&["a", "b", "c", "d"]);
        let team = BTreeSet::from([seats[0].clone(), seats[2].clone()]);
        let piles = HashMap::from([
            (seats[0].clone(), 120),
            (seats[1].clone(), 40),
            (seats[2].clone(), 60),
        ]);
        let outcome = score_round(ScoringInput {
            round: 3,
            seats: &seats,
            bidder: &seats[0],
            bid_value: 180,
            trump: Suit::Spade,
            calls: &[],
            team: &team,
            piles: &piles,
        });

        assert!(outcome.result.success);
        assert_eq!(outcome.result.team_points, 180);
        assert_eq!(outcome.result.opposing_points, 40);
        assert_eq!(
            outcome.awards,
            BTreeMap::from([(seats[0].clone(), 180), (seats[2].clone(), 180)])
        );
    }

    #[test]
    fn test_failure_pays_opponents() {
        let seats = ids(&["a", "b", "c", "d"]);
        let team = BTreeSet::from([seats[0].clone()]);
        let piles = HashMap::from([(seats[0].clone(), 179), (seats[1].clone(), 101)]);
        let outcome = score_round(ScoringInput {
            round: 1,
            seats: &seats,
            bidder: &seats[0],
            bid_value: 180,
            trump: Suit::Heart,
            calls: &[],
            team: &team,
            piles: &piles,
        });

        assert!(!outcome.result.success);
        assert_eq!(outcome.awards.len(), 3);
        assert!(!outcome.awards.contains_key(&seats[0]));
        assert!(outcome.awards.values().all(|v| *v == 180));
    }
}
