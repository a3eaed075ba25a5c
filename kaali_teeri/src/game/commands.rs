//! Transport-independent command surface. The issuing player travels next to
//! the command, never inside it.

use serde::{Deserialize, Serialize};

use super::entities::{Card, PlayerId, Suit};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    JoinRoom { name: String },
    SetReady,
    LeaveRoom,
    PlaceBid { value: u32 },
    SkipBid,
    /// `rank` is the raw token as entered; it is normalized on validation.
    AddPartnerCall { rank: String, suit: Suit },
    ConfirmTrump { suit: Suit },
    PlayCard { card: Card },
    EndTurn,
    SetPause { player_id: PlayerId },
    ClearPause,
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::JoinRoom { .. } => CommandKind::JoinRoom,
            Self::SetReady => CommandKind::SetReady,
            Self::LeaveRoom => CommandKind::LeaveRoom,
            Self::PlaceBid { .. } => CommandKind::PlaceBid,
            Self::SkipBid => CommandKind::SkipBid,
            Self::AddPartnerCall { .. } => CommandKind::AddPartnerCall,
            Self::ConfirmTrump { .. } => CommandKind::ConfirmTrump,
            Self::PlayCard { .. } => CommandKind::PlayCard,
            Self::EndTurn => CommandKind::EndTurn,
            Self::SetPause { .. } => CommandKind::SetPause,
            Self::ClearPause => CommandKind::ClearPause,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    JoinRoom,
    SetReady,
    LeaveRoom,
    PlaceBid,
    SkipBid,
    AddPartnerCall,
    ConfirmTrump,
    PlayCard,
    EndTurn,
    SetPause,
    ClearPause,
}

/// Answer to "what may this player do right now".
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalActions {
    pub commands: Vec<CommandKind>,
    /// Cards `PlayCard` would accept; empty unless `PlayCard` is listed.
    pub playable_cards: Vec<Card>,
}

impl LegalActions {
    #[must_use]
    pub fn allows(&self, kind: CommandKind) -> bool {
        self.commands.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_value(Command::PlaceBid { value: 170 }).unwrap();
        assert_eq!(json["type"], "place_bid");
        assert_eq!(json["value"], 170);

        let cmd: Command =
            serde_json::from_str(r#"{"type":"play_card","card":"KS"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::PlayCard {
                card: "KS".parse().unwrap()
            }
        );
        assert_eq!(cmd.kind(), CommandKind::PlayCard);
    }
}
