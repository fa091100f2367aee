use crate::model::call::Call;
use crate::model::card::Card;
use crate::model::player::{Player, PlayerId};
use crate::model::round::Round;
use crate::model::score::TeamTally;
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick};
use serde::{Deserialize, Serialize};

/// Immutable copy of a finished round, independent of the players' live hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: u32,
    pub dealer: PlayerId,
    pub flipped_card: Card,
    pub call: Call,
    pub active_players: Vec<PlayerId>,
    pub hands: Vec<HandRecord>,
    pub tricks: Vec<TrickRecord>,
    pub tricks_won: TeamTally,
    pub points_won: TeamTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub player: PlayerId,
    pub name: String,
    pub starting_cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickRecord {
    pub id: u8,
    pub leader: PlayerId,
    pub play_suit: Option<Suit>,
    pub plays: Vec<Play>,
    pub winner: Option<PlayerId>,
}

impl TrickRecord {
    pub fn capture(trick: &Trick) -> Self {
        Self {
            id: trick.id(),
            leader: trick.leader(),
            play_suit: trick.play_suit(),
            plays: trick.plays().to_vec(),
            winner: trick.winner(),
        }
    }
}

impl RoundRecord {
    /// Must be taken before hands are reset; starting hands come from the players.
    pub fn capture(round: &Round, players: &[Player]) -> Self {
        RoundRecord {
            id: round.id(),
            dealer: round.dealer(),
            flipped_card: round.flipped_card(),
            call: *round.call(),
            active_players: round.seating().iter().collect(),
            hands: players
                .iter()
                .map(|player| HandRecord {
                    player: player.id,
                    name: player.name.clone(),
                    starting_cards: player.hand.starting_cards().to_vec(),
                })
                .collect(),
            tricks: round.tricks().iter().map(TrickRecord::capture).collect(),
            tricks_won: *round.tricks_won(),
            points_won: *round.points_won(),
        }
    }

    /// Single-line JSON, one record per line in a rounds log.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
