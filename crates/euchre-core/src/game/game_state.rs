use super::record::RoundRecord;
use crate::engine::round::deal_and_play_round;
use crate::model::player::{Player, PlayerId, Team};
use crate::model::round::RoundError;
use crate::model::score::TeamTally;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Points a team needs to win a game.
pub const GAME_TARGET: u32 = 10;

/// A sequence of fully random rounds played until one team reaches [`GAME_TARGET`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    id: u32,
    players: Vec<Player>,
    first_dealer: PlayerId,
    rounds: Vec<RoundRecord>,
    scores: TeamTally,
    winning_team: Option<Team>,
    is_complete: bool,
}

impl Game {
    pub fn new(id: u32, players: Vec<Player>, first_dealer: PlayerId) -> Self {
        Self {
            id,
            players,
            first_dealer,
            rounds: Vec::new(),
            scores: TeamTally::new(),
            winning_team: None,
            is_complete: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn first_dealer(&self) -> PlayerId {
        self.first_dealer
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn scores(&self) -> &TeamTally {
        &self.scores
    }

    pub fn winning_team(&self) -> Option<Team> {
        self.winning_team
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    fn absorb_round(&mut self, record: RoundRecord) {
        self.scores.absorb(&record.points_won);
        self.rounds.push(record);

        let leader = self.scores.leader();
        if let Some(team) = leader.filter(|team| self.scores.get(*team) >= GAME_TARGET) {
            self.winning_team = Some(team);
            self.is_complete = true;
        }
    }
}

/// Plays rounds with the deal passing clockwise until a team reaches the target.
///
/// Hands are emptied after every round so each deal starts from nothing.
pub fn play_game<R: Rng + ?Sized>(game: &mut Game, rng: &mut R) -> Result<(), RoundError> {
    let mut dealer = game.first_dealer;
    let mut round_id = game.rounds.len() as u32;

    while !game.is_complete {
        round_id += 1;
        for player in &mut game.players {
            player.hand.clear();
        }
        let round = deal_and_play_round(round_id, dealer, &mut game.players, rng)?;
        let record = RoundRecord::capture(&round, &game.players);
        game.absorb_round(record);
        dealer = dealer.next();
    }

    for player in &mut game.players {
        player.hand.clear();
    }
    tracing::debug!(
        target: "euchre_core::game",
        game = game.id,
        rounds = game.rounds.len(),
        winner = ?game.winning_team,
        "game complete"
    );
    Ok(())
}
