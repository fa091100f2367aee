use super::{SimulationError, check_players};
use crate::game::game_state::{Game, play_game};
use crate::model::player::{Player, PlayerId, Team};
use crate::model::score::TeamTally;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A series of independent games at the same table, each opened by seat 1 dealing.
#[derive(Debug, Clone)]
pub struct GameSimulation {
    pub players: Vec<Player>,
    pub quantity: u32,
    pub keep_games: bool,
}

impl GameSimulation {
    pub fn new(quantity: u32) -> Self {
        Self {
            players: Player::default_table(),
            quantity,
            keep_games: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSeriesTotals {
    pub games: u32,
    pub rounds: u32,
    pub wins: TeamTally,
    pub points: TeamTally,
}

impl GameSeriesTotals {
    pub fn win_rate(&self, team: Team) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.wins.get(team)) / f64::from(self.games)
    }

    pub fn mean_rounds(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.rounds) / f64::from(self.games)
    }
}

#[derive(Debug, Clone)]
pub struct GameSeriesResults {
    pub totals: GameSeriesTotals,
    pub games: Vec<Game>,
}

pub fn simulate_games<R: Rng + ?Sized>(
    config: GameSimulation,
    rng: &mut R,
) -> Result<GameSeriesResults, SimulationError> {
    if config.quantity == 0 {
        return Err(SimulationError::ZeroQuantity);
    }
    check_players(&config.players)?;

    let mut table = config.players;
    for player in &mut table {
        player.hand.clear();
    }
    let first_dealer = PlayerId::LOOP[0];

    tracing::info!(
        target: "euchre_core::sim",
        quantity = config.quantity,
        keep_games = config.keep_games,
        "starting game simulation"
    );

    let mut totals = GameSeriesTotals::default();
    let mut games = Vec::new();
    for id in 1..=config.quantity {
        let mut game = Game::new(id, table.clone(), first_dealer);
        play_game(&mut game, rng)?;

        totals.games += 1;
        totals.rounds += game.rounds().len() as u32;
        totals.points.absorb(game.scores());
        if let Some(winner) = game.winning_team() {
            totals.wins.add(winner, 1);
        }
        if config.keep_games {
            games.push(game);
        }
    }

    tracing::info!(
        target: "euchre_core::sim",
        games = totals.games,
        black_wins = totals.wins.get(Team::Black),
        red_wins = totals.wins.get(Team::Red),
        "game simulation finished"
    );
    Ok(GameSeriesResults { totals, games })
}
