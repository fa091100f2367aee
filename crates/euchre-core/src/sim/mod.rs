//! Monte Carlo rounds over a partially fixed table.
//!
//! Everything that stays constant across trials lives in a shared [`SimulationContext`];
//! a trial only mutates the players' hands, and those are put back to their fixed
//! cards when the trial ends, whether it finished or failed.

pub mod games;

use crate::engine::call::resolve_random_call;
use crate::engine::deal::{DealError, deal, shuffle};
use crate::engine::round::play_round;
use crate::game::record::RoundRecord;
use crate::model::call::CallTemplate;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::player::{PLAYER_COUNT, Player, PlayerId, Team};
use crate::model::round::{Round, RoundError};
use crate::model::score::{PlayerTally, TeamTally};
use crate::model::seating::Seating;
use crate::model::suit::Suit;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use thiserror::Error;
use tracing::{debug, info};

/// Inputs to [`simulate`]. Unset options are drawn at random; dealer and caller are
/// drawn again for every trial, the flipped card once for the whole run.
#[derive(Debug, Clone)]
pub struct RoundSimulation {
    /// Four players in seat order, each holding any fixed cards.
    pub players: Vec<Player>,
    pub call: Option<CallTemplate>,
    pub flipped_card: Option<Card>,
    pub dealer: Option<PlayerId>,
    pub quantity: u32,
    pub keep_rounds: bool,
}

impl RoundSimulation {
    /// Default table, nothing fixed.
    pub fn new(quantity: u32) -> Self {
        Self {
            players: Player::default_table(),
            call: None,
            flipped_card: None,
            dealer: None,
            quantity,
            keep_rounds: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationTotals {
    pub trials: u32,
    pub points: TeamTally,
    pub wins: TeamTally,
    pub tricks: PlayerTally,
}

impl SimulationTotals {
    pub fn record(&mut self, round: &Round) {
        self.trials += 1;
        self.points.absorb(round.points_won());
        for team in round.points_won().scoring_teams() {
            self.wins.add(team, 1);
        }
        for winner in round.tricks().iter().filter_map(|trick| trick.winner()) {
            self.tricks.add(winner, 1);
        }
    }

    pub fn mean_points(&self, team: Team) -> f64 {
        per_trial(self.points.get(team), self.trials)
    }

    pub fn win_rate(&self, team: Team) -> f64 {
        per_trial(self.wins.get(team), self.trials)
    }

    pub fn mean_tricks(&self, player: PlayerId) -> f64 {
        per_trial(self.tricks.get(player), self.trials)
    }
}

fn per_trial(total: u32, trials: u32) -> f64 {
    if trials == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(trials)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResults {
    /// The table as configured, hands back at their fixed cards.
    pub players: Vec<Player>,
    pub flipped_card: Card,
    pub totals: SimulationTotals,
    /// Filled only when rounds were kept.
    pub rounds: Vec<RoundRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("simulation quantity must be a positive integer")]
    ZeroQuantity,
    #[error("expected 4 players, found {found}")]
    PlayerCount { found: usize },
    #[error("seat {seat} is held by player {found}")]
    SeatOrder { seat: usize, found: PlayerId },
    #[error("no card left to turn up")]
    NoFlippedCard,
    #[error("phase-1 call in {suit} cannot follow flipped card {card}")]
    TurnedSuitMismatch { suit: Suit, card: Card },
    #[error("flipped card {card} is already in a player's hand")]
    FlippedCardHeld { card: Card },
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error(transparent)]
    Round(#[from] RoundError),
}

pub(crate) fn check_players(players: &[Player]) -> Result<(), SimulationError> {
    if players.len() != PLAYER_COUNT {
        return Err(SimulationError::PlayerCount {
            found: players.len(),
        });
    }
    for (seat, player) in players.iter().enumerate() {
        if PlayerId::from_index(seat) != Some(player.id) {
            return Err(SimulationError::SeatOrder {
                seat: seat + 1,
                found: player.id,
            });
        }
    }
    Ok(())
}

/// The parts of a run that never change between trials.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// `None` resolves the call from scratch every trial, dealer pickup included.
    call: Option<CallTemplate>,
    flipped_card: Card,
    dealer: Option<PlayerId>,
    seating: Seating,
    /// Loner with a random caller: the teammate to sit out is known only per trial.
    loner_per_trial: bool,
    pool: Vec<Card>,
    baselines: Vec<Vec<Card>>,
}

impl SimulationContext {
    pub fn prepare<R: Rng + ?Sized>(
        config: &RoundSimulation,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        if config.quantity == 0 {
            return Err(SimulationError::ZeroQuantity);
        }
        check_players(&config.players)?;

        let mut call = config.call;
        let mut seating = Seating::full();
        let mut loner_per_trial = false;
        if let Some(template) = call.filter(|template| template.call_type.is_loner()) {
            match template.caller {
                Some(caller) => seating = seating.without(caller.teammate()),
                None => loner_per_trial = true,
            }
        }

        let baselines: Vec<Vec<Card>> = config
            .players
            .iter()
            .map(|player| player.hand.remaining_cards().to_vec())
            .collect();
        let mut pool = Deck::remaining_after(baselines.iter().flatten());
        let turned_suit = call
            .filter(|template| template.call_type.is_phase_one())
            .and_then(|template| template.suit);
        let flipped_card = match config.flipped_card {
            Some(card) => card,
            None => pool
                .iter()
                .copied()
                .filter(|card| turned_suit.is_none_or(|suit| card.suit == suit))
                .collect::<Vec<_>>()
                .choose(rng)
                .copied()
                .ok_or(SimulationError::NoFlippedCard)?,
        };
        if let Some(suit) = turned_suit.filter(|suit| *suit != flipped_card.suit) {
            return Err(SimulationError::TurnedSuitMismatch {
                suit,
                card: flipped_card,
            });
        }

        match call.as_mut() {
            Some(template) => {
                if template.suit.is_none() && template.call_type.is_phase_one() {
                    template.suit = Some(flipped_card.suit);
                }
            }
            None => {
                if baselines.iter().flatten().any(|card| *card == flipped_card) {
                    return Err(SimulationError::FlippedCardHeld { card: flipped_card });
                }
                pool.retain(|card| *card != flipped_card);
            }
        }

        Ok(Self {
            call,
            flipped_card,
            dealer: config.dealer,
            seating,
            loner_per_trial,
            pool,
            baselines,
        })
    }

    pub fn flipped_card(&self) -> Card {
        self.flipped_card
    }

    /// The configured call with phase-1 suits filled in; `None` when drawn per trial.
    pub fn call(&self) -> Option<&CallTemplate> {
        self.call.as_ref()
    }

    /// Active seats when the caller is known up front.
    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    /// Cards left for the deal once every fixed card is set aside.
    pub fn pool(&self) -> &[Card] {
        &self.pool
    }

    fn refill<R: Rng + ?Sized>(&self, pool: &mut Vec<Card>, rng: &mut R) {
        pool.clear();
        pool.extend_from_slice(&self.pool);
        shuffle(pool, rng);
    }

    fn play_trial<R: Rng + ?Sized>(
        &self,
        id: u32,
        players: &mut [Player],
        pool: &mut Vec<Card>,
        rng: &mut R,
    ) -> Result<Round, SimulationError> {
        let dealer = self.dealer.unwrap_or_else(|| self.seating.choose(rng));
        let mut round = match self.call {
            Some(template) => self.deal_for_template(id, dealer, template, players, pool, rng)?,
            None => self.deal_for_random_call(id, dealer, players, pool, rng)?,
        };
        play_round(&mut round, players, rng)?;
        Ok(round)
    }

    fn deal_for_template<R: Rng + ?Sized>(
        &self,
        id: u32,
        dealer: PlayerId,
        mut template: CallTemplate,
        players: &mut [Player],
        pool: &mut Vec<Card>,
        rng: &mut R,
    ) -> Result<Round, SimulationError> {
        let mut seating = self.seating;
        if self.loner_per_trial {
            let caller = seating.choose(rng);
            seating = seating.without(caller.teammate());
            template.caller = Some(caller);
        }

        self.refill(pool, rng);
        deal(
            players.iter_mut().filter(|player| seating.contains(player.id)),
            pool,
        )?;

        let call = template.resolve(&seating, rng);
        Ok(Round::new(id, dealer, self.flipped_card, call, seating))
    }

    fn deal_for_random_call<R: Rng + ?Sized>(
        &self,
        id: u32,
        dealer: PlayerId,
        players: &mut [Player],
        pool: &mut Vec<Card>,
        rng: &mut R,
    ) -> Result<Round, SimulationError> {
        self.refill(pool, rng);
        deal(players.iter_mut(), pool)?;
        let resolution = resolve_random_call(players, self.seating, dealer, self.flipped_card, rng)?;
        Ok(Round::new(
            id,
            dealer,
            self.flipped_card,
            resolution.call,
            resolution.seating,
        ))
    }
}

/// Borrow of the table for one trial. Dropping it puts every hand back to its fixed
/// cards.
struct TrialTable<'a> {
    players: &'a mut [Player],
    baselines: &'a [Vec<Card>],
}

impl<'a> TrialTable<'a> {
    fn new(players: &'a mut [Player], baselines: &'a [Vec<Card>]) -> Self {
        Self { players, baselines }
    }
}

impl Deref for TrialTable<'_> {
    type Target = [Player];

    fn deref(&self) -> &[Player] {
        self.players
    }
}

impl DerefMut for TrialTable<'_> {
    fn deref_mut(&mut self) -> &mut [Player] {
        self.players
    }
}

impl Drop for TrialTable<'_> {
    fn drop(&mut self) {
        for (player, baseline) in self.players.iter_mut().zip(self.baselines) {
            player.hand.reset_to(baseline);
        }
    }
}

/// Runs `config.quantity` independent rounds and accumulates points, wins and tricks.
///
/// Any failed trial aborts the run; no partial totals are returned.
pub fn simulate<R: Rng + ?Sized>(
    config: RoundSimulation,
    rng: &mut R,
) -> Result<SimulationResults, SimulationError> {
    let context = SimulationContext::prepare(&config, rng)?;
    let RoundSimulation {
        mut players,
        quantity,
        keep_rounds,
        ..
    } = config;

    info!(
        target: "euchre_core::sim",
        quantity,
        keep_rounds,
        flipped_card = %context.flipped_card,
        fixed_dealer = ?context.dealer,
        call = ?context.call,
        "starting round simulation"
    );

    let mut totals = SimulationTotals::default();
    let mut rounds = Vec::new();
    let mut pool = Vec::with_capacity(context.pool.len());

    for id in 1..=quantity {
        let mut table = TrialTable::new(&mut players, &context.baselines);
        let round = context.play_trial(id, &mut table, &mut pool, rng)?;
        totals.record(&round);
        if keep_rounds {
            rounds.push(RoundRecord::capture(&round, &table));
        }
        debug!(
            target: "euchre_core::sim",
            trial = id,
            dealer = %round.dealer(),
            call = %round.call(),
            black = round.points_won().get(Team::Black),
            red = round.points_won().get(Team::Red),
            "trial complete"
        );
    }

    info!(
        target: "euchre_core::sim",
        trials = totals.trials,
        black_points = totals.points.get(Team::Black),
        red_points = totals.points.get(Team::Red),
        "round simulation finished"
    );

    Ok(SimulationResults {
        players,
        flipped_card: context.flipped_card,
        totals,
        rounds,
    })
}
