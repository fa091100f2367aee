use crate::engine::deal::DealError;
use crate::model::call::Call;
use crate::model::card::Card;
use crate::model::player::{PlayerId, Team};
use crate::model::score::TeamTally;
use crate::model::seating::Seating;
use crate::model::trick::{TRICKS_PER_ROUND, Trick, TrickError};
use thiserror::Error;

const SWEEP_POINTS: u32 = 2;
const LONER_SWEEP_POINTS: u32 = 4;
const MAJORITY_POINTS: u32 = 1;
const EUCHRE_POINTS: u32 = 2;

/// One deal-call-five-tricks cycle.
///
/// Hands live on the players; the round only records the call, the tricks and the
/// tallies derived from them.
#[derive(Debug, Clone)]
pub struct Round {
    id: u32,
    dealer: PlayerId,
    flipped_card: Card,
    call: Call,
    seating: Seating,
    tricks: Vec<Trick>,
    tricks_won: TeamTally,
    points_won: TeamTally,
    is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error(transparent)]
    Trick(#[from] TrickError),
    #[error("trick {id} recorded before every active player had played")]
    IncompleteTrick { id: u8 },
    #[error("round already has all of its tricks")]
    RoundComplete,
    #[error("round finished with {found} tricks, expected 5")]
    TrickCount { found: usize },
    #[error("player {player} has no cards left to play")]
    EmptyHand { player: PlayerId },
    #[error("player {player} is not seated at this table")]
    UnknownPlayer { player: PlayerId },
}

impl Round {
    pub fn new(id: u32, dealer: PlayerId, flipped_card: Card, call: Call, seating: Seating) -> Self {
        Self {
            id,
            dealer,
            flipped_card,
            call,
            seating,
            tricks: Vec::with_capacity(TRICKS_PER_ROUND),
            tricks_won: TeamTally::new(),
            points_won: TeamTally::new(),
            is_complete: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn dealer(&self) -> PlayerId {
        self.dealer
    }

    pub fn flipped_card(&self) -> Card {
        self.flipped_card
    }

    pub fn call(&self) -> &Call {
        &self.call
    }

    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    pub fn active_player_count(&self) -> usize {
        self.seating.len()
    }

    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn tricks_won(&self) -> &TeamTally {
        &self.tricks_won
    }

    pub fn points_won(&self) -> &TeamTally {
        &self.points_won
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// The team that scored this round, once complete.
    pub fn winning_team(&self) -> Option<Team> {
        self.points_won.scoring_teams().next()
    }

    /// The first trick is led from the left of the dealer; later ones by the previous
    /// trick's winner.
    pub fn next_leader(&self) -> PlayerId {
        self.tricks
            .last()
            .and_then(Trick::winner)
            .unwrap_or_else(|| self.seating.next_after(self.dealer))
    }

    pub fn start_trick(&self) -> Trick {
        Trick::new(
            self.tricks.len() as u8 + 1,
            self.next_leader(),
            self.call.suit,
            self.seating.len(),
        )
    }

    /// Tallies a finished trick for its winner's team and scores the round after the
    /// fifth.
    pub fn record_trick(&mut self, trick: Trick) -> Result<(), RoundError> {
        if self.is_complete {
            return Err(RoundError::RoundComplete);
        }
        let winner = trick
            .winner()
            .ok_or(RoundError::IncompleteTrick { id: trick.id() })?;

        self.tricks_won.add(winner.team(), 1);
        self.tricks.push(trick);

        if self.tricks.len() >= TRICKS_PER_ROUND {
            self.is_complete = true;
            self.update_team_points_won()?;
        }
        Ok(())
    }

    /// Winner-take-all scoring: the calling team earns 1 for a majority, 2 for a sweep
    /// and 4 for a loner sweep; otherwise the defenders earn 2.
    pub fn update_team_points_won(&mut self) -> Result<(), RoundError> {
        if self.tricks.len() != TRICKS_PER_ROUND {
            return Err(RoundError::TrickCount {
                found: self.tricks.len(),
            });
        }

        let calling_team = self.call.caller.team();
        let defending_team = calling_team.opponent();
        let calling_wins = self.tricks_won.get(calling_team);
        let defending_wins = self.tricks_won.get(defending_team);

        self.points_won = TeamTally::new();
        if calling_wins > defending_wins {
            let points = if calling_wins == TRICKS_PER_ROUND as u32 {
                if self.call.is_loner() {
                    LONER_SWEEP_POINTS
                } else {
                    SWEEP_POINTS
                }
            } else {
                MAJORITY_POINTS
            };
            self.points_won.add(calling_team, points);
        } else {
            self.points_won.add(defending_team, EUCHRE_POINTS);
        }
        Ok(())
    }
}
