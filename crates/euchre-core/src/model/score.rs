use crate::model::player::{PLAYER_COUNT, PlayerId, Team};
use serde::{Deserialize, Serialize};

/// Per-team counter, used for tricks, points, wins and game scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTally {
    black: u32,
    red: u32,
}

impl TeamTally {
    pub const fn new() -> Self {
        Self { black: 0, red: 0 }
    }

    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Black => self.black,
            Team::Red => self.red,
        }
    }

    pub fn add(&mut self, team: Team, amount: u32) {
        match team {
            Team::Black => self.black += amount,
            Team::Red => self.red += amount,
        }
    }

    pub fn total(&self) -> u32 {
        self.black + self.red
    }

    /// Adds every team's count from `other`.
    pub fn absorb(&mut self, other: &TeamTally) {
        self.black += other.black;
        self.red += other.red;
    }

    /// Teams with a nonzero count.
    pub fn scoring_teams(&self) -> impl Iterator<Item = Team> + '_ {
        Team::ALL.into_iter().filter(|team| self.get(*team) > 0)
    }

    pub fn leader(&self) -> Option<Team> {
        match self.black.cmp(&self.red) {
            core::cmp::Ordering::Greater => Some(Team::Black),
            core::cmp::Ordering::Less => Some(Team::Red),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// Per-seat counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    totals: [u32; PLAYER_COUNT],
}

impl PlayerTally {
    pub const fn new() -> Self {
        Self {
            totals: [0; PLAYER_COUNT],
        }
    }

    pub fn get(&self, id: PlayerId) -> u32 {
        self.totals[id.index()]
    }

    pub fn add(&mut self, id: PlayerId, amount: u32) {
        self.totals[id.index()] += amount;
    }

    pub fn total(&self) -> u32 {
        self.totals.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        PlayerId::LOOP.into_iter().map(|id| (id, self.get(id)))
    }
}
