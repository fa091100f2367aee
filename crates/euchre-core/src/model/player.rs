use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of seats at a euchre table.
pub const PLAYER_COUNT: usize = 4;

/// Seat id, `1..=4`, increasing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    pub const LOOP: [PlayerId; PLAYER_COUNT] = [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)];

    /// Returns `None` for `0`, which external callers use to mean "random".
    pub const fn new(id: u8) -> Option<Self> {
        match id {
            1..=4 => Some(PlayerId(id)),
            _ => None,
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based seat index.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PLAYER_COUNT {
            Some(PlayerId(index as u8 + 1))
        } else {
            None
        }
    }

    pub const fn next(self) -> PlayerId {
        PlayerId(self.0 % PLAYER_COUNT as u8 + 1)
    }

    pub const fn teammate(self) -> PlayerId {
        PlayerId((self.0 + 1) % PLAYER_COUNT as u8 + 1)
    }

    pub const fn team(self) -> Team {
        if self.0 % 2 == 1 { Team::Black } else { Team::Red }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PlayerId::new(value).ok_or_else(|| format!("player id must be 1..=4, got {value}"))
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Black,
    Red,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Black, Team::Red];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::Black => Team::Red,
            Team::Red => Team::Black,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Team::Black => "black",
            Team::Red => "red",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Hand,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::new(),
        }
    }

    pub fn team(&self) -> Team {
        self.id.team()
    }

    /// `Player1`..`Player4` with empty hands, in seat order.
    pub fn default_table() -> Vec<Player> {
        PlayerId::LOOP
            .iter()
            .map(|&id| Player::new(id, format!("Player{id}")))
            .collect()
    }
}
