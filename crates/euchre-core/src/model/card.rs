use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of distinct cards in a euchre deck.
pub const DECK_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Dense index in `0..DECK_SIZE`, suit-major.
    pub const fn index(self) -> usize {
        self.suit.index() * Rank::ORDERED.len() + self.rank.index()
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index >= DECK_SIZE {
            return None;
        }
        let suit = match Suit::from_index(index / Rank::ORDERED.len()) {
            Some(suit) => suit,
            None => return None,
        };
        let rank = Rank::ORDERED[index % Rank::ORDERED.len()];
        Some(Self { rank, suit })
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.rank, Rank::Jack)
    }

    /// Long form used by external callers, e.g. `jack_of_spades`.
    pub fn name(self) -> String {
        format!("{}_of_{}", self.rank.name(), self.suit.name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card name: '{0}'")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || ParseCardError(value.to_string());

        if let Some((rank, suit)) = trimmed.split_once("_of_") {
            let rank = Rank::from_name(rank).ok_or_else(invalid)?;
            let suit = suit.parse::<Suit>().map_err(|_| invalid())?;
            return Ok(Card::new(rank, suit));
        }

        let mut chars = trimmed.chars();
        let suit = chars
            .next_back()
            .and_then(Suit::from_symbol)
            .ok_or_else(invalid)?;
        let rank = Rank::from_symbol(chars.as_str()).ok_or_else(invalid)?;
        Ok(Card::new(rank, suit))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.name()
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
