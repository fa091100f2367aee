use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Clubs = 1,
    Hearts = 2,
    Diamonds = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Spades),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Diamonds),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn color(self) -> Color {
        match self {
            Suit::Spades | Suit::Clubs => Color::Black,
            Suit::Hearts | Suit::Diamonds => Color::Red,
        }
    }

    /// The other suit of the same color; its jack is the left bower when `self` is trump.
    pub const fn partner(self) -> Suit {
        match self {
            Suit::Spades => Suit::Clubs,
            Suit::Clubs => Suit::Spades,
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Clubs => "clubs",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
        }
    }

    pub(crate) fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'C' => Some(Suit::Clubs),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid suit name: '{0}'")]
pub struct ParseSuitError(pub String);

impl FromStr for Suit {
    type Err = ParseSuitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            return Suit::from_symbol(symbol).ok_or_else(|| ParseSuitError(value.to_string()));
        }
        Suit::ALL
            .iter()
            .copied()
            .find(|suit| suit.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSuitError(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Suit};

    #[test]
    fn display_returns_lowercase_names() {
        assert_eq!(Suit::Spades.to_string(), "spades");
        assert_eq!(Suit::Diamonds.to_string(), "diamonds");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Hearts));
        assert_eq!(Suit::from_index(4), None);
    }

    #[test]
    fn two_suits_per_color() {
        for color in [Color::Black, Color::Red] {
            assert_eq!(Suit::ALL.iter().filter(|s| s.color() == color).count(), 2);
        }
        for suit in Suit::ALL {
            assert_eq!(suit.partner().color(), suit.color());
            assert_ne!(suit.partner(), suit);
        }
    }

    #[test]
    fn parses_names_and_symbols() {
        assert_eq!("spades".parse::<Suit>(), Ok(Suit::Spades));
        assert_eq!("Hearts".parse::<Suit>(), Ok(Suit::Hearts));
        assert_eq!("d".parse::<Suit>(), Ok(Suit::Diamonds));
        assert_eq!("C".parse::<Suit>(), Ok(Suit::Clubs));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "swords".parse::<Suit>().unwrap_err();
        assert!(err.to_string().contains("invalid suit name"));
        assert!(err.to_string().contains("swords"));
    }
}
