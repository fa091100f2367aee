//! Card strength under a trump suit and an established play suit.
//!
//! Lower ranks are stronger. Trump occupies 1..=7 (right bower, left bower, then
//! A K Q 10 9), cards of the play suit 8..=13 and everything else 14..=19. When the play
//! suit is trump every non-trump card takes the 8..=13 band of its own suit.
//!
//! Both lookups are precomputed for every trump, play suit and card, so trick
//! resolution never recomputes them.

use crate::model::card::{Card, DECK_SIZE};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use once_cell::sync::Lazy;

pub const RIGHT_BOWER_RANK: u8 = 1;
pub const LEFT_BOWER_RANK: u8 = 2;
const TRUMP_BASE: u8 = 3;
const PLAY_SUIT_BASE: u8 = 8;
const DEAD_SUIT_BASE: u8 = 14;
/// Weakest possible rank.
pub const LOWEST_RANK: u8 = DEAD_SUIT_BASE + 5;

struct RankTables {
    effective: [[Suit; DECK_SIZE]; 4],
    ranks: [[[u8; DECK_SIZE]; 4]; 4],
}

static TABLES: Lazy<RankTables> = Lazy::new(RankTables::build);

impl RankTables {
    fn build() -> Self {
        let mut effective = [[Suit::Spades; DECK_SIZE]; 4];
        let mut ranks = [[[0u8; DECK_SIZE]; 4]; 4];

        for trump in Suit::ALL {
            for index in 0..DECK_SIZE {
                let Some(card) = Card::from_index(index) else {
                    continue;
                };
                effective[trump.index()][index] = compute_effective_suit(card, trump);
                for play in Suit::ALL {
                    ranks[trump.index()][play.index()][index] = compute_rank(card, trump, play);
                }
            }
        }

        Self { effective, ranks }
    }
}

/// Position from the top among non-bower cards: ace 0, king 1, queen 2, jack 3, ten 4,
/// nine 5.
const fn natural_offset(rank: Rank) -> u8 {
    Rank::Ace as u8 - rank as u8
}

fn compute_is_trump(card: Card, trump: Suit) -> bool {
    card.suit == trump || (card.is_jack() && card.suit.color() == trump.color())
}

fn compute_effective_suit(card: Card, trump: Suit) -> Suit {
    if compute_is_trump(card, trump) {
        trump
    } else {
        card.suit
    }
}

fn compute_rank(card: Card, trump: Suit, play: Suit) -> u8 {
    if compute_is_trump(card, trump) {
        return match (card.is_jack(), card.suit == trump) {
            (true, true) => RIGHT_BOWER_RANK,
            (true, false) => LEFT_BOWER_RANK,
            // The jack is gone from the trump run, so ten and nine close the gap.
            _ if card.rank < Rank::Jack => TRUMP_BASE + natural_offset(card.rank) - 1,
            _ => TRUMP_BASE + natural_offset(card.rank),
        };
    }

    if play == trump || card.suit == play {
        PLAY_SUIT_BASE + natural_offset(card.rank)
    } else {
        DEAD_SUIT_BASE + natural_offset(card.rank)
    }
}

/// True for cards of the trump suit and for the jack of the same color.
pub fn is_trump(card: Card, trump: Suit) -> bool {
    effective_suit(card, trump) == trump
}

pub fn effective_suit(card: Card, trump: Suit) -> Suit {
    TABLES.effective[trump.index()][card.index()]
}

pub fn rank(card: Card, trump: Suit, play_suit: Suit) -> u8 {
    TABLES.ranks[trump.index()][play_suit.index()][card.index()]
}
