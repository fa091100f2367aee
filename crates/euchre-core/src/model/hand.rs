use crate::model::card::Card;
use serde::{Deserialize, Serialize};

/// Maximum number of cards a player holds after the deal.
pub const HAND_SIZE: usize = 5;

/// Cards held by one player.
///
/// `starting_cards` is the snapshot taken when the deal completes; `remaining_cards`
/// shrinks as the round is played and is the only part mutated during play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    starting_cards: Vec<Card>,
    remaining_cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hand pre-seeded with fixed cards, to be topped up by the deal.
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            starting_cards: Vec::new(),
            remaining_cards: cards,
        }
    }

    pub fn starting_cards(&self) -> &[Card] {
        &self.starting_cards
    }

    pub fn remaining_cards(&self) -> &[Card] {
        &self.remaining_cards
    }

    pub fn len(&self) -> usize {
        self.remaining_cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.remaining_cards.contains(&card)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.remaining_cards.iter()
    }

    /// Removes and returns the card at `index` of the remaining cards.
    pub fn take_at(&mut self, index: usize) -> Card {
        self.remaining_cards.remove(index)
    }

    pub fn push(&mut self, card: Card) {
        self.remaining_cards.push(card);
    }

    /// Places dealt cards ahead of any fixed cards already held.
    pub fn prepend(&mut self, cards: &[Card]) {
        self.remaining_cards.splice(0..0, cards.iter().copied());
    }

    /// Records the current remaining cards as the starting snapshot.
    pub fn snapshot_start(&mut self) {
        self.starting_cards.clear();
        self.starting_cards.extend_from_slice(&self.remaining_cards);
    }

    /// Drops everything dealt and played, keeping only `baseline` in hand.
    pub fn reset_to(&mut self, baseline: &[Card]) {
        self.starting_cards.clear();
        self.remaining_cards.clear();
        self.remaining_cards.extend_from_slice(baseline);
    }

    pub fn clear(&mut self) {
        self.reset_to(&[]);
    }
}
