use crate::model::card::{Card, DECK_SIZE};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// Cards of a standard deck that do not appear in `held`, in deck order.
    pub fn remaining_after<'a>(held: impl IntoIterator<Item = &'a Card>) -> Vec<Card> {
        let mut taken = [false; DECK_SIZE];
        for card in held {
            taken[card.index()] = true;
        }
        Self::standard()
            .cards
            .into_iter()
            .filter(|card| !taken[card.index()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::{Card, DECK_SIZE};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_24_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn remaining_after_excludes_held_cards() {
        let held = [
            Card::new(Rank::Jack, Suit::Spades),
            Card::new(Rank::Nine, Suit::Hearts),
        ];
        let remaining = Deck::remaining_after(held.iter());
        assert_eq!(remaining.len(), DECK_SIZE - 2);
        assert!(held.iter().all(|card| !remaining.contains(card)));
    }
}
