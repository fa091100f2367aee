use crate::model::card::Card;
use crate::model::hand::HAND_SIZE;
use crate::model::player::{Player, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("player {player} holds {found} cards after the deal, expected 5")]
    HandSize { player: PlayerId, found: usize },
}

/// Uniform in-place permutation.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}

/// Tops every player up to five cards from the front of `pool`, in the order given.
///
/// Dealt cards go ahead of any fixed cards already in hand, and each hand's starting
/// snapshot is taken once it is full. Returns how many pool cards were consumed.
pub fn deal<'a, I>(players: I, pool: &[Card]) -> Result<usize, DealError>
where
    I: IntoIterator<Item = &'a mut Player>,
{
    let mut cursor = 0;
    for player in players {
        let missing = HAND_SIZE.saturating_sub(player.hand.len());
        let end = (cursor + missing).min(pool.len());
        player.hand.prepend(&pool[cursor..end]);
        player.hand.snapshot_start();
        cursor = end;

        if player.hand.len() != HAND_SIZE {
            return Err(DealError::HandSize {
                player: player.id,
                found: player.hand.len(),
            });
        }
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::{DealError, deal, shuffle};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::player::{Player, PlayerId};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn every_player_gets_five_distinct_cards() {
        let mut players = Player::default_table();
        let mut pool = Deck::standard().into_cards();
        shuffle(&mut pool, &mut StdRng::seed_from_u64(3));

        let used = deal(players.iter_mut(), &pool).unwrap();
        assert_eq!(used, 20);

        let mut seen = HashSet::new();
        for player in &players {
            assert_eq!(player.hand.len(), 5);
            assert_eq!(player.hand.starting_cards(), player.hand.remaining_cards());
            for card in player.hand.iter() {
                assert!(seen.insert(*card), "{card} dealt twice");
            }
        }
    }

    #[test]
    fn deal_is_deterministic_without_shuffle() {
        let mut players = Player::default_table();
        let pool = Deck::standard().into_cards();
        deal(players.iter_mut(), &pool).unwrap();
        assert_eq!(players[0].hand.remaining_cards(), &pool[0..5]);
        assert_eq!(players[3].hand.remaining_cards(), &pool[15..20]);
    }

    #[test]
    fn fixed_cards_are_kept_and_topped_up() {
        let fixed = vec![
            Card::new(Rank::Jack, Suit::Spades),
            Card::new(Rank::Jack, Suit::Clubs),
        ];
        let mut players = Player::default_table();
        players[0].hand = Hand::with_cards(fixed.clone());
        let pool = Deck::remaining_after(fixed.iter());

        let used = deal(players.iter_mut(), &pool).unwrap();
        assert_eq!(used, 18);
        let hand = players[0].hand.remaining_cards();
        assert_eq!(&hand[3..], fixed.as_slice());
        assert_eq!(&hand[..3], &pool[..3]);
    }

    #[test]
    fn starting_snapshot_survives_play() {
        let mut players = Player::default_table();
        deal(players.iter_mut(), Deck::standard().cards()).unwrap();
        let before = players[1].hand.starting_cards().to_vec();
        players[1].hand.take_at(0);
        players[1].hand.take_at(0);
        assert_eq!(players[1].hand.starting_cards(), before.as_slice());
        assert_eq!(players[1].hand.len(), 3);
    }

    #[test]
    fn short_pool_fails_the_hand_size_check() {
        let mut players = Player::default_table();
        let pool = Deck::standard().into_cards();
        let err = deal(players.iter_mut(), &pool[..12]).unwrap_err();
        assert_eq!(
            err,
            DealError::HandSize {
                player: PlayerId::new(3).unwrap(),
                found: 2
            }
        );
    }
}
