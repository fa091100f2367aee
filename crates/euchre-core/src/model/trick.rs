use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use crate::rules::ranking;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of tricks in a round.
pub const TRICKS_PER_ROUND: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub card: Card,
    pub player: PlayerId,
    /// 1-based position within the trick.
    pub sequence: u8,
    pub is_lead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("player {0} has already played this trick")]
    AlreadyPlayed(PlayerId),
}

/// One card from each active player. The lead card fixes the play suit; the winning play
/// is tracked as cards arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    id: u8,
    leader: PlayerId,
    trump: Suit,
    play_suit: Option<Suit>,
    plays: Vec<Play>,
    winning: Option<usize>,
    expected_plays: usize,
}

impl Trick {
    pub fn new(id: u8, leader: PlayerId, trump: Suit, expected_plays: usize) -> Self {
        Self {
            id,
            leader,
            trump,
            play_suit: None,
            plays: Vec::with_capacity(expected_plays),
            winning: None,
            expected_plays,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    pub fn trump(&self) -> Suit {
        self.trump
    }

    /// Effective suit of the lead card, once led.
    pub fn play_suit(&self) -> Option<Suit> {
        self.play_suit
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.expected_plays
    }

    pub fn winning_play(&self) -> Option<&Play> {
        self.winning.map(|index| &self.plays[index])
    }

    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_complete() {
            return None;
        }
        self.winning_play().map(|play| play.player)
    }

    /// Records `card` for `player`. The first card leads; later cards replace the winner
    /// only with a strictly lower rank.
    pub fn play(&mut self, player: PlayerId, card: Card) -> Result<&Play, TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }
        if self.plays.iter().any(|play| play.player == player) {
            return Err(TrickError::AlreadyPlayed(player));
        }

        let is_lead = self.plays.is_empty();
        let index = self.plays.len();
        self.plays.push(Play {
            card,
            player,
            sequence: index as u8 + 1,
            is_lead,
        });

        match (self.play_suit, self.winning) {
            (Some(play_suit), Some(current)) => {
                let challenger = ranking::rank(card, self.trump, play_suit);
                let holder = ranking::rank(self.plays[current].card, self.trump, play_suit);
                if challenger < holder {
                    self.winning = Some(index);
                }
            }
            _ => {
                self.play_suit = Some(ranking::effective_suit(card, self.trump));
                self.winning = Some(index);
            }
        }

        Ok(&self.plays[index])
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn id(n: u8) -> PlayerId {
        PlayerId::new(n).unwrap()
    }

    #[test]
    fn lead_sets_play_suit_and_winner() {
        let mut trick = Trick::new(1, id(2), Suit::Spades, 4);
        let lead = trick.play(id(2), Card::new(Rank::Nine, Suit::Hearts)).unwrap();
        assert!(lead.is_lead);
        assert_eq!(lead.sequence, 1);
        assert_eq!(trick.play_suit(), Some(Suit::Hearts));
        assert_eq!(trick.winning_play().unwrap().player, id(2));
        assert_eq!(trick.winner(), None);
    }

    #[test]
    fn left_bower_lead_establishes_trump() {
        let mut trick = Trick::new(1, id(1), Suit::Diamonds, 4);
        trick.play(id(1), Card::new(Rank::Jack, Suit::Hearts)).unwrap();
        assert_eq!(trick.play_suit(), Some(Suit::Diamonds));
    }

    #[test]
    fn trump_beats_play_suit_and_off_suit_never_wins() {
        let mut trick = Trick::new(1, id(1), Suit::Spades, 4);
        trick.play(id(1), Card::new(Rank::Ten, Suit::Hearts)).unwrap();
        trick.play(id(2), Card::new(Rank::Ace, Suit::Diamonds)).unwrap();
        trick.play(id(3), Card::new(Rank::Nine, Suit::Spades)).unwrap();
        trick.play(id(4), Card::new(Rank::Ace, Suit::Hearts)).unwrap();

        assert!(trick.is_complete());
        assert_eq!(trick.winner(), Some(id(3)));
    }

    #[test]
    fn right_bower_beats_left_bower() {
        let mut trick = Trick::new(2, id(3), Suit::Clubs, 3);
        trick.play(id(3), Card::new(Rank::Jack, Suit::Spades)).unwrap();
        trick.play(id(4), Card::new(Rank::Ace, Suit::Clubs)).unwrap();
        trick.play(id(1), Card::new(Rank::Jack, Suit::Clubs)).unwrap();
        assert_eq!(trick.winner(), Some(id(1)));
    }

    #[test]
    fn rejects_extra_and_repeated_plays() {
        let mut trick = Trick::new(1, id(1), Suit::Hearts, 3);
        trick.play(id(1), Card::new(Rank::Nine, Suit::Clubs)).unwrap();
        assert_eq!(
            trick.play(id(1), Card::new(Rank::Ten, Suit::Clubs)),
            Err(TrickError::AlreadyPlayed(id(1)))
        );
        trick.play(id(2), Card::new(Rank::Ten, Suit::Clubs)).unwrap();
        trick.play(id(4), Card::new(Rank::Queen, Suit::Clubs)).unwrap();
        assert_eq!(
            trick.play(id(3), Card::new(Rank::King, Suit::Clubs)),
            Err(TrickError::TrickComplete)
        );
        assert_eq!(trick.winner(), Some(id(4)));
    }
}
