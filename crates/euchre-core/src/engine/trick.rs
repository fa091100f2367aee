use super::player_mut;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::round::RoundError;
use crate::model::seating::Seating;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use crate::rules::effective_suit;
use rand::Rng;

/// Removes and returns a uniformly random legal card from `hand`.
///
/// A leader may play anything. A follower must play a card whose effective suit is the
/// play suit when holding one; otherwise any card is legal.
pub fn choose_play<R: Rng + ?Sized>(
    hand: &mut Hand,
    is_lead: bool,
    trump: Suit,
    play_suit: Option<Suit>,
    rng: &mut R,
) -> Option<Card> {
    if hand.is_empty() {
        return None;
    }

    let follow = play_suit.filter(|_| !is_lead);
    let follows = |card: &Card| follow.is_some_and(|suit| effective_suit(*card, trump) == suit);
    let following = hand.iter().filter(|card| follows(*card)).count();

    let index = if following == 0 {
        rng.gen_range(0..hand.len())
    } else {
        let pick = rng.gen_range(0..following);
        hand.iter()
            .enumerate()
            .filter(|(_, card)| follows(*card))
            .nth(pick)
            .map(|(index, _)| index)?
    };
    Some(hand.take_at(index))
}

/// Lets every active seat play once, clockwise from the trick's leader.
pub fn play_trick<R: Rng + ?Sized>(
    trick: &mut Trick,
    players: &mut [Player],
    seating: &Seating,
    rng: &mut R,
) -> Result<(), RoundError> {
    let mut seat = trick.leader();
    while !trick.is_complete() {
        let player = player_mut(players, seat)?;
        let card = choose_play(
            &mut player.hand,
            trick.plays().is_empty(),
            trick.trump(),
            trick.play_suit(),
            rng,
        )
        .ok_or(RoundError::EmptyHand { player: seat })?;
        trick.play(seat, card)?;
        seat = seating.next_after(seat);
    }
    tracing::trace!(
        target: "euchre_core::game",
        trick = trick.id(),
        winner = ?trick.winner(),
        "trick complete"
    );
    Ok(())
}
