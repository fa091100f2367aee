use super::call::resolve_random_call;
use super::deal::deal;
use super::trick::play_trick;
use crate::model::deck::Deck;
use crate::model::player::{Player, PlayerId};
use crate::model::round::{Round, RoundError};
use crate::model::seating::Seating;
use crate::model::trick::TRICKS_PER_ROUND;
use rand::Rng;

/// Plays tricks until the round is complete. Hands must already be dealt.
pub fn play_round<R: Rng + ?Sized>(
    round: &mut Round,
    players: &mut [Player],
    rng: &mut R,
) -> Result<(), RoundError> {
    while !round.is_complete() {
        if round.tricks().len() >= TRICKS_PER_ROUND {
            return Err(RoundError::TrickCount {
                found: round.tricks().len(),
            });
        }
        let mut trick = round.start_trick();
        play_trick(&mut trick, players, round.seating(), rng)?;
        round.record_trick(trick)?;
    }
    Ok(())
}

/// A whole round from a fresh shuffle: deal all four seats, turn up the next card,
/// draw the call, play.
pub fn deal_and_play_round<R: Rng + ?Sized>(
    id: u32,
    dealer: PlayerId,
    players: &mut [Player],
    rng: &mut R,
) -> Result<Round, RoundError> {
    let deck = Deck::shuffled(rng).into_cards();
    let used = deal(players.iter_mut(), &deck)?;
    let flipped_card = deck[used];

    let resolution = resolve_random_call(players, Seating::full(), dealer, flipped_card, rng)?;
    let mut round = Round::new(id, dealer, flipped_card, resolution.call, resolution.seating);
    play_round(&mut round, players, rng)?;

    tracing::debug!(
        target: "euchre_core::game",
        round = id,
        dealer = %dealer,
        call = %round.call(),
        winner = ?round.winning_team(),
        "round complete"
    );
    Ok(round)
}
