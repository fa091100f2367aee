use super::player_mut;
use crate::model::call::{Call, CallType};
use crate::model::card::Card;
use crate::model::player::{Player, PlayerId};
use crate::model::round::RoundError;
use crate::model::seating::Seating;
use crate::model::suit::Suit;
use rand::Rng;

/// Sides on the die rolled for a loner; the call goes alone when it shows the dealer's seat.
pub const LONER_DIE_SIDES: u8 = 10;

/// A resolved call together with the seats that will play it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallResolution {
    pub call: Call,
    pub seating: Seating,
}

/// Draws a call with no fixed inputs.
///
/// Phase 1 offers the flipped suit to each active seat clockwise from the dealer's left;
/// seat `i` accepts when a roll over `0..2n` lands on `i`. An accepted phase-1 call makes
/// the dealer pick up the flipped card. Phase 2 repeats the walk for a random suit and
/// the last seat (the dealer) must call. A loner is then rolled, and a loner sits the
/// caller's teammate out.
pub fn resolve_random_call<R: Rng + ?Sized>(
    players: &mut [Player],
    seating: Seating,
    dealer: PlayerId,
    flipped_card: Card,
    rng: &mut R,
) -> Result<CallResolution, RoundError> {
    let seats = seating.len();
    let (phase_one, suit, caller) = match offer_phase_one(&seating, dealer, rng) {
        Some(caller) => {
            pick_up_flipped_card(players, dealer, flipped_card, rng)?;
            (true, flipped_card.suit, caller)
        }
        None => {
            let caller = offer_phase_two(&seating, dealer, rng);
            (false, Suit::ALL[rng.gen_range(0..Suit::ALL.len())], caller)
        }
    };

    let loner = rng.gen_range(1..=LONER_DIE_SIDES) == dealer.get();
    let call = Call::new(suit, CallType::new(phase_one, loner), caller);
    let seating = seating_for_call(seating, &call);

    tracing::trace!(
        target: "euchre_core::game",
        seats,
        call = %call,
        "call resolved"
    );
    Ok(CallResolution { call, seating })
}

/// Active seats once `call` is known: a loner drops the caller's teammate.
pub fn seating_for_call(seating: Seating, call: &Call) -> Seating {
    if call.is_loner() {
        seating.without(call.caller.teammate())
    } else {
        seating
    }
}

fn offer_phase_one<R: Rng + ?Sized>(
    seating: &Seating,
    dealer: PlayerId,
    rng: &mut R,
) -> Option<PlayerId> {
    let seats = seating.len();
    let mut seat = dealer;
    for position in 0..seats {
        seat = seating.next_after(seat);
        if rng.gen_range(0..2 * seats) == position {
            return Some(seat);
        }
    }
    None
}

fn offer_phase_two<R: Rng + ?Sized>(seating: &Seating, dealer: PlayerId, rng: &mut R) -> PlayerId {
    let seats = seating.len();
    let mut seat = dealer;
    for position in 0..seats {
        seat = seating.next_after(seat);
        if position + 1 == seats || rng.gen_range(0..2 * seats) == position {
            break;
        }
    }
    seat
}

/// The dealer swaps a random card for the flipped one; the swap becomes part of the
/// dealer's starting hand.
pub fn pick_up_flipped_card<R: Rng + ?Sized>(
    players: &mut [Player],
    dealer: PlayerId,
    flipped_card: Card,
    rng: &mut R,
) -> Result<(), RoundError> {
    let hand = &mut player_mut(players, dealer)?.hand;
    if hand.is_empty() {
        return Err(RoundError::EmptyHand { player: dealer });
    }
    let discard = rng.gen_range(0..hand.len());
    hand.take_at(discard);
    hand.push(flipped_card);
    hand.snapshot_start();
    Ok(())
}
