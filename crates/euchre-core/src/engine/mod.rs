pub mod call;
pub mod deal;
pub mod round;
pub mod trick;

use crate::model::player::{Player, PlayerId};
use crate::model::round::RoundError;

pub(crate) fn player_mut(players: &mut [Player], id: PlayerId) -> Result<&mut Player, RoundError> {
    players
        .iter_mut()
        .find(|player| player.id == id)
        .ok_or(RoundError::UnknownPlayer { player: id })
}
