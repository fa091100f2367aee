use crate::model::player::{PLAYER_COUNT, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The seats taking part in a round, as a bitmask over seat indices.
///
/// A loner call clears the caller's teammate; iteration order stays clockwise from
/// seat 1 and `next_after` skips cleared seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    mask: u8,
    next: [PlayerId; PLAYER_COUNT],
}

impl Seating {
    pub fn full() -> Self {
        Self::from_mask(0b1111)
    }

    fn from_mask(mask: u8) -> Self {
        let mut next = PlayerId::LOOP;
        for id in PlayerId::LOOP {
            let mut candidate = id.next();
            while mask & (1 << candidate.index()) == 0 && candidate != id {
                candidate = candidate.next();
            }
            next[id.index()] = candidate;
        }
        Self { mask, next }
    }

    /// The same seating with `id` sitting out.
    pub fn without(self, id: PlayerId) -> Self {
        Self::from_mask(self.mask & !(1 << id.index()))
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.mask & (1 << id.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        PlayerId::LOOP.into_iter().filter(|id| self.contains(*id))
    }

    /// First active seat clockwise from `id`, which need not itself be active.
    pub fn next_after(&self, id: PlayerId) -> PlayerId {
        self.next[id.index()]
    }

    /// Uniformly random active seat; seat 1 when nobody is seated.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> PlayerId {
        if self.is_empty() {
            return PlayerId::LOOP[0];
        }
        let pick = rng.gen_range(0..self.len());
        self.iter()
            .nth(pick)
            .unwrap_or_else(|| self.next_after(PlayerId::LOOP[0]))
    }
}

impl Default for Seating {
    fn default() -> Self {
        Self::full()
    }
}
