use crate::model::player::PlayerId;
use crate::model::seating::Seating;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallType {
    #[serde(rename = "REGULAR_P1")]
    RegularP1,
    #[serde(rename = "REGULAR_P2")]
    RegularP2,
    #[serde(rename = "LONER_P1")]
    LonerP1,
    #[serde(rename = "LONER_P2")]
    LonerP2,
}

impl CallType {
    pub const ALL: [CallType; 4] = [
        CallType::RegularP1,
        CallType::RegularP2,
        CallType::LonerP1,
        CallType::LonerP2,
    ];

    pub const fn new(phase_one: bool, loner: bool) -> Self {
        match (phase_one, loner) {
            (true, false) => CallType::RegularP1,
            (false, false) => CallType::RegularP2,
            (true, true) => CallType::LonerP1,
            (false, true) => CallType::LonerP2,
        }
    }

    pub const fn is_loner(self) -> bool {
        matches!(self, CallType::LonerP1 | CallType::LonerP2)
    }

    /// Phase 1 orders up the flipped card; phase 2 names a suit.
    pub const fn is_phase_one(self) -> bool {
        matches!(self, CallType::RegularP1 | CallType::LonerP1)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CallType::RegularP1 => "REGULAR_P1",
            CallType::RegularP2 => "REGULAR_P2",
            CallType::LonerP1 => "LONER_P1",
            CallType::LonerP2 => "LONER_P2",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid call type name: '{0}' (expected REGULAR_P1, REGULAR_P2, LONER_P1 or LONER_P2)")]
pub struct ParseCallTypeError(pub String);

impl FromStr for CallType {
    type Err = ParseCallTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CallType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| ParseCallTypeError(value.to_string()))
    }
}

/// A completed call: trump for the whole round and the player holding the calling role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub suit: Suit,
    pub call_type: CallType,
    pub caller: PlayerId,
}

impl Call {
    pub const fn new(suit: Suit, call_type: CallType, caller: PlayerId) -> Self {
        Self {
            suit,
            call_type,
            caller,
        }
    }

    pub const fn is_loner(&self) -> bool {
        self.call_type.is_loner()
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player{} called {} ({})", self.caller, self.suit, self.call_type)
    }
}

/// A call with optional fields; unset fields are drawn again for every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTemplate {
    pub suit: Option<Suit>,
    pub call_type: CallType,
    pub caller: Option<PlayerId>,
}

impl CallTemplate {
    pub const fn fixed(call: Call) -> Self {
        Self {
            suit: Some(call.suit),
            call_type: call.call_type,
            caller: Some(call.caller),
        }
    }

    /// Fully random suit and caller with a regular phase-1 call.
    pub const fn random() -> Self {
        Self {
            suit: None,
            call_type: CallType::RegularP1,
            caller: None,
        }
    }

    /// Fills unset fields: the suit uniformly from all suits, the caller uniformly from
    /// the active seats.
    pub fn resolve<R: Rng + ?Sized>(&self, seating: &Seating, rng: &mut R) -> Call {
        let suit = self
            .suit
            .unwrap_or_else(|| Suit::ALL[rng.gen_range(0..Suit::ALL.len())]);
        let caller = self.caller.unwrap_or_else(|| seating.choose(rng));
        Call::new(suit, self.call_type, caller)
    }
}

impl Default for CallTemplate {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use super::{Call, CallTemplate, CallType};
    use crate::model::player::PlayerId;
    use crate::model::seating::Seating;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_exact_tokens() {
        for kind in CallType::ALL {
            assert_eq!(kind.as_str().parse::<CallType>(), Ok(kind));
        }
        let err = "regular_p1".parse::<CallType>().unwrap_err();
        assert!(err.to_string().contains("invalid call type name"));
    }

    #[test]
    fn loner_and_phase_flags() {
        assert!(CallType::LonerP2.is_loner());
        assert!(!CallType::LonerP2.is_phase_one());
        assert!(CallType::RegularP1.is_phase_one());
        assert_eq!(CallType::new(false, true), CallType::LonerP2);
    }

    #[test]
    fn fixed_template_resolves_to_itself() {
        let call = Call::new(Suit::Hearts, CallType::LonerP1, PlayerId::new(3).unwrap());
        let template = CallTemplate::fixed(call);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(template.resolve(&Seating::full(), &mut rng), call);
    }

    #[test]
    fn random_caller_stays_within_active_seats() {
        let seating = Seating::full().without(PlayerId::new(4).unwrap());
        let template = CallTemplate {
            suit: Some(Suit::Clubs),
            call_type: CallType::RegularP2,
            caller: None,
        };
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let call = template.resolve(&seating, &mut rng);
            assert_eq!(call.suit, Suit::Clubs);
            assert!(seating.contains(call.caller));
        }
    }

    #[test]
    fn serializes_call_type_as_token() {
        let json = serde_json::to_string(&CallType::LonerP1).unwrap();
        assert_eq!(json, "\"LONER_P1\"");
    }
}
