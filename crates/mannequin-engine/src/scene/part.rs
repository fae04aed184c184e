use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six fixed body parts of the avatar.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] = [
        BodyPart::Head,
        BodyPart::Torso,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
    ];

    /// External key used by avatar descriptions (`"leftArm"`, …).
    pub const fn key(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Torso => "torso",
            BodyPart::LeftArm => "leftArm",
            BodyPart::RightArm => "rightArm",
            BodyPart::LeftLeg => "leftLeg",
            BodyPart::RightLeg => "rightLeg",
        }
    }

    /// Decal slot for this part, if it accepts one.
    pub const fn decal_slot(self) -> Option<DecalSlot> {
        match self {
            BodyPart::Head => Some(DecalSlot::Head),
            BodyPart::Torso => Some(DecalSlot::Torso),
            _ => None,
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A key that does not name one of the six body parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown body part `{0}`")]
pub struct UnknownPart(pub String);

impl FromStr for BodyPart {
    type Err = UnknownPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownPart(s.to_string()))
    }
}

/// Parts that can carry a face-style decal plane.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecalSlot {
    Head,
    Torso,
}

impl DecalSlot {
    pub const fn part(self) -> BodyPart {
        match self {
            DecalSlot::Head => BodyPart::Head,
            DecalSlot::Torso => BodyPart::Torso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for part in BodyPart::ALL {
            assert_eq!(part.key().parse::<BodyPart>(), Ok(part));
        }
    }

    #[test]
    fn unknown_and_miscased_keys_are_rejected() {
        assert!("leftarm".parse::<BodyPart>().is_err());
        assert!("tail".parse::<BodyPart>().is_err());
        assert!("headColor".parse::<BodyPart>().is_err());
    }

    #[test]
    fn only_head_and_torso_take_decals() {
        let with_slots: Vec<_> = BodyPart::ALL.into_iter().filter_map(BodyPart::decal_slot).collect();
        assert_eq!(with_slots, vec![DecalSlot::Head, DecalSlot::Torso]);
        assert_eq!(DecalSlot::Torso.part(), BodyPart::Torso);
    }
}
