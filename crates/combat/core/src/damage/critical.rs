use crate::types::{EntityId, Location};

/// What a critical roll did to the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CriticalEffect {
    /// Number of critical slots hit.
    Slots(u8),
    LimbBlownOff,
    HeadDestroyed,
}

/// A critical roll that produced an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalTrigger {
    pub entity: EntityId,
    pub location: Location,
    pub roll: u8,
    pub modifier: i32,
    pub effect: CriticalEffect,
}

/// Critical chance on 2d6 after modifiers: 8-9 one slot, 10-11 two slots,
/// 12 or more three slots, or the limb/head is lost outright.
pub fn critical_effect(location: Location, roll: u8, modifier: i32) -> Option<CriticalEffect> {
    match i32::from(roll) + modifier {
        i32::MIN..=7 => None,
        8 | 9 => Some(CriticalEffect::Slots(1)),
        10 | 11 => Some(CriticalEffect::Slots(2)),
        _ if location.is_limb() => Some(CriticalEffect::LimbBlownOff),
        _ if location == Location::Head => Some(CriticalEffect::HeadDestroyed),
        _ => Some(CriticalEffect::Slots(3)),
    }
}
