//! Resolution strategies.
//!
//! A [`Strategy`] is chosen once per attack by [`select`] and consulted by
//! every protocol step through `match`. Family-specific logic lives in the
//! submodules as free functions over the resolution context.
pub mod area;
pub mod artillery;
pub mod missile;
pub mod munition;
pub mod rapid_fire;
mod selector;
pub mod standard;
pub mod streak;

pub use area::AreaProfile;
pub use artillery::{ArtilleryFlight, ArtilleryKind, FlightStatus};
pub use munition::MunitionVariant;
pub use rapid_fire::{JamCheck, JamResult, JamThresholds, RapidFireKind, jam_thresholds};
pub use selector::{SelectionError, select};

use crate::weapon::FireMode;

/// Family-specific resolution behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// The base protocol with no overrides.
    Standard,
    /// Autocannon munition variant.
    Munition(MunitionVariant),
    /// Missile rack that can be engaged by anti-missile systems.
    Missile,
    /// Lock-on rack: all or nothing, no ammo spent without a lock.
    Streak,
    RapidFire(RapidFireKind),
    Artillery(ArtilleryKind),
    Area(AreaProfile),
}

impl Strategy {
    /// The to-hit roll happens before ammunition or heat is committed.
    pub const fn rolls_before_commit(&self) -> bool {
        matches!(self, Strategy::Streak)
    }

    pub const fn rapid_fire(&self) -> Option<RapidFireKind> {
        match self {
            Strategy::RapidFire(kind) => Some(*kind),
            _ => None,
        }
    }

    pub const fn artillery(&self) -> Option<ArtilleryKind> {
        match self {
            Strategy::Artillery(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Shots discharged for the declared mode. Only rapid-fire strategies
    /// fire more than once.
    pub fn shots(&self, mode: FireMode) -> u32 {
        match self {
            Strategy::RapidFire(_) => mode.shots(),
            _ => 1,
        }
    }

    pub const fn munition(&self) -> Option<MunitionVariant> {
        match self {
            Strategy::Munition(variant) => Some(*variant),
            _ => None,
        }
    }
}
