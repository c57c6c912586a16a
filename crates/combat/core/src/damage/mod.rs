//! Damage application.
//!
//! Protocol steps turn landed sub-hits into [`DamageRequest`]s and hand them
//! to [`apply_requests`] together with an [`AbsorptionPass`]. The coordinator
//! lets the building in the hex absorb first, then walks armor, internal
//! structure and inward transfer on the struck unit, rolling criticals as it
//! goes.
mod absorption;
mod coordinator;
mod critical;
pub mod location;

pub use absorption::{Absorption, AbsorptionPass};
pub use coordinator::{apply_requests, armor_piercing_modifier};
pub use critical::{CriticalEffect, CriticalTrigger, critical_effect};

use crate::types::{BuildingId, Coords, EntityId, HitData, HitSide};

/// Where a damage request is aimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageTarget {
    Entity(EntityId),
    /// Whatever stands in the hex after the building has absorbed its share.
    Hex(Coords),
}

/// How the struck location is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationSpec {
    /// Roll on the hit location table for the given side.
    Roll(HitSide),
    /// Swarm attack table.
    Swarm,
    Fixed(HitData),
}

/// When a request rolls for critical effects beyond structure damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriticalRule {
    /// Only when internal structure is damaged or the location roll says so.
    #[default]
    Standard,
    /// Armor-piercing round: every hit rolls with this modifier.
    ArmorPiercing(i32),
    /// Every hit rolls unmodified (leg attacks).
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRequest {
    pub target: DamageTarget,
    pub amount: u32,
    pub location: LocationSpec,
    pub critical: CriticalRule,
}

impl DamageRequest {
    pub fn entity(id: EntityId, amount: u32, location: LocationSpec) -> Self {
        Self {
            target: DamageTarget::Entity(id),
            amount,
            location,
            critical: CriticalRule::Standard,
        }
    }

    pub fn hex(coords: Coords, amount: u32) -> Self {
        Self {
            target: DamageTarget::Hex(coords),
            amount,
            location: LocationSpec::Roll(HitSide::Front),
            critical: CriticalRule::Standard,
        }
    }

    pub fn with_critical(mut self, critical: CriticalRule) -> Self {
        self.critical = critical;
        self
    }
}

/// Realized result of one damage request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    /// Unit that took the damage, or the hex when nobody was there.
    pub target: DamageTarget,
    pub location: Option<HitData>,
    pub requested: u32,
    pub absorbed: u32,
    pub absorbed_by: Option<BuildingId>,
    pub applied: u32,
    pub criticals: Vec<CriticalTrigger>,
}

impl DamageEvent {
    /// Damage neither absorbed nor applied.
    pub fn discarded(&self) -> u32 {
        self.requested
            .saturating_sub(self.absorbed)
            .saturating_sub(self.applied)
    }
}
