//! Board and terrain collaborator.

use super::OracleError;
use crate::types::{BuildingId, Coords, EntityId};

/// Building occupying a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingInfo {
    pub id: BuildingId,
    /// Current construction factor.
    pub cf: u32,
}

/// A TAG designation that homing artillery can lock onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuidanceTag {
    pub id: u32,
    /// Unit that painted the tag.
    pub source: EntityId,
    pub coords: Coords,
    /// Higher priority tags accept proportionally more rounds.
    pub priority: u32,
    /// Homing rounds already guided onto this tag.
    pub shots: u32,
    pub valid: bool,
}

/// Read/write view of the map used during resolution.
///
/// Implementations own terrain and building state; resolution only mutates it
/// through these methods.
pub trait BoardState {
    fn in_bounds(&self, coords: Coords) -> bool;

    /// Map sheet the hex belongs to, if the board is made of several sheets.
    fn sheet_of(&self, coords: Coords) -> Option<u32>;

    fn building_at(&self, coords: Coords) -> Option<BuildingInfo>;

    /// Apply construction-factor damage and return the remaining CF.
    fn damage_building(&mut self, building: BuildingId, amount: u32) -> Result<u32, OracleError>;

    /// Target number to set the hex alight, or `None` if nothing there burns.
    fn ignition_target(&self, coords: Coords) -> Option<i32>;

    fn ignite(&mut self, coords: Coords) -> Result<(), OracleError>;

    /// Apply terrain-clearing damage. Returns `true` when the hex is cleared.
    fn clear_terrain(&mut self, coords: Coords, damage: u32) -> Result<bool, OracleError>;

    fn illuminate(&mut self, coords: Coords) -> Result<(), OracleError>;

    /// Planetary electromagnetic interference is in effect.
    fn emi_active(&self) -> bool;

    /// Active guidance tags in scan order.
    fn guidance_tags(&self) -> Vec<GuidanceTag>;

    fn record_tag_shot(&mut self, tag: u32) -> Result<(), OracleError>;

    fn reset_tag_shots(&mut self);
}
