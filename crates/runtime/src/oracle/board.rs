//! Board state: bounds, buildings, terrain and guidance tags.

use std::collections::{BTreeSet, HashMap};

use combat_core::{BoardState, BuildingId, BuildingInfo, Coords, EntityId, GuidanceTag, OracleError};

/// A building spanning one or more hexes with a single construction factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Building {
    pub id: BuildingId,
    pub hexes: Vec<Coords>,
    pub cf: u32,
}

/// Mutable map state for one battle.
#[derive(Clone, Debug, Default)]
pub struct Board {
    width: i32,
    height: i32,
    sheet_width: Option<i32>,
    buildings: Vec<Building>,
    ignition: HashMap<Coords, i32>,
    clearable: HashMap<Coords, u32>,
    burning: BTreeSet<Coords>,
    cleared: BTreeSet<Coords>,
    illuminated: BTreeSet<Coords>,
    emi: bool,
    tags: Vec<GuidanceTag>,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_sheet_width(mut self, columns: Option<i32>) -> Self {
        self.sheet_width = columns.filter(|&c| c > 0);
        self
    }

    pub fn with_emi(mut self, emi: bool) -> Self {
        self.emi = emi;
        self
    }

    pub fn add_building(&mut self, hexes: Vec<Coords>, cf: u32) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32 + 1);
        self.buildings.push(Building { id, hexes, cf });
        id
    }

    pub fn set_ignition(&mut self, hex: Coords, target: i32) {
        self.ignition.insert(hex, target);
    }

    pub fn set_clearable(&mut self, hex: Coords, damage: u32) {
        self.clearable.insert(hex, damage);
    }

    pub fn add_tag(&mut self, id: u32, source: EntityId, coords: Coords, priority: u32) {
        self.tags.push(GuidanceTag {
            id,
            source,
            coords,
            priority,
            shots: 0,
            valid: true,
        });
    }

    // ===== queries =====

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn is_burning(&self, hex: Coords) -> bool {
        self.burning.contains(&hex)
    }

    pub fn is_cleared(&self, hex: Coords) -> bool {
        self.cleared.contains(&hex)
    }

    pub fn is_illuminated(&self, hex: Coords) -> bool {
        self.illuminated.contains(&hex)
    }

    pub fn tags(&self) -> &[GuidanceTag] {
        &self.tags
    }

    fn building_mut(&mut self, id: BuildingId) -> Result<&mut Building, OracleError> {
        self.buildings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(OracleError::BuildingNotFound(id))
    }

    fn check_bounds(&self, coords: Coords) -> Result<(), OracleError> {
        if self.in_bounds(coords) {
            Ok(())
        } else {
            Err(OracleError::OutOfBounds(coords))
        }
    }
}

impl BoardState for Board {
    fn in_bounds(&self, coords: Coords) -> bool {
        (0..self.width).contains(&coords.x) && (0..self.height).contains(&coords.y)
    }

    fn sheet_of(&self, coords: Coords) -> Option<u32> {
        if !self.in_bounds(coords) {
            return None;
        }
        match self.sheet_width {
            Some(columns) => u32::try_from(coords.x / columns).ok(),
            None => Some(0),
        }
    }

    fn building_at(&self, coords: Coords) -> Option<BuildingInfo> {
        self.buildings
            .iter()
            .find(|b| b.cf > 0 && b.hexes.contains(&coords))
            .map(|b| BuildingInfo { id: b.id, cf: b.cf })
    }

    fn damage_building(&mut self, building: BuildingId, amount: u32) -> Result<u32, OracleError> {
        let building = self.building_mut(building)?;
        building.cf = building.cf.saturating_sub(amount);
        Ok(building.cf)
    }

    fn ignition_target(&self, coords: Coords) -> Option<i32> {
        if self.burning.contains(&coords) {
            return None;
        }
        self.ignition.get(&coords).copied()
    }

    fn ignite(&mut self, coords: Coords) -> Result<(), OracleError> {
        self.check_bounds(coords)?;
        self.burning.insert(coords);
        Ok(())
    }

    fn clear_terrain(&mut self, coords: Coords, damage: u32) -> Result<bool, OracleError> {
        self.check_bounds(coords)?;
        let Some(needed) = self.clearable.get_mut(&coords) else {
            return Ok(false);
        };
        *needed = needed.saturating_sub(damage);
        if *needed > 0 {
            return Ok(false);
        }
        self.clearable.remove(&coords);
        self.ignition.remove(&coords);
        self.cleared.insert(coords);
        Ok(true)
    }

    fn illuminate(&mut self, coords: Coords) -> Result<(), OracleError> {
        self.check_bounds(coords)?;
        self.illuminated.insert(coords);
        Ok(())
    }

    fn emi_active(&self) -> bool {
        self.emi
    }

    fn guidance_tags(&self) -> Vec<GuidanceTag> {
        self.tags.clone()
    }

    fn record_tag_shot(&mut self, tag: u32) -> Result<(), OracleError> {
        let found = self
            .tags
            .iter_mut()
            .find(|t| t.id == tag)
            .ok_or_else(|| OracleError::Unavailable(format!("guidance tag {tag} not found")))?;
        found.shots += 1;
        Ok(())
    }

    fn reset_tag_shots(&mut self) {
        for tag in &mut self.tags {
            tag.shots = 0;
        }
    }
}
