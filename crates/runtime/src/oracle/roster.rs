//! Unit roster: armor, structure, weapons, ammunition and electronics.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use combat_core::{
    AmmoBin, AmsMount, BinId, Coords, EntityId, EntityKind, EntityRegistry, Location,
    MountedWeapon, OracleError, WeaponId, WeaponStatus,
};

/// One unit on the board.
#[derive(Clone, Debug, Default)]
pub struct Unit {
    pub name: String,
    pub team: u32,
    pub kind: EntityKind,
    pub position: Coords,
    /// Keyed by (location, rear).
    pub armor: HashMap<(Location, bool), u32>,
    pub internal: HashMap<Location, u32>,
    pub destroyed_locations: BTreeSet<Location>,
    pub destroyed: bool,
    /// Critical slots hit per location.
    pub criticals: HashMap<Location, u32>,
    pub weapons: Vec<MountedWeapon>,
    pub bins: Vec<AmmoBin>,
    pub heat: u32,
    pub ams: Vec<AmsMount>,
    pub ecm_affected: bool,
    pub stealth: bool,
    pub narc: bool,
    pub airborne: bool,
}

impl Unit {
    pub fn new(name: impl Into<String>, team: u32, kind: EntityKind, position: Coords) -> Self {
        Self {
            name: name.into(),
            team,
            kind,
            position,
            ..Self::default()
        }
    }

    pub fn set_armor(&mut self, location: Location, rear: bool, value: u32) {
        self.armor.insert(armor_key(location, rear), value);
    }

    pub fn armor(&self, location: Location, rear: bool) -> u32 {
        self.armor
            .get(&armor_key(location, rear))
            .copied()
            .unwrap_or(0)
    }

    pub fn internal(&self, location: Location) -> u32 {
        self.internal.get(&location).copied().unwrap_or(0)
    }

    pub fn bin(&self, id: BinId) -> Option<&AmmoBin> {
        self.bins.iter().find(|b| b.id == id)
    }

    pub fn mount(&self, id: WeaponId) -> Option<&MountedWeapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    fn mount_mut(
        &mut self,
        id: EntityId,
        weapon: WeaponId,
    ) -> Result<&mut MountedWeapon, OracleError> {
        self.weapons
            .iter_mut()
            .find(|w| w.id == weapon)
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })
    }
}

/// Rear armor exists only on torso locations.
fn armor_key(location: Location, rear: bool) -> (Location, bool) {
    (location, rear && location.has_rear_armor())
}

/// Every unit in the battle, in id order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    units: BTreeMap<EntityId, Unit>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, unit: Unit) -> Option<Unit> {
        self.units.insert(id, unit)
    }

    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = (EntityId, &Unit)> {
        self.units.iter().map(|(id, unit)| (*id, unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Anti-missile systems may engage again.
    pub fn reset_ams(&mut self) {
        for unit in self.units.values_mut() {
            for mount in &mut unit.ams {
                mount.engaged = false;
            }
        }
    }

    /// Units still standing.
    pub fn survivors(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.units
            .iter()
            .filter(|(_, unit)| !unit.destroyed)
            .map(|(id, _)| *id)
    }

    fn get(&self, id: EntityId) -> Result<&Unit, OracleError> {
        self.units.get(&id).ok_or(OracleError::EntityNotFound(id))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Unit, OracleError> {
        self.units.get_mut(&id).ok_or(OracleError::EntityNotFound(id))
    }
}

impl EntityRegistry for Roster {
    fn exists(&self, id: EntityId) -> bool {
        self.units.contains_key(&id)
    }

    fn is_destroyed(&self, id: EntityId) -> bool {
        self.units.get(&id).is_some_and(|u| u.destroyed)
    }

    fn kind(&self, id: EntityId) -> Result<EntityKind, OracleError> {
        Ok(self.get(id)?.kind)
    }

    fn position(&self, id: EntityId) -> Result<Coords, OracleError> {
        Ok(self.get(id)?.position)
    }

    fn is_enemy(&self, a: EntityId, b: EntityId) -> bool {
        match (self.units.get(&a), self.units.get(&b)) {
            (Some(a), Some(b)) => a.team != b.team,
            _ => false,
        }
    }

    fn entities_at(&self, coords: Coords) -> Vec<EntityId> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.position == coords && !unit.destroyed)
            .map(|(id, _)| *id)
            .collect()
    }

    fn armor(&self, id: EntityId, location: Location, rear: bool) -> Result<u32, OracleError> {
        Ok(self.get(id)?.armor(location, rear))
    }

    fn set_armor(
        &mut self,
        id: EntityId,
        location: Location,
        rear: bool,
        value: u32,
    ) -> Result<(), OracleError> {
        self.get_mut(id)?.set_armor(location, rear, value);
        Ok(())
    }

    fn internal(&self, id: EntityId, location: Location) -> Result<u32, OracleError> {
        Ok(self.get(id)?.internal(location))
    }

    fn set_internal(
        &mut self,
        id: EntityId,
        location: Location,
        value: u32,
    ) -> Result<(), OracleError> {
        self.get_mut(id)?.internal.insert(location, value);
        Ok(())
    }

    fn is_location_destroyed(&self, id: EntityId, location: Location) -> bool {
        self.units
            .get(&id)
            .is_some_and(|u| u.destroyed_locations.contains(&location))
    }

    fn destroy_location(&mut self, id: EntityId, location: Location) -> Result<(), OracleError> {
        let unit = self.get_mut(id)?;
        unit.destroyed_locations.insert(location);
        unit.internal.insert(location, 0);
        unit.set_armor(location, false, 0);
        unit.set_armor(location, true, 0);
        for mount in unit.weapons.iter_mut().filter(|w| w.location == location) {
            mount.status = WeaponStatus::Destroyed;
        }
        Ok(())
    }

    fn destroy_entity(&mut self, id: EntityId) -> Result<(), OracleError> {
        self.get_mut(id)?.destroyed = true;
        Ok(())
    }

    fn apply_critical(&mut self, id: EntityId, location: Location) -> Result<(), OracleError> {
        *self.get_mut(id)?.criticals.entry(location).or_default() += 1;
        Ok(())
    }

    fn weapon(&self, id: EntityId, weapon: WeaponId) -> Result<MountedWeapon, OracleError> {
        self.get(id)?
            .mount(weapon)
            .cloned()
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })
    }

    fn set_weapon_status(
        &mut self,
        id: EntityId,
        weapon: WeaponId,
        status: WeaponStatus,
    ) -> Result<(), OracleError> {
        self.get_mut(id)?.mount_mut(id, weapon)?.status = status;
        Ok(())
    }

    fn ammo_bins(&self, id: EntityId) -> Result<Vec<AmmoBin>, OracleError> {
        Ok(self.get(id)?.bins.clone())
    }

    fn load_bin(&mut self, id: EntityId, weapon: WeaponId, bin: BinId) -> Result<(), OracleError> {
        let unit = self.get_mut(id)?;
        if unit.bin(bin).is_none() {
            return Err(OracleError::BinNotFound { entity: id, bin });
        }
        unit.mount_mut(id, weapon)?.loaded_bin = Some(bin);
        Ok(())
    }

    fn consume_ammo(&mut self, id: EntityId, bin: BinId, rounds: u32) -> Result<(), OracleError> {
        let found = self
            .get_mut(id)?
            .bins
            .iter_mut()
            .find(|b| b.id == bin)
            .ok_or(OracleError::BinNotFound { entity: id, bin })?;
        found.shots = found.shots.saturating_sub(rounds);
        Ok(())
    }

    fn add_heat(&mut self, id: EntityId, heat: u32) -> Result<(), OracleError> {
        self.get_mut(id)?.heat += heat;
        Ok(())
    }

    fn ams_mounts(&self, id: EntityId) -> Vec<AmsMount> {
        self.units
            .get(&id)
            .map(|unit| {
                unit.ams
                    .iter()
                    .filter(|ams| unit.mount(ams.weapon).is_some_and(MountedWeapon::is_usable))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn mark_ams_engaged(&mut self, id: EntityId, weapon: WeaponId) -> Result<(), OracleError> {
        let unit = self.get_mut(id)?;
        let mount = unit
            .ams
            .iter_mut()
            .find(|m| m.weapon == weapon)
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })?;
        mount.engaged = true;
        Ok(())
    }

    fn is_ecm_affected(&self, id: EntityId) -> bool {
        self.units.get(&id).is_some_and(|u| u.ecm_affected)
    }

    fn stealth_active(&self, id: EntityId) -> bool {
        self.units.get(&id).is_some_and(|u| u.stealth)
    }

    fn narc_tagged(&self, id: EntityId) -> bool {
        self.units.get(&id).is_some_and(|u| u.narc)
    }

    fn is_airborne(&self, id: EntityId) -> bool {
        self.units.get(&id).is_some_and(|u| u.airborne)
    }
}
