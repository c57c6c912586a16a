//! In-memory collaborators and a fixture for unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::attack::{AttackDeclaration, TargetRef, ToHitResult};
use crate::config::RulesConfig;
use crate::env::{
    BoardState, BuildingInfo, CombatEnv, EntityRegistry, GuidanceTag, OracleError, ScriptedRolls,
};
use crate::resolve::{ResolutionContext, ResolutionOutcome, resolve};
use crate::strategy::{self, Strategy};
use crate::types::{
    AttackId, BinId, BuildingId, Coords, EntityId, EntityKind, Location, PhaseInfo, PhaseKind,
    WeaponId,
};
use crate::weapon::{
    AmmoBin, AmsMount, FireMode, MountedWeapon, MunitionType, WeaponFamily, WeaponProfile,
    WeaponStatus,
};

// ============================================================================
// Board
// ============================================================================

#[derive(Debug)]
pub struct TestBoard {
    pub width: i32,
    pub height: i32,
    /// Hexes per map sheet column band; `None` is a single sheet.
    pub sheet_width: Option<i32>,
    pub buildings: HashMap<Coords, BuildingInfo>,
    pub ignition: HashMap<Coords, i32>,
    pub burning: HashSet<Coords>,
    /// Damage needed to clear the hex.
    pub clearable: HashMap<Coords, u32>,
    pub cleared: HashSet<Coords>,
    pub illuminated: HashSet<Coords>,
    pub emi: bool,
    pub tags: Vec<GuidanceTag>,
    next_building: u32,
}

impl Default for TestBoard {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            sheet_width: None,
            buildings: HashMap::new(),
            ignition: HashMap::new(),
            burning: HashSet::new(),
            clearable: HashMap::new(),
            cleared: HashSet::new(),
            illuminated: HashSet::new(),
            emi: false,
            tags: Vec::new(),
            next_building: 1,
        }
    }
}

impl TestBoard {
    pub fn add_building(&mut self, hex: Coords, cf: u32) -> BuildingId {
        let id = BuildingId(self.next_building);
        self.next_building += 1;
        self.buildings.insert(hex, BuildingInfo { id, cf });
        id
    }

    pub fn building_cf(&self, hex: Coords) -> Option<u32> {
        self.buildings.get(&hex).map(|info| info.cf)
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
}

impl BoardState for TestBoard {
    fn in_bounds(&self, coords: Coords) -> bool {
        (0..self.width).contains(&coords.x) && (0..self.height).contains(&coords.y)
    }

    fn sheet_of(&self, coords: Coords) -> Option<u32> {
        match self.sheet_width {
            Some(width) => u32::try_from(coords.x / width).ok(),
            None => Some(0),
        }
    }

    fn building_at(&self, coords: Coords) -> Option<BuildingInfo> {
        self.buildings.get(&coords).copied().filter(|info| info.cf > 0)
    }

    fn damage_building(&mut self, building: BuildingId, amount: u32) -> Result<u32, OracleError> {
        let info = self
            .buildings
            .values_mut()
            .find(|info| info.id == building)
            .ok_or(OracleError::BuildingNotFound(building))?;
        info.cf = info.cf.saturating_sub(amount);
        Ok(info.cf)
    }

    fn ignition_target(&self, coords: Coords) -> Option<i32> {
        self.ignition.get(&coords).copied()
    }

    fn ignite(&mut self, coords: Coords) -> Result<(), OracleError> {
        self.burning.insert(coords);
        Ok(())
    }

    fn clear_terrain(&mut self, coords: Coords, damage: u32) -> Result<bool, OracleError> {
        match self.clearable.get(&coords) {
            Some(&needed) if damage >= needed => {
                self.clearable.remove(&coords);
                self.cleared.insert(coords);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn illuminate(&mut self, coords: Coords) -> Result<(), OracleError> {
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
        if let Some(found) = self.tags.iter_mut().find(|t| t.id == tag) {
            found.shots += 1;
        }
        Ok(())
    }

    fn reset_tag_shots(&mut self) {
        for tag in &mut self.tags {
            tag.shots = 0;
        }
    }
}

// ============================================================================
// Roster
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct TestUnit {
    pub team: u32,
    pub kind: EntityKind,
    pub position: Coords,
    pub armor: HashMap<(Location, bool), u32>,
    pub internal: HashMap<Location, u32>,
    pub destroyed_locations: HashSet<Location>,
    pub destroyed: bool,
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

impl TestUnit {
    fn mech(team: u32, position: Coords) -> Self {
        use Location::*;
        let mut unit = Self {
            team,
            kind: EntityKind::Mech,
            position,
            ..Self::default()
        };
        let layout = [
            (Head, 9, None, 3),
            (CenterTorso, 10, Some(5), 16),
            (LeftTorso, 10, Some(4), 12),
            (RightTorso, 10, Some(4), 12),
            (LeftArm, 10, None, 8),
            (RightArm, 10, None, 8),
            (LeftLeg, 12, None, 12),
            (RightLeg, 12, None, 12),
        ];
        for (location, front, rear, internal) in layout {
            unit.armor.insert((location, false), front);
            if let Some(rear) = rear {
                unit.armor.insert((location, true), rear);
            }
            unit.internal.insert(location, internal);
        }
        unit
    }

    fn vehicle(team: u32, position: Coords) -> Self {
        use Location::*;
        let mut unit = Self {
            team,
            kind: EntityKind::Vehicle,
            position,
            ..Self::default()
        };
        let layout = [(Front, 10), (LeftSide, 8), (RightSide, 8), (Rear, 6), (Turret, 8)];
        for (location, armor) in layout {
            unit.armor.insert((location, false), armor);
            unit.internal.insert(location, 4);
        }
        unit
    }

    fn infantry(team: u32, position: Coords) -> Self {
        let mut unit = Self {
            team,
            kind: EntityKind::Infantry,
            position,
            ..Self::default()
        };
        unit.armor.insert((Location::Troopers, false), 0);
        unit.internal.insert(Location::Troopers, 20);
        unit
    }

    fn armor_key(location: Location, rear: bool) -> (Location, bool) {
        (location, rear && location.has_rear_armor())
    }
}

#[derive(Debug, Default)]
pub struct TestRoster {
    pub units: BTreeMap<EntityId, TestUnit>,
}

impl TestRoster {
    pub fn unit(&self, id: EntityId) -> &TestUnit {
        &self.units[&id]
    }

    pub fn unit_mut(&mut self, id: EntityId) -> &mut TestUnit {
        self.units.get_mut(&id).expect("unit exists")
    }

    pub fn armor_of(&self, id: EntityId, location: Location, rear: bool) -> u32 {
        self.unit(id).armor[&TestUnit::armor_key(location, rear)]
    }

    pub fn internal_of(&self, id: EntityId, location: Location) -> u32 {
        self.unit(id).internal[&location]
    }

    pub fn location_destroyed(&self, id: EntityId, location: Location) -> bool {
        self.unit(id).destroyed_locations.contains(&location)
    }

    pub fn entity_destroyed(&self, id: EntityId) -> bool {
        self.unit(id).destroyed
    }

    pub fn critical_hits(&self, id: EntityId, location: Location) -> u32 {
        self.unit(id).criticals.get(&location).copied().unwrap_or(0)
    }

    pub fn heat_of(&self, id: EntityId) -> u32 {
        self.unit(id).heat
    }

    pub fn shots_in(&self, id: EntityId, bin: BinId) -> u32 {
        self.unit(id)
            .bins
            .iter()
            .find(|b| b.id == bin)
            .map_or(0, |b| b.shots)
    }

    pub fn weapon_status(&self, id: EntityId, weapon: WeaponId) -> WeaponStatus {
        self.unit(id)
            .weapons
            .iter()
            .find(|w| w.id == weapon)
            .map_or(WeaponStatus::Destroyed, |w| w.status)
    }

    fn get(&self, id: EntityId) -> Result<&TestUnit, OracleError> {
        self.units.get(&id).ok_or(OracleError::EntityNotFound(id))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut TestUnit, OracleError> {
        self.units.get_mut(&id).ok_or(OracleError::EntityNotFound(id))
    }
}

impl EntityRegistry for TestRoster {
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
            .filter(|(_, unit)| unit.position == coords)
            .map(|(id, _)| *id)
            .collect()
    }

    fn armor(&self, id: EntityId, location: Location, rear: bool) -> Result<u32, OracleError> {
        let unit = self.get(id)?;
        Ok(unit
            .armor
            .get(&TestUnit::armor_key(location, rear))
            .copied()
            .unwrap_or(0))
    }

    fn set_armor(
        &mut self,
        id: EntityId,
        location: Location,
        rear: bool,
        value: u32,
    ) -> Result<(), OracleError> {
        self.get_mut(id)?
            .armor
            .insert(TestUnit::armor_key(location, rear), value);
        Ok(())
    }

    fn internal(&self, id: EntityId, location: Location) -> Result<u32, OracleError> {
        Ok(self.get(id)?.internal.get(&location).copied().unwrap_or(0))
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
            .weapons
            .iter()
            .find(|w| w.id == weapon)
            .cloned()
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })
    }

    fn set_weapon_status(
        &mut self,
        id: EntityId,
        weapon: WeaponId,
        status: WeaponStatus,
    ) -> Result<(), OracleError> {
        let mount = self
            .get_mut(id)?
            .weapons
            .iter_mut()
            .find(|w| w.id == weapon)
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })?;
        mount.status = status;
        Ok(())
    }

    fn ammo_bins(&self, id: EntityId) -> Result<Vec<AmmoBin>, OracleError> {
        Ok(self.get(id)?.bins.clone())
    }

    fn load_bin(&mut self, id: EntityId, weapon: WeaponId, bin: BinId) -> Result<(), OracleError> {
        let mount = self
            .get_mut(id)?
            .weapons
            .iter_mut()
            .find(|w| w.id == weapon)
            .ok_or(OracleError::WeaponNotFound { entity: id, weapon })?;
        mount.loaded_bin = Some(bin);
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
        self.units.get(&id).map(|u| u.ams.clone()).unwrap_or_default()
    }

    fn mark_ams_engaged(&mut self, id: EntityId, weapon: WeaponId) -> Result<(), OracleError> {
        if let Some(mount) = self.get_mut(id)?.ams.iter_mut().find(|m| m.weapon == weapon) {
            mount.engaged = true;
        }
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

// ============================================================================
// Fixture
// ============================================================================

/// A board, a roster with one attacker (team 1 at the origin), scripted dice
/// and default rules.
pub struct Fixture {
    pub board: TestBoard,
    pub roster: TestRoster,
    pub dice: ScriptedRolls,
    pub rules: RulesConfig,
    pub phase: PhaseInfo,
    pub attacker: EntityId,
    next_entity: u32,
    next_attack: u64,
}

impl Fixture {
    pub fn new() -> Self {
        let mut fx = Self {
            board: TestBoard::default(),
            roster: TestRoster::default(),
            dice: ScriptedRolls::default(),
            rules: RulesConfig::default(),
            phase: PhaseInfo::new(1, PhaseKind::Firing),
            attacker: EntityId(0),
            next_entity: 1,
            next_attack: 1,
        };
        fx.attacker = fx.mech(1, Coords::new(0, 0));
        fx
    }

    fn spawn(&mut self, unit: TestUnit) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.roster.units.insert(id, unit);
        id
    }

    pub fn mech(&mut self, team: u32, position: Coords) -> EntityId {
        self.spawn(TestUnit::mech(team, position))
    }

    pub fn vehicle(&mut self, team: u32, position: Coords) -> EntityId {
        self.spawn(TestUnit::vehicle(team, position))
    }

    pub fn infantry(&mut self, team: u32, position: Coords) -> EntityId {
        self.spawn(TestUnit::infantry(team, position))
    }

    /// Mount `profile` on the attacker's right arm.
    pub fn arm(&mut self, profile: WeaponProfile) -> WeaponId {
        let unit = self.roster.unit_mut(self.attacker);
        let id = WeaponId(unit.weapons.len() as u16);
        unit.weapons
            .push(MountedWeapon::new(id, profile, Location::RightArm));
        id
    }

    /// Add a bin for `weapon` on the attacker, loading it if the weapon has
    /// nothing loaded yet.
    pub fn load(&mut self, weapon: WeaponId, munitions: MunitionType, shots: u32) -> BinId {
        let unit = self.roster.unit_mut(self.attacker);
        let id = BinId(unit.bins.len() as u16);
        let mount = unit
            .weapons
            .iter_mut()
            .find(|w| w.id == weapon)
            .expect("weapon mounted");
        let feeds = mount.profile.name.clone();
        if mount.loaded_bin.is_none() {
            mount.loaded_bin = Some(id);
        }
        unit.bins.push(AmmoBin {
            id,
            feeds,
            munitions,
            shots,
        });
        id
    }

    pub fn declare(&mut self, weapon: WeaponId, target: TargetRef) -> AttackDeclaration {
        let id = AttackId(self.next_attack);
        self.next_attack += 1;
        AttackDeclaration::new(id, self.attacker, weapon, target)
    }

    pub fn run<R>(&mut self, f: impl FnOnce(&mut CombatEnv<'_>) -> R) -> R {
        let mut env = CombatEnv::new(
            &mut self.board,
            &mut self.roster,
            &mut self.dice,
            &self.rules,
            self.phase,
        );
        f(&mut env)
    }

    pub fn resolve(
        &mut self,
        declaration: &AttackDeclaration,
        to_hit: &ToHitResult,
    ) -> ResolutionOutcome {
        self.run(|env| resolve(declaration, to_hit, env))
    }

    /// Scratch context for exercising a single step.
    pub fn context(&self) -> ResolutionContext {
        let profile = WeaponProfile::new("Medium Laser", WeaponFamily::Energy, 5);
        self.context_for(profile, self.attacker, MunitionType::STANDARD)
    }

    pub fn context_for(
        &self,
        profile: WeaponProfile,
        target: EntityId,
        munitions: MunitionType,
    ) -> ResolutionContext {
        let weapon = MountedWeapon::new(WeaponId(0), profile, Location::RightArm);
        let strategy = strategy::select(
            weapon.id,
            weapon.profile.family,
            Some(munitions),
            FireMode::Single,
        )
        .unwrap_or(Strategy::Standard);
        let decl = AttackDeclaration::new(
            AttackId(0),
            self.attacker,
            weapon.id,
            TargetRef::Entity(target),
        )
        .with_munition(munitions);
        let mut ctx = ResolutionContext::new(decl, ToHitResult::new(7), strategy, weapon);
        ctx.munition = munitions;
        ctx
    }
}
