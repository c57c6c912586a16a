//! Builds the in-memory battlefield a scenario describes.
//!
//! Scenario unit ids become [`EntityId`]s unchanged; weapon and bin ids are
//! the positions of the mounts and bins in the unit's lists.
use combat_content::{ContentFactory, Scenario, UnitSpec, WeaponCatalog};
use combat_core::{AmmoBin, AmsMount, BinId, EntityId, MountedWeapon, RulesConfig, WeaponId};
use tracing::debug;

use crate::api::{Result, RuntimeError};
use crate::oracle::{Board, Roster, Unit};

/// Board and units mutated by resolution.
#[derive(Clone, Debug)]
pub struct Battlefield {
    pub board: Board,
    pub roster: Roster,
}

impl Battlefield {
    pub fn new(board: Board, roster: Roster) -> Self {
        Self { board, roster }
    }

    pub fn from_scenario(scenario: &Scenario, catalog: &WeaponCatalog) -> Result<Self> {
        let spec = &scenario.board;
        let mut board = Board::new(spec.width, spec.height)
            .with_sheet_width(spec.sheet_width)
            .with_emi(spec.emi);
        for building in &spec.buildings {
            board.add_building(building.hexes.clone(), building.cf);
        }
        for &(hex, target) in &spec.ignition {
            board.set_ignition(hex, target);
        }
        for &(hex, damage) in &spec.clearable {
            board.set_clearable(hex, damage);
        }
        for tag in &spec.tags {
            board.add_tag(tag.id, EntityId(tag.source), tag.coords, tag.priority);
        }

        let mut roster = Roster::new();
        for unit in &scenario.units {
            roster.insert(EntityId(unit.id), build_unit(unit, catalog)?);
        }
        debug!(
            target: "runtime::scenario",
            scenario = %scenario.name,
            units = roster.len(),
            buildings = board.buildings().len(),
            "battlefield built"
        );
        Ok(Self { board, roster })
    }
}

/// Everything needed to run a scenario script.
#[derive(Debug)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub battlefield: Battlefield,
    pub rules: RulesConfig,
}

impl LoadedScenario {
    pub fn load(factory: &ContentFactory, name: &str) -> Result<Self> {
        let catalog = factory.load_weapons()?;
        let rules = factory.load_rules()?;
        let scenario = factory.load_scenario(name, &catalog)?;
        let battlefield = Battlefield::from_scenario(&scenario, &catalog)?;
        Ok(Self {
            scenario,
            battlefield,
            rules,
        })
    }
}

fn bin_id(unit: &UnitSpec, index: u16) -> Result<BinId> {
    if usize::from(index) < unit.bins.len() {
        Ok(BinId(index))
    } else {
        Err(RuntimeError::UnknownBin {
            unit: unit.id,
            bin: index,
        })
    }
}

fn build_unit(spec: &UnitSpec, catalog: &WeaponCatalog) -> Result<Unit> {
    let mut unit = Unit::new(spec.name.clone(), spec.team, spec.kind, spec.position);
    for &(location, value) in &spec.armor {
        unit.set_armor(location, false, value);
    }
    for &(location, value) in &spec.rear_armor {
        unit.set_armor(location, true, value);
    }
    unit.internal.extend(spec.internal.iter().copied());

    for (index, mount) in spec.weapons.iter().enumerate() {
        let profile = catalog
            .get(&mount.weapon)
            .ok_or_else(|| RuntimeError::UnknownWeapon {
                unit: spec.id,
                weapon: mount.weapon.clone(),
            })?;
        let id = WeaponId(index as u16);
        let mut weapon = MountedWeapon::new(id, profile.clone(), mount.location);
        weapon.artemis_linked = mount.artemis;
        weapon.loaded_bin = mount
            .loaded_bin
            .map(|bin| bin_id(spec, bin))
            .transpose()?;
        unit.weapons.push(weapon);
    }

    unit.bins = spec
        .bins
        .iter()
        .enumerate()
        .map(|(index, bin)| AmmoBin {
            id: BinId(index as u16),
            feeds: bin.feeds.clone(),
            munitions: bin.munitions,
            shots: bin.shots,
        })
        .collect();

    for ams in &spec.ams {
        let bin = ams.bin.map(|bin| bin_id(spec, bin)).transpose()?;
        unit.ams.push(AmsMount {
            weapon: WeaponId(ams.weapon),
            bin,
            heat: ams.heat,
            engaged: false,
        });
    }

    unit.ecm_affected = spec.ecm;
    unit.stealth = spec.stealth;
    unit.narc = spec.narc;
    unit.airborne = spec.airborne;
    Ok(unit)
}
