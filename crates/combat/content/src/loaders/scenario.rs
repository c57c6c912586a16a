//! Scenario loader.
//!
//! A scenario places units and buildings on a board and lists the phases to
//! play, each with the attacks declared in it. Entity and attack ids are
//! assigned by the runtime; units refer to each other by their scenario id.

use std::collections::HashSet;
use std::path::Path;

use combat_core::{
    AttackDeclaration, AttackId, Coords, EntityId, EntityKind, FireMode, HexIntent, Location,
    MunitionType, PhaseInfo, PhaseKind, TargetRef, WeaponId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, WeaponCatalog, read_file};

/// Scenario structure for RON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Game seed; the runtime draws one when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    pub board: BoardSpec,
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub width: i32,
    pub height: i32,
    /// Columns per map sheet; one sheet when absent.
    #[serde(default)]
    pub sheet_width: Option<i32>,
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
    /// (hex, ignition target number)
    #[serde(default)]
    pub ignition: Vec<(Coords, i32)>,
    /// (hex, damage needed to clear it)
    #[serde(default)]
    pub clearable: Vec<(Coords, u32)>,
    #[serde(default)]
    pub emi: bool,
    #[serde(default)]
    pub tags: Vec<TagSpec>,
}

/// A building sharing one construction factor across its hexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub hexes: Vec<Coords>,
    pub cf: u32,
}

/// A guidance designation painted by `source` (a scenario unit id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub id: u32,
    pub source: u32,
    pub coords: Coords,
    #[serde(default = "one")]
    pub priority: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub name: String,
    pub team: u32,
    pub kind: EntityKind,
    pub position: Coords,
    pub armor: Vec<(Location, u32)>,
    #[serde(default)]
    pub rear_armor: Vec<(Location, u32)>,
    pub internal: Vec<(Location, u32)>,
    #[serde(default)]
    pub weapons: Vec<MountSpec>,
    #[serde(default)]
    pub bins: Vec<BinSpec>,
    #[serde(default)]
    pub ams: Vec<AmsSpec>,
    #[serde(default)]
    pub ecm: bool,
    #[serde(default)]
    pub stealth: bool,
    #[serde(default)]
    pub narc: bool,
    #[serde(default)]
    pub airborne: bool,
}

/// A catalog weapon mounted at a location. Weapon ids are mount indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    pub weapon: String,
    pub location: Location,
    #[serde(default)]
    pub artemis: bool,
    /// Bin index loaded at start.
    #[serde(default)]
    pub loaded_bin: Option<u16>,
}

/// Bin ids are indices into the unit's bin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSpec {
    /// Catalog name of the weapon this ammunition feeds.
    pub feeds: String,
    #[serde(default)]
    pub munitions: MunitionType,
    pub shots: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmsSpec {
    /// Mount index of the AMS weapon.
    pub weapon: u16,
    #[serde(default)]
    pub bin: Option<u16>,
    #[serde(default)]
    pub heat: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub turn: u32,
    pub kind: PhaseKind,
    #[serde(default)]
    pub attacks: Vec<AttackSpec>,
}

impl PhaseSpec {
    pub fn info(&self) -> PhaseInfo {
        PhaseInfo::new(self.turn, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSpec {
    Unit(u32),
    Hex {
        x: i32,
        y: i32,
        #[serde(default)]
        intent: HexIntent,
    },
}

impl TargetSpec {
    pub fn to_target(self) -> TargetRef {
        match self {
            TargetSpec::Unit(id) => TargetRef::Entity(EntityId(id)),
            TargetSpec::Hex { x, y, intent } => TargetRef::Hex {
                coords: Coords::new(x, y),
                intent,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub attacker: u32,
    /// Mount index on the attacker.
    pub weapon: u16,
    pub target: TargetSpec,
    #[serde(default)]
    pub munition: Option<MunitionType>,
    #[serde(default)]
    pub mode: FireMode,
    #[serde(default)]
    pub turns_to_impact: u8,
    /// Fixed to-hit number, bypassing the range resolver.
    #[serde(default)]
    pub to_hit: Option<i32>,
}

impl AttackSpec {
    pub fn declare(&self, id: AttackId) -> AttackDeclaration {
        let mut declaration = AttackDeclaration::new(
            id,
            EntityId(self.attacker),
            WeaponId(self.weapon),
            self.target.to_target(),
        )
        .with_mode(self.mode)
        .with_flight_time(self.turns_to_impact);
        if let Some(munition) = self.munition {
            declaration = declaration.with_munition(munition);
        }
        declaration
    }
}

impl Scenario {
    pub fn unit(&self, id: u32) -> Option<&UnitSpec> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Check cross references: unique unit ids, catalog weapon names, mount
    /// and bin indices, and attackers that exist.
    pub fn validate(&self, catalog: &WeaponCatalog) -> LoadResult<()> {
        if self.board.width <= 0 || self.board.height <= 0 {
            anyhow::bail!("Scenario {} has an empty board", self.name);
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if !seen.insert(unit.id) {
                anyhow::bail!("Duplicate unit id {} in scenario {}", unit.id, self.name);
            }
            validate_unit(unit, catalog)?;
        }

        for tag in &self.board.tags {
            if self.unit(tag.source).is_none() {
                anyhow::bail!("Tag {} is painted by unknown unit {}", tag.id, tag.source);
            }
        }

        for phase in &self.phases {
            for attack in &phase.attacks {
                let Some(unit) = self.unit(attack.attacker) else {
                    anyhow::bail!(
                        "Turn {} {}: unknown attacker {}",
                        phase.turn,
                        phase.kind,
                        attack.attacker
                    );
                };
                if usize::from(attack.weapon) >= unit.weapons.len() {
                    anyhow::bail!(
                        "Turn {} {}: unit {} has no weapon {}",
                        phase.turn,
                        phase.kind,
                        unit.name,
                        attack.weapon
                    );
                }
            }
        }
        Ok(())
    }
}

fn validate_unit(unit: &UnitSpec, catalog: &WeaponCatalog) -> LoadResult<()> {
    for mount in &unit.weapons {
        if catalog.get(&mount.weapon).is_none() {
            anyhow::bail!("Unit {} mounts unknown weapon {}", unit.name, mount.weapon);
        }
        if mount
            .loaded_bin
            .is_some_and(|bin| usize::from(bin) >= unit.bins.len())
        {
            anyhow::bail!("Unit {} loads a missing bin", unit.name);
        }
    }
    for ams in &unit.ams {
        if usize::from(ams.weapon) >= unit.weapons.len() {
            anyhow::bail!("Unit {} has AMS on missing mount {}", unit.name, ams.weapon);
        }
        if ams.bin.is_some_and(|bin| usize::from(bin) >= unit.bins.len()) {
            anyhow::bail!("Unit {} feeds AMS from a missing bin", unit.name);
        }
    }
    Ok(())
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario and check it against the weapon catalog.
    pub fn load(path: &Path, catalog: &WeaponCatalog) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario: Scenario = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse scenario RON {}: {}", path.display(), e)
        })?;
        scenario.validate(catalog)?;
        Ok(scenario)
    }
}
