//! Weapon, munition and ammunition definitions.
//!
//! A [`WeaponProfile`] is catalog data shared by every mount of the same
//! weapon. A [`MountedWeapon`] is one instance on a unit with its own status
//! and loaded bin.

use bitflags::bitflags;

use crate::types::{BinId, Location, WeaponId};

// ============================================================================
// Families and Munitions
// ============================================================================

/// Broad weapon category used by strategy selection.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponFamily {
    Energy,
    Autocannon,
    UltraAutocannon,
    RotaryAutocannon,
    MissileRack,
    StreakRack,
    Artillery,
    Minefield,
    LegAttack,
    SwarmAttack,
}

impl WeaponFamily {
    pub const fn requires_ammo(self) -> bool {
        matches!(
            self,
            Self::Autocannon
                | Self::UltraAutocannon
                | Self::RotaryAutocannon
                | Self::MissileRack
                | Self::StreakRack
                | Self::Artillery
        )
    }

    /// Families that can load the autocannon munition variants.
    pub const fn is_autocannon(self) -> bool {
        matches!(
            self,
            Self::Autocannon | Self::UltraAutocannon | Self::RotaryAutocannon
        )
    }

    /// Guided weapons are degraded by planetary EMI.
    pub const fn is_guided(self) -> bool {
        matches!(self, Self::MissileRack | Self::StreakRack)
    }
}

bitflags! {
    /// Munition flags carried by an ammunition bin. An empty set is standard
    /// ammunition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MunitionType: u16 {
        const ARMOR_PIERCING  = 1 << 0;
        const FLECHETTE       = 1 << 1;
        const INCENDIARY      = 1 << 2;
        const TRACER          = 1 << 3;
        const FLAK            = 1 << 4;
        const CLUSTER         = 1 << 5;
        const HOMING          = 1 << 6;
        const ARTEMIS_CAPABLE = 1 << 7;
        const NARC_CAPABLE    = 1 << 8;
    }
}

impl MunitionType {
    pub const STANDARD: Self = Self::empty();
}

/// How many shots the weapon discharges this attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FireMode {
    #[default]
    Single,
    /// Ultra autocannon double-tap.
    Ultra,
    /// Rotary autocannon spin-up, 1 to 6 shots.
    Rotary(u8),
    /// Standard autocannon rapid-fire (two shots).
    Rapid,
}

impl FireMode {
    pub const MAX_ROTARY_SHOTS: u8 = 6;

    pub fn shots(self) -> u32 {
        match self {
            FireMode::Single => 1,
            FireMode::Ultra | FireMode::Rapid => 2,
            FireMode::Rotary(n) => u32::from(n.clamp(1, Self::MAX_ROTARY_SHOTS)),
        }
    }
}

// ============================================================================
// Catalog Profile
// ============================================================================

/// Static weapon data, loaded from the weapon catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub name: String,
    pub family: WeaponFamily,
    /// Damage per sub-hit (per missile for racks, per shell otherwise).
    pub damage: u32,
    /// Missiles per volley; 1 for single-projectile weapons.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub rack_size: u32,
    /// Largest group of sub-hits that shares one hit location.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub cluster_size: u32,
    /// Heat generated per shot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub heat: u32,
    /// Damage dealt to each hex adjacent to an artillery impact.
    #[cfg_attr(feature = "serde", serde(default))]
    pub splash_damage: u32,
    /// Fired from off the map; impacts in the off-board phase.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offboard: bool,
    /// Flamer-type weapon that may set the target hex alight even on a miss.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignites: bool,
    /// Short, medium and long range limits in hexes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranges: [u32; 3],
    /// Cluster roll modifier per range bracket (short, medium, long, extreme).
    #[cfg_attr(feature = "serde", serde(default))]
    pub cluster_range_modifiers: [i32; 4],
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

impl WeaponProfile {
    pub fn new(name: impl Into<String>, family: WeaponFamily, damage: u32) -> Self {
        Self {
            name: name.into(),
            family,
            damage,
            rack_size: 1,
            cluster_size: 1,
            heat: 0,
            splash_damage: 0,
            offboard: false,
            ignites: false,
            ranges: [0; 3],
            cluster_range_modifiers: [0; 4],
        }
    }

    pub fn with_rack(mut self, rack_size: u32, cluster_size: u32) -> Self {
        self.rack_size = rack_size.max(1);
        self.cluster_size = cluster_size.max(1);
        self
    }

    pub fn with_heat(mut self, heat: u32) -> Self {
        self.heat = heat;
        self
    }

    pub fn with_splash(mut self, splash_damage: u32) -> Self {
        self.splash_damage = splash_damage;
        self
    }

    pub fn with_ranges(mut self, short: u32, medium: u32, long: u32) -> Self {
        self.ranges = [short, medium, long];
        self
    }

    pub fn offboard(mut self) -> Self {
        self.offboard = true;
        self
    }

    pub fn igniting(mut self) -> Self {
        self.ignites = true;
        self
    }

    /// Total damage of a full volley from a single shot.
    pub fn rated_damage(&self) -> u32 {
        self.damage * self.rack_size
    }

    /// Racks and multi-projectile weapons roll on the cluster table.
    pub fn is_cluster(&self) -> bool {
        self.rack_size > 1
    }
}

// ============================================================================
// Mounted Weapons and Ammunition
// ============================================================================

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponStatus {
    #[default]
    Operational,
    Jammed,
    Destroyed,
}

/// One weapon mounted on a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MountedWeapon {
    pub id: WeaponId,
    pub profile: WeaponProfile,
    pub location: Location,
    pub status: WeaponStatus,
    /// Linked to an Artemis IV fire-control system.
    pub artemis_linked: bool,
    pub loaded_bin: Option<BinId>,
}

impl MountedWeapon {
    pub fn new(id: WeaponId, profile: WeaponProfile, location: Location) -> Self {
        Self {
            id,
            profile,
            location,
            status: WeaponStatus::Operational,
            artemis_linked: false,
            loaded_bin: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.status == WeaponStatus::Operational
    }
}

/// An ammunition bin. `feeds` names the weapon profile it can be loaded into.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoBin {
    pub id: BinId,
    pub feeds: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub munitions: MunitionType,
    pub shots: u32,
}

impl AmmoBin {
    pub fn is_empty(&self) -> bool {
        self.shots == 0
    }

    /// Same weapon and same munition set; the bin can replace `other` when
    /// it runs dry.
    pub fn interchangeable_with(&self, other: &AmmoBin) -> bool {
        self.feeds == other.feeds && self.munitions == other.munitions
    }
}

/// An anti-missile system protecting a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmsMount {
    pub weapon: WeaponId,
    /// Bin feeding the system; laser systems have none.
    pub bin: Option<BinId>,
    pub heat: u32,
    /// Already fired this phase.
    pub engaged: bool,
}
