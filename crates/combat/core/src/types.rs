//! Identifiers, board coordinates and hit-location vocabulary shared by every
//! resolution step.

use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a unit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Weapon mount index on its owning unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponId(pub u16);

/// Ammunition bin index on its owning unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinId(pub u16);

/// Identifier of a building (which may span several hexes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingId(pub u32);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building {}", self.0)
    }
}

/// Identifier of a declared attack, unique for the lifetime of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackId(pub u64);

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attack {}", self.0)
    }
}

// ============================================================================
// Hex Coordinates
// ============================================================================

/// Hex position in offset coordinates (odd columns are shifted half a hex
/// down).
///
/// Directions are numbered clockwise starting from north:
/// `0 = N, 1 = NE, 2 = SE, 3 = S, 4 = SW, 5 = NW`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn to_cube(self) -> (i32, i32, i32) {
        let q = self.x;
        let r = self.y - (self.x - (self.x & 1)) / 2;
        (q, r, -q - r)
    }

    /// Hex distance between two positions.
    pub fn distance(self, other: Coords) -> u32 {
        let (aq, ar, as_) = self.to_cube();
        let (bq, br, bs) = other.to_cube();
        let dq = (aq - bq).unsigned_abs();
        let dr = (ar - br).unsigned_abs();
        let ds = (as_ - bs).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// The adjacent hex in `direction` (taken modulo 6).
    pub fn neighbor(self, direction: u8) -> Coords {
        let odd = self.x & 1 == 1;
        let (dx, dy) = match (direction % 6, odd) {
            (0, _) => (0, -1),
            (1, false) => (1, -1),
            (1, true) => (1, 0),
            (2, false) => (1, 0),
            (2, true) => (1, 1),
            (3, _) => (0, 1),
            (4, false) => (-1, 0),
            (4, true) => (-1, 1),
            (5, false) => (-1, -1),
            _ => (-1, 0),
        };
        Coords::new(self.x + dx, self.y + dy)
    }

    /// Walks `distance` hexes in a straight line.
    pub fn translated(self, direction: u8, distance: u32) -> Coords {
        (0..distance).fold(self, |pos, _| pos.neighbor(direction))
    }

    /// The six adjacent hexes in direction order.
    pub fn ring(self) -> [Coords; 6] {
        [0, 1, 2, 3, 4, 5].map(|dir| self.neighbor(dir))
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// Phases
// ============================================================================

/// Phase of a game turn, as driven by the external scheduler.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PhaseKind {
    Initiative,
    Movement,
    Targeting,
    Offboard,
    #[default]
    Firing,
    Physical,
    End,
}

/// The phase in which a resolution is executing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseInfo {
    pub turn: u32,
    pub kind: PhaseKind,
}

impl PhaseInfo {
    pub const fn new(turn: u32, kind: PhaseKind) -> Self {
        Self { turn, kind }
    }
}

// ============================================================================
// Units and Hit Locations
// ============================================================================

/// Broad unit category; selects the hit location table and some munition
/// effects.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Mech,
    Vehicle,
    Infantry,
}

/// Side of the target that faces the attacker, chosen by the to-hit resolver.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitSide {
    #[default]
    Front,
    Left,
    Right,
    Rear,
}

/// Body location of a unit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Location {
    // Mech
    Head,
    CenterTorso,
    LeftTorso,
    RightTorso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    // Vehicle
    Front,
    LeftSide,
    RightSide,
    Rear,
    Turret,
    // Conventional infantry
    Troopers,
}

impl Location {
    /// Where excess damage goes once this location is destroyed.
    pub const fn transfer(self) -> Option<Location> {
        match self {
            Location::LeftArm | Location::LeftLeg => Some(Location::LeftTorso),
            Location::RightArm | Location::RightLeg => Some(Location::RightTorso),
            Location::LeftTorso | Location::RightTorso => Some(Location::CenterTorso),
            _ => None,
        }
    }

    /// Destroying this location destroys the whole unit.
    pub const fn is_vital(self) -> bool {
        !matches!(
            self,
            Location::LeftTorso
                | Location::RightTorso
                | Location::LeftArm
                | Location::RightArm
                | Location::LeftLeg
                | Location::RightLeg
        )
    }

    pub const fn has_rear_armor(self) -> bool {
        matches!(
            self,
            Location::CenterTorso | Location::LeftTorso | Location::RightTorso
        )
    }

    pub const fn is_limb(self) -> bool {
        matches!(
            self,
            Location::LeftArm | Location::RightArm | Location::LeftLeg | Location::RightLeg
        )
    }
}

/// A resolved hit location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitData {
    pub location: Location,
    /// Damage is applied to rear armor.
    pub rear: bool,
    /// The location roll itself calls for a critical check regardless of
    /// remaining armor.
    pub through_armor_critical: bool,
}

impl HitData {
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            rear: false,
            through_armor_critical: false,
        }
    }

    pub const fn rear(mut self, rear: bool) -> Self {
        self.rear = rear && self.location.has_rear_armor();
        self
    }

    pub const fn with_critical(mut self) -> Self {
        self.through_armor_critical = true;
        self
    }
}

impl fmt::Display for HitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rear {
            write!(f, "{} (rear)", self.location)
        } else {
            write!(f, "{}", self.location)
        }
    }
}
