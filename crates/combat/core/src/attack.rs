//! Attack declarations and the externally computed to-hit result.

use std::fmt;

use crate::types::{AttackId, Coords, EntityId, HitSide, WeaponId};
use crate::weapon::{FireMode, MunitionType};

/// What an attack aimed at a hex is meant to do there.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HexIntent {
    /// Damage whatever stands in the hex (building first).
    #[default]
    Strike,
    /// Clear woods or rubble.
    Clear,
    /// Set the hex alight.
    Ignite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Entity(EntityId),
    Hex { coords: Coords, intent: HexIntent },
}

impl TargetRef {
    pub const fn entity(&self) -> Option<EntityId> {
        match self {
            TargetRef::Entity(id) => Some(*id),
            TargetRef::Hex { .. } => None,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Entity(id) => write!(f, "unit {id}"),
            TargetRef::Hex { coords, intent } => write!(f, "hex {coords} ({intent})"),
        }
    }
}

/// A declared weapon attack. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDeclaration {
    pub id: AttackId,
    pub attacker: EntityId,
    pub weapon: WeaponId,
    pub target: TargetRef,
    /// Munition the attacker chose; `None` fires whatever is loaded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub munition: Option<MunitionType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: FireMode,
    /// Flight time for artillery; ignored by direct-fire weapons.
    #[cfg_attr(feature = "serde", serde(default))]
    pub turns_to_impact: u8,
}

impl AttackDeclaration {
    pub fn new(id: AttackId, attacker: EntityId, weapon: WeaponId, target: TargetRef) -> Self {
        Self {
            id,
            attacker,
            weapon,
            target,
            munition: None,
            mode: FireMode::Single,
            turns_to_impact: 0,
        }
    }

    pub fn with_munition(mut self, munition: MunitionType) -> Self {
        self.munition = Some(munition);
        self
    }

    pub fn with_mode(mut self, mode: FireMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_flight_time(mut self, turns: u8) -> Self {
        self.turns_to_impact = turns;
        self
    }
}

// ============================================================================
// To-Hit Result
// ============================================================================

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RangeBracket {
    #[default]
    Short,
    Medium,
    Long,
    Extreme,
}

/// Outcome decided before any dice are rolled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToHitShortCircuit {
    Impossible(String),
    AutomaticFail(String),
    AutomaticSuccess(String),
}

/// Produced by the to-hit resolver; consumed unchanged by resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToHitResult {
    pub value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_circuit: Option<ToHitShortCircuit>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub side: HitSide,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: RangeBracket,
    #[cfg_attr(feature = "serde", serde(default))]
    pub all_shots_hit: bool,
}

impl ToHitResult {
    /// Target number reported for attacks that cannot succeed on 2d6.
    pub const AUTOMATIC_FAIL_VALUE: i32 = 13;

    pub fn new(value: i32) -> Self {
        Self {
            value,
            short_circuit: None,
            side: HitSide::Front,
            range: RangeBracket::Short,
            all_shots_hit: false,
        }
    }

    pub fn impossible(reason: impl Into<String>) -> Self {
        Self {
            short_circuit: Some(ToHitShortCircuit::Impossible(reason.into())),
            ..Self::new(Self::AUTOMATIC_FAIL_VALUE)
        }
    }

    pub fn automatic_fail(reason: impl Into<String>) -> Self {
        Self {
            short_circuit: Some(ToHitShortCircuit::AutomaticFail(reason.into())),
            ..Self::new(Self::AUTOMATIC_FAIL_VALUE)
        }
    }

    pub fn automatic_success(reason: impl Into<String>) -> Self {
        Self {
            short_circuit: Some(ToHitShortCircuit::AutomaticSuccess(reason.into())),
            ..Self::new(0)
        }
    }

    pub fn with_side(mut self, side: HitSide) -> Self {
        self.side = side;
        self
    }

    pub fn with_range(mut self, range: RangeBracket) -> Self {
        self.range = range;
        self
    }

    pub fn with_all_shots_hit(mut self) -> Self {
        self.all_shots_hit = true;
        self
    }

    pub fn impossible_reason(&self) -> Option<&str> {
        match &self.short_circuit {
            Some(ToHitShortCircuit::Impossible(reason)) => Some(reason),
            _ => None,
        }
    }
}
