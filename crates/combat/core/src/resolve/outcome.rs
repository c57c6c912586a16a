use crate::damage::{CriticalTrigger, DamageEvent};
use crate::error::ResolutionError;
use crate::report::ReportEntry;
use crate::strategy::ArtilleryFlight;
use crate::types::{AttackId, BinId, BuildingId, Coords, EntityId, Location, WeaponId};

/// How far an attack got.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeStatus {
    /// Ran to completion; hit or miss.
    #[default]
    Resolved,
    /// Stopped before any commit; nothing changed.
    Aborted,
    /// Artillery round in flight; the scheduler keeps the persisted record.
    Pending,
    /// Committed but could not pick a target (homing round with no tag).
    Unresolvable,
}

/// State change performed on a collaborator, recorded for the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SideEffect {
    AmmoConsumed {
        entity: EntityId,
        bin: BinId,
        rounds: u32,
    },
    AmmoBinSwitched {
        entity: EntityId,
        weapon: WeaponId,
        bin: BinId,
    },
    HeatGenerated {
        entity: EntityId,
        heat: u32,
    },
    WeaponJammed {
        entity: EntityId,
        weapon: WeaponId,
    },
    WeaponDestroyed {
        entity: EntityId,
        weapon: WeaponId,
    },
    AmsEngaged {
        entity: EntityId,
        weapon: WeaponId,
    },
    TerrainIgnited(Coords),
    TerrainCleared(Coords),
    TargetIlluminated(Coords),
    BuildingDamaged {
        building: BuildingId,
        amount: u32,
    },
    BuildingCollapsed(BuildingId),
    LocationDestroyed {
        entity: EntityId,
        location: Location,
    },
    EntityDestroyed(EntityId),
    CriticalTriggered(CriticalTrigger),
    ArtilleryScheduled(Box<ArtilleryFlight>),
    TagShotRecorded(u32),
    TagShotsReset,
}

/// Everything a resolution produced. Reports become visible only here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionOutcome {
    pub attack_id: AttackId,
    pub status: OutcomeStatus,
    pub hit: bool,
    pub hits_landed: u32,
    pub damage_events: Vec<DamageEvent>,
    pub reports: Vec<ReportEntry>,
    pub side_effects: Vec<SideEffect>,
    /// Error that degraded this attack, if any.
    pub failure: Option<ResolutionError>,
}

impl ResolutionOutcome {
    pub fn is_committed(&self) -> bool {
        self.status != OutcomeStatus::Aborted
    }

    /// The persisted record of a round left in flight.
    pub fn scheduled_flight(&self) -> Option<&ArtilleryFlight> {
        self.side_effects.iter().find_map(|effect| match effect {
            SideEffect::ArtilleryScheduled(flight) => Some(flight.as_ref()),
            _ => None,
        })
    }

    pub fn total_damage_applied(&self) -> u32 {
        self.damage_events.iter().map(|event| event.applied).sum()
    }

    pub fn rendered_reports(&self) -> Vec<String> {
        self.reports.iter().map(|entry| entry.render()).collect()
    }
}
