//! Deterministic weapon-attack resolution.
//!
//! `combat-core` turns a declared attack plus an externally computed to-hit
//! result into hits, damage, critical effects and narration. Board, unit and
//! dice state are injected through [`env::CombatEnv`]; the crate owns no
//! state of its own and performs no I/O. Entry points are
//! [`resolve::resolve`] and [`resolve::resolve_artillery`].
pub mod attack;
pub mod config;
pub mod damage;
pub mod env;
pub mod error;
pub mod hit_table;
pub mod report;
pub mod resolve;
pub mod strategy;
pub mod types;
pub mod weapon;

#[cfg(test)]
mod testing;

pub use attack::{
    AttackDeclaration, HexIntent, RangeBracket, TargetRef, ToHitResult, ToHitShortCircuit,
};
pub use config::RulesConfig;
pub use damage::{
    CriticalEffect, CriticalRule, CriticalTrigger, DamageEvent, DamageRequest, DamageTarget,
    LocationSpec,
};
pub use env::{
    BoardState, BuildingInfo, CombatEnv, EntityRegistry, GuidanceTag, OracleError, PcgRng,
    RandomSource, ScriptedRolls, ToHitResolver, compute_seed,
};
pub use error::{CombatError, ConfigurationError, ErrorSeverity, ResolutionError};
pub use hit_table::hits_landed;
pub use report::{ReportEntry, ReportId, ReportParam};
pub use resolve::{
    OutcomeStatus, ResolutionContext, ResolutionOutcome, SideEffect, resolve, resolve_artillery,
};
pub use strategy::{
    AreaProfile, ArtilleryFlight, ArtilleryKind, FlightStatus, MunitionVariant, RapidFireKind,
    Strategy,
};
pub use types::{
    AttackId, BinId, BuildingId, Coords, EntityId, EntityKind, HitData, HitSide, Location,
    PhaseInfo, PhaseKind, WeaponId,
};
pub use weapon::{
    AmmoBin, AmsMount, FireMode, MountedWeapon, MunitionType, WeaponFamily, WeaponProfile,
    WeaponStatus,
};
