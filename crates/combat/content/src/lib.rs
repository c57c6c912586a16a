//! Data-driven combat content and loaders.
//!
//! This crate reads the static data a battle is built from:
//! - Weapon catalog (`weapons.ron`)
//! - Optional rules (`rules.toml`)
//! - Scenarios: board, units and per-phase attack declarations
//!   (`scenarios/*.ron`)
//!
//! Content is consumed by the runtime and never mutated during resolution.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AmsSpec, AttackSpec, BinSpec, BoardSpec, BuildingSpec, ContentFactory, LoadResult, MountSpec,
    PhaseSpec, RulesLoader, Scenario, ScenarioLoader, TagSpec, TargetSpec, UnitSpec,
    WeaponCatalog, WeaponLoader,
};
