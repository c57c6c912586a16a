//! Content loaders for reading combat data from files.

pub mod factory;
pub mod rules;
pub mod scenario;
pub mod weapons;

pub use factory::ContentFactory;
pub use rules::RulesLoader;
pub use scenario::{
    AmsSpec, AttackSpec, BinSpec, BoardSpec, BuildingSpec, MountSpec, PhaseSpec, Scenario,
    ScenarioLoader, TagSpec, TargetSpec, UnitSpec,
};
pub use weapons::{WeaponCatalog, WeaponLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
