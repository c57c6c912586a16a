//! Content factory for loading a battle from a data directory.

use std::path::{Path, PathBuf};

use combat_core::RulesConfig;

use crate::loaders::{
    LoadResult, RulesLoader, Scenario, ScenarioLoader, WeaponCatalog, WeaponLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── weapons.ron
/// ├── rules.toml
/// └── scenarios/
///     ├── skirmish.ron
///     └── barrage.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load the weapon catalog from `weapons.ron`.
    pub fn load_weapons(&self) -> LoadResult<WeaponCatalog> {
        WeaponLoader::load(&self.data_dir.join("weapons.ron"))
    }

    /// Load optional rules from `rules.toml`, or defaults when the file is
    /// absent.
    pub fn load_rules(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("rules.toml");
        if path.exists() {
            RulesLoader::load(&path)
        } else {
            Ok(RulesConfig::default())
        }
    }

    /// Load `scenarios/{name}.ron`, checked against `catalog`.
    pub fn load_scenario(&self, name: &str, catalog: &WeaponCatalog) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path, catalog)
    }

    /// Names of the scenarios in `scenarios/`, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("scenarios");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
