//! Optional rules loader.

use std::path::Path;

use combat_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for optional rules from TOML files.
pub struct RulesLoader;

impl RulesLoader {
    /// Load rules from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        let rules: RulesConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;

        Ok(rules)
    }
}
