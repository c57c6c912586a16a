//! Weapon catalog loader.

use std::path::Path;

use combat_core::WeaponProfile;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Weapon catalog structure for RON files.
///
/// Profiles are looked up by name; names must be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponCatalog {
    pub weapons: Vec<WeaponProfile>,
}

impl WeaponCatalog {
    pub fn get(&self, name: &str) -> Option<&WeaponProfile> {
        self.weapons.iter().find(|profile| profile.name == name)
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weapons.iter().map(|profile| profile.name.as_str())
    }

    fn validate(&self) -> LoadResult<()> {
        for (index, profile) in self.weapons.iter().enumerate() {
            if self.weapons[..index].iter().any(|p| p.name == profile.name) {
                anyhow::bail!("Duplicate weapon name in catalog: {}", profile.name);
            }
            if profile.cluster_size == 0 || profile.rack_size == 0 {
                anyhow::bail!(
                    "Weapon {} must have a rack and cluster size of at least 1",
                    profile.name
                );
            }
        }
        Ok(())
    }
}

/// Loader for the weapon catalog from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load the weapon catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a WeaponCatalog
    pub fn load(path: &Path) -> LoadResult<WeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse catalog text already in memory.
    pub fn parse(content: &str) -> LoadResult<WeaponCatalog> {
        let catalog: WeaponCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon catalog RON: {}", e))?;
        catalog.validate()?;
        Ok(catalog)
    }
}
