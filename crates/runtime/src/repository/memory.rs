//! In-memory ArtilleryRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use combat_core::{ArtilleryFlight, AttackId};

use super::{ArtilleryRepository, RepositoryError, Result};

/// In-memory implementation of ArtilleryRepository.
pub struct InMemoryArtilleryRepo {
    flights: RwLock<BTreeMap<AttackId, ArtilleryFlight>>,
}

impl InMemoryArtilleryRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            flights: RwLock::new(BTreeMap::new()),
        }
    }

    /// Serialize every stored flight, in attack id order.
    pub fn export_json(&self) -> Result<String> {
        let flights = self.list()?;
        serde_json::to_string_pretty(&flights).map_err(|e| RepositoryError::Json(e.to_string()))
    }

    /// Restore flights previously written by [`Self::export_json`].
    pub fn import_json(json: &str) -> Result<Self> {
        let flights: Vec<ArtilleryFlight> =
            serde_json::from_str(json).map_err(|e| RepositoryError::Json(e.to_string()))?;
        let repo = Self::new();
        for flight in flights {
            repo.insert(flight)?;
        }
        Ok(repo)
    }
}

impl Default for InMemoryArtilleryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtilleryRepository for InMemoryArtilleryRepo {
    fn insert(&self, flight: ArtilleryFlight) -> Result<()> {
        let mut flights = self
            .flights
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if flights.contains_key(&flight.attack_id) {
            return Err(RepositoryError::DuplicateFlight(flight.attack_id));
        }
        flights.insert(flight.attack_id, flight);
        Ok(())
    }

    fn update(&self, flight: &ArtilleryFlight) -> Result<()> {
        let mut flights = self
            .flights
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        flights.insert(flight.attack_id, flight.clone());
        Ok(())
    }

    fn remove(&self, id: AttackId) -> Result<Option<ArtilleryFlight>> {
        let mut flights = self
            .flights
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(flights.remove(&id))
    }

    fn get(&self, id: AttackId) -> Result<Option<ArtilleryFlight>> {
        let flights = self
            .flights
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(flights.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ArtilleryFlight>> {
        let flights = self
            .flights
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(flights.values().cloned().collect())
    }
}
