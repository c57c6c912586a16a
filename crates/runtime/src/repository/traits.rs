//! Repository contract for in-flight artillery.

use combat_core::{ArtilleryFlight, AttackId};

use super::Result;

/// Persistence for committed artillery rounds awaiting impact.
///
/// Listing returns flights in attack id order so the phase runner resolves
/// them deterministically.
pub trait ArtilleryRepository: Send + Sync {
    /// Store a newly scheduled flight. Fails if the attack id is taken.
    fn insert(&self, flight: ArtilleryFlight) -> Result<()>;

    /// Replace a stored flight after it advanced.
    fn update(&self, flight: &ArtilleryFlight) -> Result<()>;

    /// Remove and return a flight once it has been resolved.
    fn remove(&self, id: AttackId) -> Result<Option<ArtilleryFlight>>;

    fn get(&self, id: AttackId) -> Result<Option<ArtilleryFlight>>;

    /// All stored flights, ordered by attack id.
    fn list(&self) -> Result<Vec<ArtilleryFlight>>;

    fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}
