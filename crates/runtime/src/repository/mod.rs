//! Repository layer for state that outlives a single phase.
//!
//! Artillery rounds with a flight time are committed on declaration and kept
//! here, keyed by attack id, until they land.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryArtilleryRepo;
pub use traits::ArtilleryRepository;
