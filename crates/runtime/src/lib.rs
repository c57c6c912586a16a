//! Runtime orchestration for phase-by-phase attack resolution.
//!
//! This crate wires the deterministic resolution engine in `combat-core` to
//! concrete state: an in-memory board and roster, a store for artillery in
//! flight and a structured log of every phase. Consumers build a
//! [`Battlefield`] from a scenario and drive it with [`PhaseRunner`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the phase runner and its configuration
//! - [`api`] exposes the error and log types downstream clients consume
//! - [`scenario`] turns loaded content into a battlefield
//! - [`oracle`] and [`repository`] provide the collaborators resolution uses
pub mod api;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod scenario;

pub use api::{AttackRecord, AttackSource, PhaseLog, PhaseRecord, Result, RuntimeError};
pub use oracle::{Board, Building, RangeToHit, Roster, Unit};
pub use repository::{ArtilleryRepository, InMemoryArtilleryRepo, RepositoryError};
pub use runtime::{PhaseRunner, PlannedAttack, RuntimeConfig};
pub use scenario::{Battlefield, LoadedScenario};
