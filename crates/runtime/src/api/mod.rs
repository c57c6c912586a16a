//! Types surfaced to runtime consumers: errors and the phase log.
pub mod errors;
pub mod log;

pub use errors::{Result, RuntimeError};
pub use log::{AttackRecord, AttackSource, PhaseLog, PhaseRecord};
