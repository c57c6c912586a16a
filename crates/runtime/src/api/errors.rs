//! Unified error types surfaced by the runtime API.
//!
//! Wraps repository, content and export failures so clients can bubble them
//! up with consistent context. Per-attack failures never appear here; they
//! travel inside each [`combat_core::ResolutionOutcome`].
use combat_core::AttackId;
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("unit {unit} mounts unknown weapon '{weapon}'")]
    UnknownWeapon { unit: u32, weapon: String },

    #[error("unit {unit} references missing bin {bin}")]
    UnknownBin { unit: u32, bin: u16 },

    #[error("{0} declared more than once")]
    DuplicateAttack(AttackId),

    #[error("failed to encode phase log")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write phase log")]
    Io(#[from] std::io::Error),
}
