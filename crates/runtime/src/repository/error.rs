//! Error types raised by repository implementations.

use combat_core::AttackId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("artillery repository lock was poisoned")]
    LockPoisoned,

    #[error("{0} is already in flight")]
    DuplicateFlight(AttackId),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
