//! Error infrastructure for combat-core.
//!
//! Misses, jams, absorbed damage and untargetable homing rounds are ordinary
//! resolution branches and never surface here. These types describe attacks
//! that could not be resolved as declared.

use crate::attack::TargetRef;
use crate::env::OracleError;
use crate::types::{EntityId, WeaponId};
use crate::weapon::WeaponStatus;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can succeed later with the same or an amended declaration.
    Recoverable,

    /// Invalid input; the declaration must be rejected.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Collaborator state is unusable; the phase cannot continue reliably.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// The attacker's loadout cannot support the declared attack.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigurationError {
    #[error("attacker {0} does not exist or is destroyed")]
    AttackerUnavailable(EntityId),

    #[error("weapon {weapon:?} is {status}")]
    WeaponUnusable {
        weapon: WeaponId,
        status: WeaponStatus,
    },

    #[error("weapon {0:?} has no ammunition loaded")]
    NoAmmoLoaded(WeaponId),

    #[error("weapon {0:?} has no rounds left in any compatible bin")]
    AmmoExhausted(WeaponId),

    #[error("weapon {weapon:?} cannot fire {munition}")]
    UnsupportedMunition { weapon: WeaponId, munition: String },
}

impl CombatError for ConfigurationError {
    fn severity(&self) -> ErrorSeverity {
        use ConfigurationError::*;
        match self {
            AttackerUnavailable(_) | WeaponUnusable { .. } | UnsupportedMunition { .. } => {
                ErrorSeverity::Validation
            }
            // Bins can be reloaded between turns.
            NoAmmoLoaded(_) | AmmoExhausted(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use ConfigurationError::*;
        match self {
            AttackerUnavailable(_) => "CONFIG_ATTACKER_UNAVAILABLE",
            WeaponUnusable { .. } => "CONFIG_WEAPON_UNUSABLE",
            NoAmmoLoaded(_) => "CONFIG_NO_AMMO_LOADED",
            AmmoExhausted(_) => "CONFIG_AMMO_EXHAUSTED",
            UnsupportedMunition { .. } => "CONFIG_UNSUPPORTED_MUNITION",
        }
    }
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Failure of a single attack resolution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("invalid target {target}: {reason}")]
    InvalidTarget { target: TargetRef, reason: String },

    /// A strategy step ran outside its precondition.
    #[error("rule violation: {0}")]
    RuleViolation(String),

    #[error("collaborator failure: {0}")]
    Oracle(#[from] OracleError),
}

impl ResolutionError {
    pub fn invalid_target(target: TargetRef, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target,
            reason: reason.into(),
        }
    }

    pub fn rule_violation(message: impl Into<String>) -> Self {
        Self::RuleViolation(message.into())
    }
}

impl CombatError for ResolutionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Configuration(e) => e.severity(),
            Self::InvalidTarget { .. } => ErrorSeverity::Validation,
            Self::RuleViolation(_) => ErrorSeverity::Internal,
            Self::Oracle(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(e) => e.error_code(),
            Self::InvalidTarget { .. } => "RESOLUTION_INVALID_TARGET",
            Self::RuleViolation(_) => "RESOLUTION_RULE_VIOLATION",
            Self::Oracle(e) => e.error_code(),
        }
    }
}
