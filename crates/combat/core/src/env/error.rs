//! Collaborator access errors.

use crate::error::{CombatError, ErrorSeverity};
use crate::types::{BinId, BuildingId, Coords, EntityId, WeaponId};

/// Errors raised by the board or entity registry implementations.
///
/// These are collaborator failures: the resolution engine asked for data that
/// the injected store could not provide.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("weapon {weapon:?} not mounted on entity {entity}")]
    WeaponNotFound { entity: EntityId, weapon: WeaponId },

    #[error("ammo bin {bin:?} not found on entity {entity}")]
    BinNotFound { entity: EntityId, bin: BinId },

    #[error("{0} not found")]
    BuildingNotFound(BuildingId),

    #[error("hex {0} is out of map bounds")]
    OutOfBounds(Coords),

    /// The store rejected the mutation (e.g. a lock could not be taken).
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            EntityNotFound(_)
            | WeaponNotFound { .. }
            | BinNotFound { .. }
            | BuildingNotFound(_)
            | OutOfBounds(_) => ErrorSeverity::Validation,
            Unavailable(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            EntityNotFound(_) => "ORACLE_ENTITY_NOT_FOUND",
            WeaponNotFound { .. } => "ORACLE_WEAPON_NOT_FOUND",
            BinNotFound { .. } => "ORACLE_BIN_NOT_FOUND",
            BuildingNotFound(_) => "ORACLE_BUILDING_NOT_FOUND",
            OutOfBounds(_) => "ORACLE_OUT_OF_BOUNDS",
            Unavailable(_) => "ORACLE_UNAVAILABLE",
        }
    }
}
