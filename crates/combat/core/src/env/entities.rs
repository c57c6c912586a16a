//! Entity registry collaborator.

use super::OracleError;
use crate::types::{BinId, Coords, EntityId, EntityKind, Location, WeaponId};
use crate::weapon::{AmmoBin, AmsMount, MountedWeapon, WeaponStatus};

/// Unit storage consulted and mutated during resolution.
///
/// Queries that only make sense for an existing unit return
/// [`OracleError::EntityNotFound`] when the id is unknown; predicates return
/// `false`.
pub trait EntityRegistry {
    // ===== identity and position =====
    fn exists(&self, id: EntityId) -> bool;

    fn is_destroyed(&self, id: EntityId) -> bool;

    fn kind(&self, id: EntityId) -> Result<EntityKind, OracleError>;

    fn position(&self, id: EntityId) -> Result<Coords, OracleError>;

    fn is_enemy(&self, a: EntityId, b: EntityId) -> bool;

    /// Units standing in the hex, in scan order.
    fn entities_at(&self, coords: Coords) -> Vec<EntityId>;

    // ===== armor and structure =====
    fn armor(&self, id: EntityId, location: Location, rear: bool) -> Result<u32, OracleError>;

    fn set_armor(
        &mut self,
        id: EntityId,
        location: Location,
        rear: bool,
        value: u32,
    ) -> Result<(), OracleError>;

    fn internal(&self, id: EntityId, location: Location) -> Result<u32, OracleError>;

    fn set_internal(&mut self, id: EntityId, location: Location, value: u32)
    -> Result<(), OracleError>;

    fn is_location_destroyed(&self, id: EntityId, location: Location) -> bool;

    fn destroy_location(&mut self, id: EntityId, location: Location) -> Result<(), OracleError>;

    fn destroy_entity(&mut self, id: EntityId) -> Result<(), OracleError>;

    /// Mark one critical slot in the location as hit.
    fn apply_critical(&mut self, id: EntityId, location: Location) -> Result<(), OracleError>;

    // ===== weapons and ammunition =====
    fn weapon(&self, id: EntityId, weapon: WeaponId) -> Result<MountedWeapon, OracleError>;

    fn set_weapon_status(
        &mut self,
        id: EntityId,
        weapon: WeaponId,
        status: WeaponStatus,
    ) -> Result<(), OracleError>;

    fn ammo_bins(&self, id: EntityId) -> Result<Vec<AmmoBin>, OracleError>;

    fn load_bin(&mut self, id: EntityId, weapon: WeaponId, bin: BinId) -> Result<(), OracleError>;

    fn consume_ammo(&mut self, id: EntityId, bin: BinId, rounds: u32) -> Result<(), OracleError>;

    fn add_heat(&mut self, id: EntityId, heat: u32) -> Result<(), OracleError>;

    // ===== defences and electronics =====
    fn ams_mounts(&self, id: EntityId) -> Vec<AmsMount>;

    fn mark_ams_engaged(&mut self, id: EntityId, weapon: WeaponId) -> Result<(), OracleError>;

    /// The unit sits inside hostile ECM coverage.
    fn is_ecm_affected(&self, id: EntityId) -> bool;

    fn stealth_active(&self, id: EntityId) -> bool;

    fn narc_tagged(&self, id: EntityId) -> bool;

    fn is_airborne(&self, id: EntityId) -> bool;
}
