use super::BoardState;
use crate::attack::{TargetRef, ToHitResult};
use crate::types::EntityId;
use crate::weapon::MountedWeapon;

/// Computes the to-hit number for a declared attack.
///
/// The full modifier catalog lives outside this crate; resolution only
/// consumes the returned [`ToHitResult`].
pub trait ToHitResolver {
    fn compute(
        &self,
        attacker: EntityId,
        target: &TargetRef,
        weapon: &MountedWeapon,
        board: &dyn BoardState,
    ) -> ToHitResult;
}
