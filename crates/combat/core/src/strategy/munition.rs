//! Autocannon munition variants.

use tracing::debug;

use crate::damage::{CriticalRule, armor_piercing_modifier};
use crate::env::CombatEnv;
use crate::error::ResolutionError;
use crate::report::ReportId;
use crate::resolve::{ResolutionContext, SideEffect};
use crate::types::{Coords, EntityKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MunitionVariant {
    /// Critical check on every hit.
    ArmorPiercing,
    /// Double damage against infantry, half against everything else.
    Flechette,
    /// Ignition attempt at the target hex, hit or miss.
    Incendiary,
    /// Illuminates the target hex on a hit.
    Tracer,
    /// Cluster rounds with a bonus against airborne targets.
    Flak,
    /// One sub-shot per point of rated damage.
    Cluster,
}

impl MunitionVariant {
    /// Fires pellets through the cluster table instead of a single shell.
    pub const fn is_pellet(self) -> bool {
        matches!(self, Self::Cluster | Self::Flak)
    }

    pub const fn ignites(self) -> bool {
        matches!(self, Self::Incendiary)
    }
}

/// Damage per shell after munition scaling. Halved damage rounds up.
pub fn scaled_damage(
    variant: Option<MunitionVariant>,
    damage: u32,
    target: Option<EntityKind>,
) -> u32 {
    match (variant, target) {
        (Some(MunitionVariant::Flechette), Some(EntityKind::Infantry)) => damage * 2,
        (Some(MunitionVariant::Flechette), _) => damage.div_ceil(2),
        _ => damage,
    }
}

pub fn critical_rule(variant: Option<MunitionVariant>, damage: u32) -> CriticalRule {
    match variant {
        Some(MunitionVariant::ArmorPiercing) => {
            CriticalRule::ArmorPiercing(armor_piercing_modifier(damage))
        }
        _ => CriticalRule::Standard,
    }
}

/// Try to set `coords` alight. Returns `true` if the hex now burns.
pub fn attempt_ignition(
    coords: Coords,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<bool, ResolutionError> {
    let Some(target_number) = env.board.ignition_target(coords) else {
        return Ok(false);
    };
    let roll = env.rng.roll_two_dice();
    if i32::from(roll) < target_number {
        ctx.push_report(
            ctx.entry(ReportId::IgnitionFailed)
                .indent(1)
                .hex(coords)
                .int(target_number)
                .int(roll),
        );
        return Ok(false);
    }

    env.board.ignite(coords)?;
    debug!(target: "combat::munition", %coords, roll, target_number, "terrain ignited");
    ctx.push_report(ctx.entry(ReportId::TerrainIgnited).indent(1).hex(coords));
    ctx.effect(SideEffect::TerrainIgnited(coords));
    Ok(true)
}

pub fn illuminate(
    coords: Coords,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    env.board.illuminate(coords)?;
    ctx.push_report(ctx.entry(ReportId::TargetIlluminated).indent(1).hex(coords));
    ctx.effect(SideEffect::TargetIlluminated(coords));
    Ok(())
}
