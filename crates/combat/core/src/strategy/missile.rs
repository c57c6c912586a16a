//! Missile racks and anti-missile interception.

use tracing::debug;

use crate::config::RulesConfig;
use crate::env::CombatEnv;
use crate::error::ResolutionError;
use crate::report::ReportId;
use crate::resolve::{ClusterModifier, ModifierSource, ResolutionContext, SideEffect};

/// Engage the target's first ready anti-missile system.
///
/// A system is ready when it has not fired this phase and, if it uses
/// ammunition, its bin still has a round. Engaging spends that round and the
/// system's heat, and adds the AMS modifier after every other modifier.
pub fn engage_ams(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let Some(target) = ctx.declaration.target.entity() else {
        return Ok(());
    };
    let bins = env.entities.ammo_bins(target)?;
    let ready = env.entities.ams_mounts(target).into_iter().find(|mount| {
        !mount.engaged
            && mount.bin.is_none_or(|bin| bins.iter().any(|b| b.id == bin && !b.is_empty()))
    });
    let Some(mount) = ready else {
        return Ok(());
    };

    if let Some(bin) = mount.bin {
        env.entities.consume_ammo(target, bin, 1)?;
        ctx.effect(SideEffect::AmmoConsumed {
            entity: target,
            bin,
            rounds: 1,
        });
    }
    if mount.heat > 0 {
        env.entities.add_heat(target, mount.heat)?;
        ctx.effect(SideEffect::HeatGenerated {
            entity: target,
            heat: mount.heat,
        });
    }
    env.entities.mark_ams_engaged(target, mount.weapon)?;
    ctx.effect(SideEffect::AmsEngaged {
        entity: target,
        weapon: mount.weapon,
    });
    debug!(target: "combat::missile", defender = target.0, weapon = mount.weapon.0, "AMS engaged");

    ctx.push_report(ctx.entry(ReportId::AmsEngaged).indent(1).entity(target));
    ctx.modifiers.push(ClusterModifier::new(
        ModifierSource::Ams,
        RulesConfig::AMS_CLUSTER_MODIFIER,
    ));
    ctx.push_report(
        ctx.entry(ReportId::ClusterModifier)
            .indent(1)
            .text(ModifierSource::Ams.as_ref())
            .int(RulesConfig::AMS_CLUSTER_MODIFIER),
    );
    Ok(())
}
