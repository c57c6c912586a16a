//! The base volley: sub-shot counting, the cluster roll and damage grouping.
//!
//! Every direct-fire strategy except streak and area profiles ends up here;
//! munition variants and missile racks only change the inputs.

use tracing::debug;

use super::{MunitionVariant, Strategy, missile, munition};
use crate::attack::{HexIntent, TargetRef};
use crate::damage::{AbsorptionPass, DamageRequest, LocationSpec, apply_requests};
use crate::env::CombatEnv;
use crate::error::ResolutionError;
use crate::hit_table::hits_landed;
use crate::report::ReportId;
use crate::resolve::{ResolutionContext, SideEffect, modifiers};
use crate::types::Coords;

/// Fix the sub-shot count, per-hit damage and cluster size. Returns the
/// sub-shot count.
pub fn shape_volley(
    ctx: &mut ResolutionContext,
    env: &CombatEnv<'_>,
) -> Result<u32, ResolutionError> {
    let profile = &ctx.weapon.profile;
    let variant = ctx.strategy.munition();
    let sub_shots = if variant.is_some_and(MunitionVariant::is_pellet) {
        ctx.damage_per_hit = 1;
        ctx.cluster_size = 1;
        profile.rated_damage() * ctx.shots_fired
    } else {
        let target_kind = match ctx.declaration.target.entity() {
            Some(id) => Some(env.entities.kind(id)?),
            None => None,
        };
        ctx.damage_per_hit = munition::scaled_damage(variant, profile.damage, target_kind);
        ctx.cluster_size = profile.cluster_size;
        profile.rack_size * ctx.shots_fired
    };
    ctx.salvo = sub_shots > 1;
    Ok(sub_shots)
}

/// Count landed sub-shots.
///
/// A single sub-shot skips the cluster table; a glancing blow then halves
/// its damage. A salvo that must land in full skips it too, before any
/// anti-missile system fires. Other salvos assemble the modifier breakdown,
/// let missile racks draw anti-missile fire and roll on the cluster table.
pub fn hit_count(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let sub_shots = shape_volley(ctx, env)?;
    if sub_shots <= 1 {
        ctx.hits_landed = sub_shots;
        if ctx.glancing {
            ctx.damage_per_hit = (ctx.damage_per_hit / 2).max(1);
        }
        return Ok(());
    }
    if ctx.strategy == Strategy::Streak {
        return Err(ResolutionError::rule_violation(
            "streak volleys never roll on the cluster table",
        ));
    }

    if env.rules.all_shots_hit || ctx.to_hit.all_shots_hit {
        ctx.hits_landed = sub_shots;
        ctx.push_report(ctx.entry(ReportId::AllShotsHit).indent(1).int(sub_shots));
        return Ok(());
    }

    modifiers::assemble(ctx, env);
    if ctx.strategy == Strategy::Missile {
        missile::engage_ams(ctx, env)?;
    }

    let net = ctx.net_modifier();
    let roll = env.rng.roll_two_dice();
    ctx.hits_landed = hits_landed(sub_shots, net, roll, false);
    debug!(
        target: "combat::cluster",
        attack = ctx.attack_id().0,
        sub_shots,
        roll,
        modifier = net,
        hits = ctx.hits_landed,
        "cluster roll"
    );
    ctx.push_report(
        ctx.entry(ReportId::ClusterRoll)
            .indent(1)
            .int(roll)
            .int(i32::from(roll) + net)
            .int(ctx.hits_landed)
            .int(sub_shots),
    );
    Ok(())
}

/// Group landed sub-shots into clusters and amounts.
fn cluster_amounts(hits: u32, cluster_size: u32, damage_per_hit: u32) -> impl Iterator<Item = u32> {
    let size = cluster_size.max(1);
    (0..hits.div_ceil(size)).map(move |i| (hits - i * size).min(size) * damage_per_hit)
}

/// Hex the attack is aimed at.
pub fn target_hex(ctx: &ResolutionContext, env: &CombatEnv<'_>) -> Result<Coords, ResolutionError> {
    match ctx.declaration.target {
        TargetRef::Entity(id) => Ok(env.entities.position(id)?),
        TargetRef::Hex { coords, .. } => Ok(coords),
    }
}

/// Absorption pass for fire into `hex`. A building shelters its occupants
/// only from attackers outside it.
fn pass_for(
    hex: Coords,
    ctx: &ResolutionContext,
    env: &CombatEnv<'_>,
) -> Result<AbsorptionPass, ResolutionError> {
    let attacker_hex = env.entities.position(ctx.subject())?;
    let same_building = match (env.board.building_at(hex), env.board.building_at(attacker_hex)) {
        (Some(target), Some(attacker)) => target.id == attacker.id,
        _ => false,
    };
    if same_building {
        Ok(AbsorptionPass::none(hex))
    } else {
        Ok(AbsorptionPass::open(hex, env.board))
    }
}

/// Land the counted hits and run the on-hit munition effects.
pub fn apply_volley(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let variant = ctx.strategy.munition();
    let critical = munition::critical_rule(variant, ctx.weapon.profile.damage);
    let amounts: Vec<u32> =
        cluster_amounts(ctx.hits_landed, ctx.cluster_size, ctx.damage_per_hit).collect();
    let hex = target_hex(ctx, env)?;

    let mut ignition_tried = false;
    match ctx.declaration.target {
        TargetRef::Entity(id) => {
            let side = ctx.to_hit.side;
            let requests: Vec<_> = amounts
                .iter()
                .map(|&amount| {
                    DamageRequest::entity(id, amount, LocationSpec::Roll(side))
                        .with_critical(critical)
                })
                .collect();
            let mut pass = pass_for(hex, ctx, env)?;
            apply_requests(&requests, &mut pass, env, ctx)?;
        }
        TargetRef::Hex { coords, intent: HexIntent::Strike } => {
            let requests: Vec<_> = amounts
                .iter()
                .map(|&amount| DamageRequest::hex(coords, amount).with_critical(critical))
                .collect();
            let mut pass = pass_for(coords, ctx, env)?;
            apply_requests(&requests, &mut pass, env, ctx)?;
        }
        TargetRef::Hex { coords, intent: HexIntent::Clear } => {
            let total: u32 = amounts.iter().sum();
            if env.board.clear_terrain(coords, total)? {
                ctx.push_report(ctx.entry(ReportId::TerrainCleared).indent(1).hex(coords));
                ctx.effect(SideEffect::TerrainCleared(coords));
            }
        }
        TargetRef::Hex { coords, intent: HexIntent::Ignite } => {
            munition::attempt_ignition(coords, ctx, env)?;
            ignition_tried = true;
        }
    }

    if variant == Some(MunitionVariant::Tracer) {
        munition::illuminate(hex, ctx, env)?;
    }
    if !ignition_tried && ignites(ctx) {
        munition::attempt_ignition(hex, ctx, env)?;
    }
    Ok(())
}

fn ignites(ctx: &ResolutionContext) -> bool {
    ctx.weapon.profile.ignites || ctx.strategy.munition().is_some_and(MunitionVariant::ignites)
}

/// Miss branch: igniting weapons may still set the hex alight, and fire at a
/// unit inside a building may strike the building instead.
pub fn miss(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) -> Result<(), ResolutionError> {
    let hex = target_hex(ctx, env)?;
    if ignites(ctx) {
        munition::attempt_ignition(hex, ctx, env)?;
    }

    if ctx.declaration.target.entity().is_none() {
        return Ok(());
    }
    let Some(building) = env.board.building_at(hex) else {
        return Ok(());
    };
    let attacker_hex = env.entities.position(ctx.subject())?;
    if env
        .board
        .building_at(attacker_hex)
        .is_some_and(|own| own.id == building.id)
    {
        return Ok(());
    }

    let amount = ctx.weapon.profile.rated_damage().min(building.cf);
    if amount == 0 {
        return Ok(());
    }
    let remaining = env.board.damage_building(building.id, amount)?;
    ctx.push_report(
        ctx.entry(ReportId::AccidentalBuildingDamage)
            .indent(1)
            .building(building.id)
            .int(amount),
    );
    ctx.effect(SideEffect::BuildingDamaged {
        building: building.id,
        amount,
    });
    if remaining == 0 {
        ctx.push_report(
            ctx.entry(ReportId::BuildingCollapsed)
                .indent(2)
                .building(building.id),
        );
        ctx.effect(SideEffect::BuildingCollapsed(building.id));
    }
    Ok(())
}
