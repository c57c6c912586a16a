use tracing::debug;

use super::critical::{CriticalEffect, CriticalTrigger, critical_effect};
use super::location::{roll_location, roll_swarm_location};
use super::{AbsorptionPass, CriticalRule, DamageEvent, DamageRequest, DamageTarget, LocationSpec};
use crate::env::CombatEnv;
use crate::error::ResolutionError;
use crate::report::ReportId;
use crate::resolve::{ResolutionContext, SideEffect};
use crate::types::{EntityId, EntityKind, HitData};

/// Critical modifier for armor-piercing rounds, by the weapon's damage.
pub const fn armor_piercing_modifier(damage: u32) -> i32 {
    match damage {
        0..=2 => -4,
        3..=5 => -3,
        6..=10 => -2,
        _ => -1,
    }
}

/// Apply `requests` in order through one absorption pass.
///
/// The building absorbs before any unit is touched and remainders never go
/// negative. Realized events, reports and side effects are appended to `ctx`.
pub fn apply_requests(
    requests: &[DamageRequest],
    pass: &mut AbsorptionPass,
    env: &mut CombatEnv<'_>,
    ctx: &mut ResolutionContext,
) -> Result<(), ResolutionError> {
    for request in requests {
        apply_request(request, pass, env, ctx)?;
    }
    Ok(())
}

fn apply_request(
    request: &DamageRequest,
    pass: &mut AbsorptionPass,
    env: &mut CombatEnv<'_>,
    ctx: &mut ResolutionContext,
) -> Result<(), ResolutionError> {
    let absorption = pass.absorb(request.amount, env.board)?;
    if let Some(building) = absorption.building {
        ctx.push_report(
            ctx.entry(ReportId::DamageAbsorbed)
                .indent(2)
                .building(building)
                .int(absorption.absorbed),
        );
        ctx.effect(SideEffect::BuildingDamaged {
            building,
            amount: absorption.absorbed,
        });
        if absorption.collapsed {
            ctx.push_report(
                ctx.entry(ReportId::BuildingCollapsed)
                    .indent(2)
                    .building(building),
            );
            ctx.effect(SideEffect::BuildingCollapsed(building));
        }
    }

    let remaining = request.amount.saturating_sub(absorption.absorbed);
    let mut event = DamageEvent {
        target: request.target,
        location: None,
        requested: request.amount,
        absorbed: absorption.absorbed,
        absorbed_by: absorption.building,
        applied: 0,
        criticals: Vec::new(),
    };

    if remaining == 0 {
        ctx.damage_events.push(event);
        return Ok(());
    }

    let Some(entity) = struck_entity(request.target, env) else {
        let coords = match request.target {
            DamageTarget::Hex(coords) => coords,
            DamageTarget::Entity(_) => pass.hex(),
        };
        ctx.push_report(
            ctx.entry(ReportId::DamageDiscarded)
                .indent(2)
                .int(remaining)
                .hex(coords),
        );
        ctx.damage_events.push(event);
        return Ok(());
    };

    let kind = env.entities.kind(entity)?;
    let hit = match request.location {
        LocationSpec::Roll(side) => roll_location(kind, side, env.rng, env.rules),
        LocationSpec::Swarm => roll_swarm_location(kind, env.rng),
        LocationSpec::Fixed(hit) => hit,
    };

    event.target = DamageTarget::Entity(entity);
    event.location = Some(hit);
    event.applied = damage_entity(
        entity,
        kind,
        hit,
        remaining,
        request.critical,
        env,
        ctx,
        &mut event.criticals,
    )?;
    debug!(
        target: "combat::damage",
        entity = entity.0,
        location = %hit,
        requested = request.amount,
        absorbed = absorption.absorbed,
        applied = event.applied,
        "damage applied"
    );
    ctx.damage_events.push(event);
    Ok(())
}

/// First unit standing in a hex request, or the named unit if it survives.
fn struck_entity(target: DamageTarget, env: &CombatEnv<'_>) -> Option<EntityId> {
    match target {
        DamageTarget::Entity(id) => (!env.entities.is_destroyed(id)).then_some(id),
        DamageTarget::Hex(coords) => env
            .entities
            .entities_at(coords)
            .into_iter()
            .find(|id| !env.entities.is_destroyed(*id)),
    }
}

/// Armor, then internal structure, then inward transfer. Returns the damage
/// actually absorbed by the unit.
#[allow(clippy::too_many_arguments)]
fn damage_entity(
    entity: EntityId,
    kind: EntityKind,
    first_hit: HitData,
    amount: u32,
    rule: CriticalRule,
    env: &mut CombatEnv<'_>,
    ctx: &mut ResolutionContext,
    criticals: &mut Vec<CriticalTrigger>,
) -> Result<u32, ResolutionError> {
    let mut hit = first_hit;
    let mut remaining = amount;
    let mut applied = 0;
    let mut first_location = true;

    while remaining > 0 {
        let location = hit.location;
        if env.entities.is_location_destroyed(entity, location) {
            match location.transfer() {
                Some(next) => {
                    hit = HitData::new(next).rear(hit.rear);
                    continue;
                }
                None => break,
            }
        }

        let armor = env.entities.armor(entity, location, hit.rear)?;
        let to_armor = armor.min(remaining);
        if to_armor > 0 {
            env.entities
                .set_armor(entity, location, hit.rear, armor - to_armor)?;
        }
        remaining -= to_armor;

        let mut to_internal = 0;
        let mut location_destroyed = false;
        if remaining > 0 {
            let internal = env.entities.internal(entity, location)?;
            to_internal = internal.min(remaining);
            env.entities
                .set_internal(entity, location, internal - to_internal)?;
            remaining -= to_internal;
            location_destroyed = internal == to_internal;
        }

        let dealt = to_armor + to_internal;
        applied += dealt;
        if dealt > 0 {
            ctx.push_report(
                ctx.entry(ReportId::DamageApplied)
                    .indent(2)
                    .entity(entity)
                    .int(dealt)
                    .location(hit),
            );
        }

        if location_destroyed {
            env.entities.destroy_location(entity, location)?;
            ctx.push_report(
                ctx.entry(ReportId::LocationDestroyed)
                    .indent(2)
                    .entity(entity)
                    .location(hit),
            );
            ctx.effect(SideEffect::LocationDestroyed { entity, location });
            if location.is_vital() || kind != EntityKind::Mech {
                destroy_entity(entity, env, ctx)?;
                break;
            }
        } else if kind != EntityKind::Infantry {
            let modifier = match rule {
                CriticalRule::ArmorPiercing(m) if first_location => Some(m),
                CriticalRule::Always if first_location => Some(0),
                _ if to_internal > 0 => Some(0),
                _ if first_location && hit.through_armor_critical => Some(0),
                _ => None,
            };
            if let Some(modifier) = modifier {
                let destroyed = roll_critical(entity, hit, modifier, env, ctx, criticals)?;
                if destroyed {
                    break;
                }
            }
        }

        match location.transfer() {
            Some(next) if remaining > 0 && location_destroyed => {
                ctx.push_report(
                    ctx.entry(ReportId::DamageTransferred)
                        .indent(2)
                        .int(remaining)
                        .location(HitData::new(next)),
                );
                hit = HitData::new(next).rear(hit.rear);
                first_location = false;
            }
            _ => break,
        }
    }

    Ok(applied)
}

/// Roll for critical effects and apply them. Returns `true` if the unit was
/// destroyed.
fn roll_critical(
    entity: EntityId,
    hit: HitData,
    modifier: i32,
    env: &mut CombatEnv<'_>,
    ctx: &mut ResolutionContext,
    criticals: &mut Vec<CriticalTrigger>,
) -> Result<bool, ResolutionError> {
    let roll = env.rng.roll_two_dice();
    let Some(effect) = critical_effect(hit.location, roll, modifier) else {
        return Ok(false);
    };

    let trigger = CriticalTrigger {
        entity,
        location: hit.location,
        roll,
        modifier,
        effect,
    };
    criticals.push(trigger);
    ctx.effect(SideEffect::CriticalTriggered(trigger));

    match effect {
        CriticalEffect::Slots(count) => {
            for _ in 0..count {
                env.entities.apply_critical(entity, hit.location)?;
            }
            ctx.push_report(
                ctx.entry(ReportId::CriticalTriggered)
                    .indent(3)
                    .int(i32::from(roll) + modifier)
                    .int(count)
                    .location(hit),
            );
            Ok(false)
        }
        CriticalEffect::LimbBlownOff => {
            env.entities.destroy_location(entity, hit.location)?;
            ctx.push_report(ctx.entry(ReportId::LimbBlownOff).indent(3).location(hit));
            ctx.effect(SideEffect::LocationDestroyed {
                entity,
                location: hit.location,
            });
            Ok(false)
        }
        CriticalEffect::HeadDestroyed => {
            env.entities.destroy_location(entity, hit.location)?;
            ctx.push_report(
                ctx.entry(ReportId::LocationDestroyed)
                    .indent(3)
                    .entity(entity)
                    .location(hit),
            );
            ctx.effect(SideEffect::LocationDestroyed {
                entity,
                location: hit.location,
            });
            destroy_entity(entity, env, ctx)?;
            Ok(true)
        }
    }
}

fn destroy_entity(
    entity: EntityId,
    env: &mut CombatEnv<'_>,
    ctx: &mut ResolutionContext,
) -> Result<(), ResolutionError> {
    if env.entities.is_destroyed(entity) {
        return Ok(());
    }
    env.entities.destroy_entity(entity)?;
    ctx.push_report(ctx.entry(ReportId::EntityDestroyed).indent(2).entity(entity));
    ctx.effect(SideEffect::EntityDestroyed(entity));
    Ok(())
}
