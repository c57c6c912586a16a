//! The attack protocol state machine.
//!
//! [`ProtocolState::next`] is a pure transition function; [`run`] drives it,
//! executing one step per state and degrading the attack when a step fails.

use tracing::{trace, warn};

use super::{OutcomeStatus, ResolutionContext, SideEffect};
use crate::attack::{TargetRef, ToHitShortCircuit};
use crate::config::RulesConfig;
use crate::env::{CombatEnv, OracleError};
use crate::error::{CombatError, ConfigurationError, ResolutionError};
use crate::report::ReportId;
use crate::strategy::{Strategy, area, artillery, rapid_fire, standard, streak};
use crate::weapon::AmmoBin;

use super::context::AmmoDraw;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProtocolState {
    Init,
    AmmoCheck,
    HeatApplied,
    JamCheck,
    ToHitEvaluated,
    MissHandling,
    HitCount,
    DamageApplication,
    ReportFinalized,
    Done,
}

impl ProtocolState {
    /// The state after `self` has run against `ctx`.
    pub fn next(self, strategy: &Strategy, ctx: &ResolutionContext) -> ProtocolState {
        use ProtocolState::*;
        match self {
            Init if ctx.status == OutcomeStatus::Aborted => Done,
            Init if strategy.rolls_before_commit() => ToHitEvaluated,
            Init => AmmoCheck,
            AmmoCheck => HeatApplied,
            HeatApplied => match ctx.status {
                OutcomeStatus::Pending | OutcomeStatus::Unresolvable => ReportFinalized,
                _ if strategy.rapid_fire().is_some() => JamCheck,
                _ if ctx.to_hit_evaluated => HitCount,
                _ => ToHitEvaluated,
            },
            JamCheck if ctx.volley_lost => ReportFinalized,
            JamCheck => ToHitEvaluated,
            ToHitEvaluated if !ctx.hit => MissHandling,
            ToHitEvaluated if !ctx.committed => AmmoCheck,
            ToHitEvaluated => HitCount,
            MissHandling => ReportFinalized,
            HitCount => DamageApplication,
            DamageApplication => ReportFinalized,
            ReportFinalized | Done => Done,
        }
    }
}

/// Drive the protocol from `start` until [`ProtocolState::Done`].
///
/// A failing step before the commit point aborts the attack as a no-op.
/// After it the commit stands; the failure is recorded and the report is
/// still finalized.
pub fn run(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>, start: ProtocolState) {
    let mut state = start;
    while state != ProtocolState::Done {
        trace!(target: "combat::protocol", attack = ctx.attack_id().0, %state, "step");
        match step(state, ctx, env) {
            Ok(()) => state = state.next(&ctx.strategy, ctx),
            Err(err) => {
                let retry_finalize = ctx.committed && state != ProtocolState::ReportFinalized;
                degrade(ctx, state, err);
                state = if retry_finalize {
                    ProtocolState::ReportFinalized
                } else {
                    ProtocolState::Done
                };
            }
        }
    }
    let deferred = std::mem::take(&mut ctx.deferred);
    ctx.reports.extend(deferred);
}

fn degrade(ctx: &mut ResolutionContext, state: ProtocolState, err: ResolutionError) {
    warn!(
        target: "combat::protocol",
        attack = ctx.attack_id().0,
        %state,
        committed = ctx.committed,
        code = err.error_code(),
        severity = %err.severity().as_str(),
        error = %err,
        "attack degraded"
    );
    if ctx.committed {
        ctx.push_report(ctx.entry(ReportId::ResolutionFailed).text(err.to_string()));
    } else {
        ctx.status = OutcomeStatus::Aborted;
        ctx.push_report(ctx.entry(ReportId::AttackAborted).text(err.to_string()));
    }
    ctx.failure = Some(err);
}

fn step(
    state: ProtocolState,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    match state {
        ProtocolState::Init => init(ctx, env),
        ProtocolState::AmmoCheck => commit_ammo(ctx, env),
        ProtocolState::HeatApplied => apply_heat(ctx, env),
        ProtocolState::JamCheck => rapid_fire::check_jam(ctx, env),
        ProtocolState::ToHitEvaluated => {
            evaluate_to_hit(ctx, env);
            Ok(())
        }
        ProtocolState::MissHandling => match ctx.strategy {
            Strategy::Streak => {
                streak::no_lock(ctx, env);
                Ok(())
            }
            Strategy::Artillery(_) => artillery::miss(ctx, env),
            Strategy::Area(_) => Ok(()),
            _ => standard::miss(ctx, env),
        },
        ProtocolState::HitCount => match ctx.strategy {
            Strategy::Streak => {
                streak::hit_count(ctx);
                Ok(())
            }
            Strategy::Area(_) | Strategy::Artillery(_) => {
                ctx.hits_landed = 1;
                Ok(())
            }
            _ => standard::hit_count(ctx, env),
        },
        ProtocolState::DamageApplication => match ctx.strategy {
            Strategy::Area(profile) => area::apply(profile, ctx, env),
            Strategy::Artillery(_) => artillery::hit(ctx, env),
            _ => standard::apply_volley(ctx, env),
        },
        ProtocolState::ReportFinalized => {
            rapid_fire::finish_volley(ctx, env)?;
            let deferred = std::mem::take(&mut ctx.deferred);
            ctx.reports.extend(deferred);
            Ok(())
        }
        ProtocolState::Done => Ok(()),
    }
}

// ============================================================================
// Init: validation and ammunition planning
// ============================================================================

fn init(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) -> Result<(), ResolutionError> {
    let attacker = ctx.subject();
    if !env.entities.exists(attacker) || env.entities.is_destroyed(attacker) {
        return Err(ConfigurationError::AttackerUnavailable(attacker).into());
    }
    if !ctx.weapon.is_usable() {
        return Err(ConfigurationError::WeaponUnusable {
            weapon: ctx.weapon.id,
            status: ctx.weapon.status,
        }
        .into());
    }
    validate_target(ctx, env)?;

    ctx.push_report(
        ctx.entry(ReportId::AttackDeclared)
            .entity(attacker)
            .text(ctx.weapon.profile.name.clone())
            .text(ctx.declaration.target.to_string()),
    );

    if let Some(reason) = ctx.to_hit.impossible_reason() {
        let reason = reason.to_string();
        ctx.push_report(ctx.entry(ReportId::ToHitImpossible).indent(1).text(reason));
        ctx.status = OutcomeStatus::Aborted;
        return Ok(());
    }

    plan_ammo(ctx, env)
}

fn validate_target(ctx: &ResolutionContext, env: &CombatEnv<'_>) -> Result<(), ResolutionError> {
    let target = ctx.declaration.target;
    match target {
        TargetRef::Entity(id) => {
            if !env.entities.exists(id) {
                return Err(ResolutionError::invalid_target(target, "not on the board"));
            }
            if env.entities.is_destroyed(id) {
                return Err(ResolutionError::invalid_target(target, "already destroyed"));
            }
        }
        TargetRef::Hex { coords, .. } => {
            if matches!(ctx.strategy, Strategy::Area(_)) {
                return Err(ResolutionError::invalid_target(target, "area attacks need a unit"));
            }
            if !env.board.in_bounds(coords) {
                return Err(ResolutionError::invalid_target(target, "outside the map"));
            }
        }
    }
    Ok(())
}

/// Decide which bins feed the volley without touching them.
///
/// The loaded bin is drawn first while it matches the fired munition; when
/// it is dry (or holds something else) the first interchangeable bin with
/// rounds is loaded instead. A volley may span bins and shrinks to the
/// rounds available.
fn plan_ammo(ctx: &mut ResolutionContext, env: &CombatEnv<'_>) -> Result<(), ResolutionError> {
    let wanted = ctx.strategy.shots(ctx.declaration.mode);
    if !ctx.weapon.profile.family.requires_ammo() {
        ctx.shots_fired = wanted;
        return Ok(());
    }

    let attacker = ctx.subject();
    let weapon = ctx.weapon.id;
    let Some(loaded_id) = ctx.weapon.loaded_bin else {
        return Err(ConfigurationError::NoAmmoLoaded(weapon).into());
    };
    let bins = env.entities.ammo_bins(attacker)?;
    let Some(loaded) = bins.iter().find(|bin| bin.id == loaded_id) else {
        return Err(OracleError::BinNotFound {
            entity: attacker,
            bin: loaded_id,
        }
        .into());
    };

    let munition = ctx.munition;
    let compatible = |bin: &&AmmoBin| bin.feeds == loaded.feeds && bin.munitions == munition;
    let mut candidates: Vec<&AmmoBin> = bins.iter().filter(compatible).collect();
    if candidates.is_empty() {
        return Err(ConfigurationError::UnsupportedMunition {
            weapon,
            munition: format!("{munition:?}"),
        }
        .into());
    }
    // Loaded bin first, the rest in mount order.
    candidates.sort_by_key(|bin| bin.id != loaded_id);

    let loaded_usable = candidates
        .first()
        .is_some_and(|bin| bin.id == loaded_id && !bin.is_empty());
    if !loaded_usable {
        ctx.switch_to = candidates.iter().find(|bin| !bin.is_empty()).map(|bin| bin.id);
    }

    let mut need = wanted;
    ctx.ammo_plan.clear();
    for bin in candidates.iter().filter(|bin| !bin.is_empty()) {
        if need == 0 {
            break;
        }
        let rounds = bin.shots.min(need);
        ctx.ammo_plan.push(AmmoDraw { bin: bin.id, rounds });
        need -= rounds;
    }
    let drawn = wanted - need;
    if drawn == 0 {
        return Err(ConfigurationError::AmmoExhausted(weapon).into());
    }
    ctx.shots_fired = drawn;
    Ok(())
}

// ============================================================================
// Commit: ammunition and heat
// ============================================================================

fn commit_ammo(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let attacker = ctx.subject();
    let weapon = ctx.weapon.id;
    if let Some(bin) = ctx.switch_to.take() {
        env.entities.load_bin(attacker, weapon, bin)?;
        ctx.weapon.loaded_bin = Some(bin);
        ctx.push_report(
            ctx.entry(ReportId::AmmoSwitched)
                .indent(1)
                .text(ctx.weapon.profile.name.clone())
                .int(bin.0),
        );
        ctx.effect(SideEffect::AmmoBinSwitched {
            entity: attacker,
            weapon,
            bin,
        });
    }
    ctx.committed = true;

    let plan = std::mem::take(&mut ctx.ammo_plan);
    for draw in &plan {
        env.entities.consume_ammo(attacker, draw.bin, draw.rounds)?;
        ctx.effect(SideEffect::AmmoConsumed {
            entity: attacker,
            bin: draw.bin,
            rounds: draw.rounds,
        });
    }
    ctx.ammo_plan = plan;
    Ok(())
}

fn apply_heat(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) -> Result<(), ResolutionError> {
    let attacker = ctx.subject();
    let heat = ctx.weapon.profile.heat * ctx.shots_fired;
    if heat > 0 {
        env.entities.add_heat(attacker, heat)?;
        ctx.effect(SideEffect::HeatGenerated {
            entity: attacker,
            heat,
        });
    }

    if ctx.strategy.artillery().is_some() {
        if ctx.declaration.turns_to_impact > 0 {
            artillery::schedule(ctx, env)?;
        } else {
            let aim = artillery::aim_point(&ctx.declaration.target, env)?;
            artillery::lock_target(aim, ctx, env)?;
        }
    }
    Ok(())
}

// ============================================================================
// To-hit
// ============================================================================

fn evaluate_to_hit(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) {
    ctx.to_hit_evaluated = true;
    let target = ctx.to_hit.value;

    match ctx.to_hit.short_circuit.clone() {
        Some(ToHitShortCircuit::Impossible(reason)) => {
            ctx.push_report(ctx.entry(ReportId::ToHitImpossible).indent(1).text(reason));
            ctx.hit = false;
        }
        Some(ToHitShortCircuit::AutomaticFail(reason)) => {
            ctx.push_report(ctx.entry(ReportId::ToHitAutoFail).indent(1).text(reason));
            ctx.hit = false;
        }
        Some(ToHitShortCircuit::AutomaticSuccess(reason)) => {
            ctx.push_report(ctx.entry(ReportId::ToHitAutoSuccess).indent(1).text(reason));
            ctx.hit = true;
        }
        None => {
            let roll = env.rng.roll_two_dice();
            ctx.roll = Some(roll);
            ctx.hit = i32::from(roll) >= target;
            ctx.margin = i32::from(roll) - target.max(RulesConfig::MIN_TARGET);
            ctx.glancing = env.rules.glancing_blows && ctx.hit && i32::from(roll) == target;
            ctx.direct_blow = env.rules.direct_blow && ctx.margin / 3 >= 1;
            ctx.push_report(
                ctx.entry(ReportId::ToHitRoll)
                    .indent(1)
                    .int(target)
                    .int(roll),
            );
        }
    }

    let verdict = if ctx.hit { ReportId::Hit } else { ReportId::Miss };
    ctx.push_report(ctx.entry(verdict).indent(1));
    if ctx.glancing {
        ctx.push_report(ctx.entry(ReportId::GlancingBlow).indent(1));
    }
    if ctx.direct_blow {
        ctx.push_report(ctx.entry(ReportId::DirectBlow).indent(1).int(ctx.margin / 3));
    }
}
