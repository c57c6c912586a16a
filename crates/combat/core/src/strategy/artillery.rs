//! Indirect and homing artillery.
//!
//! A round with a flight time is committed on declaration and persisted as an
//! [`ArtilleryFlight`]. The scheduler calls [`ArtilleryFlight::advance`] every
//! phase and hands the flight back to resolution once it is due.

use std::cmp::Ordering;

use tracing::debug;

use crate::attack::{AttackDeclaration, TargetRef};
use crate::config::RulesConfig;
use crate::damage::{AbsorptionPass, DamageRequest, apply_requests};
use crate::env::{CombatEnv, GuidanceTag};
use crate::error::ResolutionError;
use crate::report::ReportId;
use crate::resolve::{OutcomeStatus, ResolutionContext, SideEffect};
use crate::types::{AttackId, Coords, EntityId, PhaseInfo, PhaseKind};
use crate::weapon::{MountedWeapon, MunitionType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ArtilleryKind {
    Indirect,
    /// Guided onto a friendly TAG designation at impact.
    Homing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlightStatus {
    InFlight,
    Due,
}

// ============================================================================
// Persisted Flight
// ============================================================================

/// A committed artillery round waiting for impact.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtilleryFlight {
    pub attack_id: AttackId,
    pub declaration: AttackDeclaration,
    /// Snapshot of the launcher at declaration.
    pub weapon: MountedWeapon,
    pub munition: MunitionType,
    pub kind: ArtilleryKind,
    pub turns_remaining: u8,
    pub impact_phase: PhaseKind,
    pub declared_turn: u32,
    /// Turn of the last targeting phase that decremented the counter.
    pub last_advanced_turn: u32,
    /// Hex aimed at when the round was fired.
    pub target_point: Coords,
}

impl ArtilleryFlight {
    pub fn new(
        declaration: AttackDeclaration,
        weapon: MountedWeapon,
        munition: MunitionType,
        kind: ArtilleryKind,
        declared_turn: u32,
        target_point: Coords,
    ) -> Self {
        let impact_phase = if weapon.profile.offboard {
            PhaseKind::Offboard
        } else {
            PhaseKind::Targeting
        };
        Self {
            attack_id: declaration.id,
            turns_remaining: declaration.turns_to_impact,
            declaration,
            weapon,
            munition,
            kind,
            impact_phase,
            declared_turn,
            last_advanced_turn: declared_turn,
            target_point,
        }
    }

    pub fn attacker(&self) -> EntityId {
        self.declaration.attacker
    }

    /// Count down once per targeting phase after the declaration turn.
    pub fn advance(&mut self, phase: PhaseInfo) -> FlightStatus {
        let fresh_turn = phase.turn > self.declared_turn && phase.turn > self.last_advanced_turn;
        if phase.kind == PhaseKind::Targeting && fresh_turn && self.turns_remaining > 0 {
            self.turns_remaining -= 1;
            self.last_advanced_turn = phase.turn;
            debug!(
                target: "combat::artillery",
                attack = self.attack_id.0,
                turn = phase.turn,
                remaining = self.turns_remaining,
                "flight advanced"
            );
        }
        self.status(phase)
    }

    pub fn is_due(&self, phase: PhaseInfo) -> bool {
        self.turns_remaining == 0 && phase.kind == self.impact_phase
    }

    pub fn status(&self, phase: PhaseInfo) -> FlightStatus {
        if self.is_due(phase) {
            FlightStatus::Due
        } else {
            FlightStatus::InFlight
        }
    }
}

/// Hex the declaration aims at, resolved against current unit positions.
pub fn aim_point(target: &TargetRef, env: &CombatEnv<'_>) -> Result<Coords, ResolutionError> {
    match target {
        TargetRef::Entity(id) => Ok(env.entities.position(*id)?),
        TargetRef::Hex { coords, .. } => Ok(*coords),
    }
}

/// Persist a round with a flight time. The context becomes `Pending`.
pub fn schedule(ctx: &mut ResolutionContext, env: &CombatEnv<'_>) -> Result<(), ResolutionError> {
    let kind = ctx.strategy.artillery().unwrap_or(ArtilleryKind::Indirect);
    let target_point = aim_point(&ctx.declaration.target, env)?;
    let flight = ArtilleryFlight::new(
        ctx.declaration.clone(),
        ctx.weapon.clone(),
        ctx.munition,
        kind,
        env.phase.turn,
        target_point,
    );
    ctx.push_report(
        ctx.entry(ReportId::ArtilleryInFlight)
            .indent(1)
            .int(flight.turns_remaining),
    );
    ctx.effect(SideEffect::ArtilleryScheduled(Box::new(flight)));
    ctx.status = OutcomeStatus::Pending;
    Ok(())
}

// ============================================================================
// Homing Guidance
// ============================================================================

/// Tag a homing round should lock onto, if any.
///
/// Candidates are valid tags painted by non-hostile units on the same map
/// sheet within the search radius of `target_point`. The least used tag
/// relative to its priority wins; ties go to the nearest tag, then scan
/// order.
pub fn select_tag(
    attacker: EntityId,
    target_point: Coords,
    env: &CombatEnv<'_>,
) -> Option<GuidanceTag> {
    let sheet = env.board.sheet_of(target_point);
    env.board
        .guidance_tags()
        .into_iter()
        .filter(|tag| {
            tag.valid
                && !env.entities.is_enemy(attacker, tag.source)
                && env.board.sheet_of(tag.coords) == sheet
                && tag.coords.distance(target_point) <= RulesConfig::HOMING_SEARCH_RADIUS
        })
        .min_by(|a, b| {
            usage_cmp(a, b).then_with(|| {
                a.coords
                    .distance(target_point)
                    .cmp(&b.coords.distance(target_point))
            })
        })
}

/// Compare `shots / priority` without dividing.
fn usage_cmp(a: &GuidanceTag, b: &GuidanceTag) -> Ordering {
    let lhs = u64::from(a.shots) * u64::from(b.priority.max(1));
    let rhs = u64::from(b.shots) * u64::from(a.priority.max(1));
    lhs.cmp(&rhs)
}

/// Fix the impact aim point. Homing rounds lock onto a tag; with no tag the
/// attack becomes unresolvable, every tag counter is reset and `false` is
/// returned.
pub fn lock_target(
    target_point: Coords,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<bool, ResolutionError> {
    if ctx.strategy.artillery() != Some(ArtilleryKind::Homing) {
        ctx.impact_point = Some(target_point);
        return Ok(true);
    }

    match select_tag(ctx.subject(), target_point, env) {
        Some(tag) => {
            env.board.record_tag_shot(tag.id)?;
            ctx.effect(SideEffect::TagShotRecorded(tag.id));
            ctx.push_report(
                ctx.entry(ReportId::ArtilleryRetargeted)
                    .indent(1)
                    .hex(tag.coords),
            );
            ctx.impact_point = Some(tag.coords);
            Ok(true)
        }
        None => {
            env.board.reset_tag_shots();
            ctx.effect(SideEffect::TagShotsReset);
            ctx.push_report(ctx.entry(ReportId::NoTaggedTarget).indent(1));
            ctx.status = OutcomeStatus::Unresolvable;
            Ok(false)
        }
    }
}

// ============================================================================
// Impact
// ============================================================================

/// A miss scatters the round by the margin of failure; homing rounds are
/// simply lost.
pub fn miss(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) -> Result<(), ResolutionError> {
    if ctx.strategy.artillery() == Some(ArtilleryKind::Homing) {
        ctx.push_report(ctx.entry(ReportId::HomingRoundLost).indent(1));
        return Ok(());
    }
    let Some(aim) = ctx.impact_point else {
        return Err(ResolutionError::rule_violation(
            "artillery miss without an aim point",
        ));
    };

    let direction = env.rng.roll_d6().saturating_sub(1);
    let distance = ctx.margin.unsigned_abs().max(1);
    let landing = aim.translated(direction, distance);
    ctx.push_report(
        ctx.entry(ReportId::ArtilleryScatter)
            .indent(1)
            .int(distance)
            .hex(landing),
    );
    ctx.impact_point = Some(landing);
    impact(landing, ctx, env)
}

/// Resolve a hit at the locked aim point.
pub fn hit(ctx: &mut ResolutionContext, env: &mut CombatEnv<'_>) -> Result<(), ResolutionError> {
    let Some(point) = ctx.impact_point else {
        return Err(ResolutionError::rule_violation(
            "artillery hit without an aim point",
        ));
    };
    impact(point, ctx, env)
}

fn clusters(damage: u32) -> impl Iterator<Item = u32> {
    let size = RulesConfig::ARTILLERY_CLUSTER;
    (0..damage.div_ceil(size)).map(move |i| (damage - i * size).min(size))
}

/// Full damage at `point` and splash on each adjacent hex, every hex with its
/// own absorption pass.
fn impact(
    point: Coords,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    if !env.board.in_bounds(point) {
        ctx.push_report(ctx.entry(ReportId::ArtilleryOffBoard).indent(1).hex(point));
        return Ok(());
    }
    ctx.push_report(ctx.entry(ReportId::ArtilleryImpact).indent(1).hex(point));

    let damage = ctx.weapon.profile.rated_damage();
    let requests: Vec<_> = clusters(damage)
        .map(|amount| DamageRequest::hex(point, amount))
        .collect();
    ctx.hits_landed = requests.len() as u32;
    let mut pass = AbsorptionPass::open(point, env.board);
    apply_requests(&requests, &mut pass, env, ctx)?;

    let splash = ctx.weapon.profile.splash_damage;
    if splash == 0 {
        return Ok(());
    }
    for hex in point.ring() {
        if !env.board.in_bounds(hex) {
            continue;
        }
        ctx.push_report(
            ctx.entry(ReportId::SplashDamage)
                .indent(1)
                .hex(hex)
                .int(splash),
        );
        let requests: Vec<_> = clusters(splash)
            .map(|amount| DamageRequest::hex(hex, amount))
            .collect();
        let mut pass = AbsorptionPass::open(hex, env.board);
        apply_requests(&requests, &mut pass, env, ctx)?;
    }
    Ok(())
}
