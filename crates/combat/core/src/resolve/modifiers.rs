//! Cluster roll modifiers.
//!
//! Assembled in a fixed order: range bracket, Artemis IV, Narc, planetary
//! EMI, flak, direct blow, glancing blow, and anti-missile fire last.

use crate::config::RulesConfig;
use crate::env::CombatEnv;
use crate::report::ReportId;
use crate::strategy::MunitionVariant;
use crate::weapon::MunitionType;

use super::ResolutionContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ModifierSource {
    Range,
    Artemis,
    Narc,
    Emi,
    Flak,
    DirectBlow,
    GlancingBlow,
    Ams,
}

/// A named contribution to the cluster roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterModifier {
    pub source: ModifierSource,
    pub value: i32,
}

impl ClusterModifier {
    pub const fn new(source: ModifierSource, value: i32) -> Self {
        Self { source, value }
    }
}

fn push(ctx: &mut ResolutionContext, source: ModifierSource, value: i32) {
    ctx.modifiers.push(ClusterModifier::new(source, value));
    ctx.push_report(
        ctx.entry(ReportId::ClusterModifier)
            .indent(1)
            .text(source.as_ref())
            .int(value),
    );
}

/// Assemble every modifier except anti-missile fire, reporting each one and
/// each denied bonus.
pub fn assemble(ctx: &mut ResolutionContext, env: &CombatEnv<'_>) {
    let attacker = ctx.subject();
    let target = ctx.declaration.target.entity();
    let family = ctx.weapon.profile.family;

    let range = ctx.weapon.profile.cluster_range_modifiers[ctx.to_hit.range as usize];
    if range != 0 {
        push(ctx, ModifierSource::Range, range);
    }

    if ctx.weapon.artemis_linked && ctx.munition.contains(MunitionType::ARTEMIS_CAPABLE) {
        if env.entities.is_ecm_affected(attacker) {
            ctx.push_report(ctx.entry(ReportId::ArtemisDeniedEcm).indent(1));
        } else if target.is_some_and(|t| env.entities.stealth_active(t)) {
            ctx.push_report(ctx.entry(ReportId::ArtemisDeniedStealth).indent(1));
        } else {
            push(ctx, ModifierSource::Artemis, RulesConfig::ARTEMIS_BONUS);
        }
    }

    if ctx.munition.contains(MunitionType::NARC_CAPABLE)
        && target.is_some_and(|t| env.entities.narc_tagged(t))
    {
        if env.entities.is_ecm_affected(attacker) {
            ctx.push_report(ctx.entry(ReportId::NarcDeniedEcm).indent(1));
        } else {
            push(ctx, ModifierSource::Narc, RulesConfig::NARC_BONUS);
        }
    }

    if family.is_guided() && env.board.emi_active() {
        push(ctx, ModifierSource::Emi, RulesConfig::EMI_PENALTY);
    }

    if ctx.strategy.munition() == Some(MunitionVariant::Flak)
        && target.is_some_and(|t| env.entities.is_airborne(t))
    {
        push(ctx, ModifierSource::Flak, RulesConfig::FLAK_BONUS);
    }

    if ctx.direct_blow {
        push(ctx, ModifierSource::DirectBlow, ctx.margin / 3);
    }

    if ctx.glancing {
        push(ctx, ModifierSource::GlancingBlow, RulesConfig::GLANCING_PENALTY);
    }
}
