//! Fixed damage profiles: minefields, leg attacks and swarm attacks.
//!
//! None of these consult the cluster table; the whole rated damage lands on
//! a hit and the profile decides how it is split across locations.

use crate::config::RulesConfig;
use crate::damage::location::roll_leg;
use crate::damage::{AbsorptionPass, CriticalRule, DamageRequest, LocationSpec, apply_requests};
use crate::env::{CombatEnv, RandomSource};
use crate::error::ResolutionError;
use crate::resolve::ResolutionContext;
use crate::types::{EntityId, EntityKind, HitData, Location};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AreaProfile {
    Minefield,
    LegAttack,
    Swarm,
}

/// Damage requests for `damage` points against `target`.
pub fn requests(
    profile: AreaProfile,
    target: EntityId,
    kind: EntityKind,
    damage: u32,
    rng: &mut dyn RandomSource,
) -> Vec<DamageRequest> {
    match profile {
        AreaProfile::Minefield => minefield_groups(damage)
            .enumerate()
            .map(|(index, amount)| {
                let location = match kind {
                    EntityKind::Mech if index % 2 == 0 => Location::LeftLeg,
                    EntityKind::Mech => Location::RightLeg,
                    EntityKind::Vehicle => Location::Front,
                    EntityKind::Infantry => Location::Troopers,
                };
                DamageRequest::entity(target, amount, LocationSpec::Fixed(HitData::new(location)))
            })
            .collect(),
        AreaProfile::LegAttack => {
            let leg = roll_leg(kind, rng);
            vec![
                DamageRequest::entity(target, damage, LocationSpec::Fixed(leg))
                    .with_critical(CriticalRule::Always),
            ]
        }
        AreaProfile::Swarm => vec![DamageRequest::entity(target, damage, LocationSpec::Swarm)],
    }
}

fn minefield_groups(damage: u32) -> impl Iterator<Item = u32> {
    let size = RulesConfig::MINEFIELD_CLUSTER;
    (0..damage.div_ceil(size)).map(move |i| (damage - i * size).min(size))
}

/// Land the profile's damage on the declared target.
pub fn apply(
    profile: AreaProfile,
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let Some(target) = ctx.declaration.target.entity() else {
        return Err(ResolutionError::invalid_target(
            ctx.declaration.target,
            "area attacks need a unit target",
        ));
    };
    let kind = env.entities.kind(target)?;
    let position = env.entities.position(target)?;
    let damage = ctx.weapon.profile.rated_damage();
    let requests = requests(profile, target, kind, damage, env.rng);
    let mut pass = AbsorptionPass::none(position);
    apply_requests(&requests, &mut pass, env, ctx)
}
