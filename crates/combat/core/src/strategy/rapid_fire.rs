//! Ultra, rotary and rapid-fire autocannons.
//!
//! Multi-shot volleys roll one jam check after ammunition and heat are
//! committed. The roll is independent of the to-hit roll.

use tracing::debug;

use crate::damage::{AbsorptionPass, DamageRequest, LocationSpec, apply_requests};
use crate::env::CombatEnv;
use crate::error::ResolutionError;
use crate::report::ReportId;
use crate::resolve::{ResolutionContext, SideEffect};
use crate::types::HitData;
use crate::weapon::WeaponStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RapidFireKind {
    Ultra,
    Rotary,
    /// Standard autocannon fired in rapid-fire mode.
    RapidAutocannon,
}

/// Unmodified 2d6 jam roll thresholds; `0` means the result cannot happen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JamThresholds {
    /// Jams on this roll or less.
    pub jam_on: u8,
    /// Explodes on this roll or less.
    pub destroy_on: u8,
}

struct JamRow {
    kind: RapidFireKind,
    shots: (u32, u32),
    thresholds: JamThresholds,
}

const fn row(kind: RapidFireKind, min: u32, max: u32, jam_on: u8, destroy_on: u8) -> JamRow {
    JamRow {
        kind,
        shots: (min, max),
        thresholds: JamThresholds { jam_on, destroy_on },
    }
}

const JAM_TABLE: [JamRow; 5] = [
    row(RapidFireKind::Ultra, 2, 2, 2, 0),
    row(RapidFireKind::Rotary, 2, 3, 2, 0),
    row(RapidFireKind::Rotary, 4, 5, 3, 0),
    row(RapidFireKind::Rotary, 6, 6, 4, 2),
    row(RapidFireKind::RapidAutocannon, 2, 2, 0, 4),
];

/// Kind rapid fire caps every threshold at this roll.
const KIND_RAPID_FIRE_CAP: u8 = 2;

/// Thresholds for a volley, or `None` when the volley never rolls.
pub fn jam_thresholds(
    kind: RapidFireKind,
    shots: u32,
    kind_rapid_fire: bool,
) -> Option<JamThresholds> {
    let row = JAM_TABLE
        .iter()
        .find(|row| row.kind == kind && (row.shots.0..=row.shots.1).contains(&shots))?;
    let mut thresholds = row.thresholds;
    if kind_rapid_fire {
        thresholds.jam_on = thresholds.jam_on.min(KIND_RAPID_FIRE_CAP);
        thresholds.destroy_on = thresholds.destroy_on.min(KIND_RAPID_FIRE_CAP);
    }
    Some(thresholds)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum JamResult {
    Clear,
    Jammed,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JamCheck {
    pub roll: u8,
    pub result: JamResult,
}

impl JamThresholds {
    pub fn classify(&self, roll: u8) -> JamResult {
        if roll <= self.destroy_on {
            JamResult::Destroyed
        } else if roll <= self.jam_on {
            JamResult::Jammed
        } else {
            JamResult::Clear
        }
    }
}

/// Roll the jam check for the committed volley.
///
/// A destroyed weapon is marked at once, deals its rated damage to its own
/// mount location and loses the volley. A jam only takes effect once the
/// volley has resolved (see [`finish_volley`]).
pub fn check_jam(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    let Some(kind) = ctx.strategy.rapid_fire() else {
        return Ok(());
    };
    let Some(thresholds) = jam_thresholds(kind, ctx.shots_fired, env.rules.kind_rapid_fire) else {
        return Ok(());
    };

    let roll = env.rng.roll_two_dice();
    let result = thresholds.classify(roll);
    ctx.jam = Some(JamCheck { roll, result });
    debug!(
        target: "combat::rapid_fire",
        attack = ctx.attack_id().0,
        shots = ctx.shots_fired,
        roll,
        %result,
        "jam check"
    );

    let attacker = ctx.subject();
    let weapon = ctx.weapon.id;
    let roll_entry = ctx.entry(ReportId::JamCheckRoll).indent(1).int(roll);
    match result {
        JamResult::Clear | JamResult::Jammed => ctx.defer_report(roll_entry),
        JamResult::Destroyed => {
            ctx.push_report(roll_entry);
            env.entities
                .set_weapon_status(attacker, weapon, WeaponStatus::Destroyed)?;
            ctx.push_report(
                ctx.entry(ReportId::WeaponDestroyed)
                    .indent(1)
                    .text(ctx.weapon.profile.name.clone()),
            );
            ctx.effect(SideEffect::WeaponDestroyed {
                entity: attacker,
                weapon,
            });
            ctx.volley_lost = true;
            ctx.hit = false;

            let position = env.entities.position(attacker)?;
            let self_damage = DamageRequest::entity(
                attacker,
                ctx.weapon.profile.rated_damage(),
                LocationSpec::Fixed(HitData::new(ctx.weapon.location)),
            );
            apply_requests(
                &[self_damage],
                &mut AbsorptionPass::none(position),
                env,
                ctx,
            )?;
        }
    }
    Ok(())
}

/// Apply a pending jam after the volley.
pub fn finish_volley(
    ctx: &mut ResolutionContext,
    env: &mut CombatEnv<'_>,
) -> Result<(), ResolutionError> {
    if !matches!(ctx.jam, Some(JamCheck { result: JamResult::Jammed, .. })) {
        return Ok(());
    }
    let attacker = ctx.subject();
    let weapon = ctx.weapon.id;
    env.entities
        .set_weapon_status(attacker, weapon, WeaponStatus::Jammed)?;
    ctx.defer_report(
        ctx.entry(ReportId::WeaponJammed)
            .indent(1)
            .text(ctx.weapon.profile.name.clone()),
    );
    ctx.effect(SideEffect::WeaponJammed {
        entity: attacker,
        weapon,
    });
    Ok(())
}
