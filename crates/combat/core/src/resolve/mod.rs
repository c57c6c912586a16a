//! Attack resolution entry points.
//!
//! [`resolve`] runs a freshly declared attack through the protocol;
//! [`resolve_artillery`] lands a round that has finished its flight. Both
//! return a [`ResolutionOutcome`] and never an error: failures degrade the
//! single attack and are recorded in the outcome.
mod context;
pub mod modifiers;
mod outcome;
mod protocol;

pub use context::{AmmoDraw, ResolutionContext};
pub use modifiers::{ClusterModifier, ModifierSource};
pub use outcome::{OutcomeStatus, ResolutionOutcome, SideEffect};
pub use protocol::{ProtocolState, run};

use tracing::debug;

use crate::attack::{AttackDeclaration, ToHitResult};
use crate::env::CombatEnv;
use crate::error::{ConfigurationError, ResolutionError};
use crate::report::{ReportEntry, ReportId};
use crate::strategy::{self, ArtilleryFlight, SelectionError, Strategy, artillery};
use crate::weapon::{MountedWeapon, MunitionType};

/// Resolve one declared weapon attack.
pub fn resolve(
    declaration: &AttackDeclaration,
    to_hit: &ToHitResult,
    env: &mut CombatEnv<'_>,
) -> ResolutionOutcome {
    let (weapon, loaded) = match lookup_weapon(declaration, env) {
        Ok(found) => found,
        Err(err) => {
            let entry = ReportEntry::new(ReportId::AttackAborted, declaration.attacker)
                .text(err.to_string());
            return aborted(declaration, entry, err);
        }
    };

    let selected = strategy::select(weapon.id, weapon.profile.family, loaded, declaration.mode);
    let strategy = match selected {
        Ok(strategy) => strategy,
        Err(SelectionError::NoAmmoLoaded(id)) => {
            let entry = ReportEntry::new(ReportId::NoAmmoLoaded, declaration.attacker)
                .text(weapon.profile.name.clone());
            let err = ResolutionError::from(ConfigurationError::NoAmmoLoaded(id));
            return aborted(declaration, entry, err);
        }
    };

    let mut ctx = ResolutionContext::new(declaration.clone(), to_hit.clone(), strategy, weapon);
    if let Some(munition) = loaded {
        ctx.munition = munition;
    }
    run(&mut ctx, env, ProtocolState::Init);
    finish(ctx)
}

/// Land an artillery round whose flight is over.
///
/// The commit happened at declaration, so the attack starts at the to-hit
/// roll. A flight that is not due yet is refused without touching anything.
pub fn resolve_artillery(
    flight: &ArtilleryFlight,
    to_hit: &ToHitResult,
    env: &mut CombatEnv<'_>,
) -> ResolutionOutcome {
    if !flight.is_due(env.phase) {
        let err = ResolutionError::rule_violation(format!(
            "round {} is not due in the {} phase",
            flight.attack_id, env.phase.kind
        ));
        let entry = ReportEntry::new(ReportId::AttackAborted, flight.attacker())
            .text(err.to_string());
        return aborted(&flight.declaration, entry, err);
    }

    let strategy = Strategy::Artillery(flight.kind);
    let mut ctx = ResolutionContext::new(
        flight.declaration.clone(),
        to_hit.clone(),
        strategy,
        flight.weapon.clone(),
    );
    ctx.munition = flight.munition;
    ctx.committed = true;
    ctx.shots_fired = 1;

    match artillery::lock_target(flight.target_point, &mut ctx, env) {
        Ok(true) => run(&mut ctx, env, ProtocolState::ToHitEvaluated),
        Ok(false) => {}
        Err(err) => {
            ctx.push_report(ctx.entry(ReportId::ResolutionFailed).text(err.to_string()));
            ctx.failure = Some(err);
        }
    }
    finish(ctx)
}

fn lookup_weapon(
    declaration: &AttackDeclaration,
    env: &CombatEnv<'_>,
) -> Result<(MountedWeapon, Option<MunitionType>), ResolutionError> {
    let weapon = env.entities.weapon(declaration.attacker, declaration.weapon)?;
    let loaded = match weapon.loaded_bin {
        None => None,
        Some(_) if declaration.munition.is_some() => declaration.munition,
        Some(bin) => {
            let bins = env.entities.ammo_bins(declaration.attacker)?;
            bins.iter()
                .find(|b| b.id == bin)
                .map(|b| b.munitions)
                .or(Some(MunitionType::STANDARD))
        }
    };
    Ok((weapon, loaded))
}

fn aborted(
    declaration: &AttackDeclaration,
    entry: ReportEntry,
    err: ResolutionError,
) -> ResolutionOutcome {
    debug!(
        target: "combat::resolve",
        attack = declaration.id.0,
        error = %err,
        "attack aborted before commit"
    );
    ResolutionOutcome {
        attack_id: declaration.id,
        status: OutcomeStatus::Aborted,
        hit: false,
        hits_landed: 0,
        damage_events: Vec::new(),
        reports: vec![entry],
        side_effects: Vec::new(),
        failure: Some(err),
    }
}

fn finish(ctx: ResolutionContext) -> ResolutionOutcome {
    let outcome = ctx.into_outcome();
    debug!(
        target: "combat::resolve",
        attack = outcome.attack_id.0,
        status = %outcome.status,
        hit = outcome.hit,
        hits = outcome.hits_landed,
        damage = outcome.total_damage_applied(),
        "attack resolved"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{HexIntent, TargetRef};
    use crate::config::RulesConfig;
    use crate::error::CombatError;
    use crate::testing::Fixture;
    use crate::types::{BinId, Coords, EntityId, Location, PhaseInfo, PhaseKind, WeaponId};
    use crate::weapon::{AmmoBin, AmsMount, FireMode, WeaponFamily, WeaponProfile, WeaponStatus};

    fn ac5() -> WeaponProfile {
        WeaponProfile::new("AC/5", WeaponFamily::Autocannon, 5).with_heat(1)
    }

    fn report_ids(outcome: &ResolutionOutcome) -> Vec<ReportId> {
        outcome.reports.iter().map(|r| r.id).collect()
    }

    fn enemy(fx: &mut Fixture) -> EntityId {
        fx.mech(2, Coords::new(3, 0))
    }

    // ===== direct fire =====

    #[test]
    fn autocannon_hit_lands_one_cluster_and_commits_ammo_and_heat() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([9, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Resolved);
        assert!(outcome.hit);
        assert_eq!(outcome.hits_landed, 1);
        assert_eq!(outcome.total_damage_applied(), 5);
        assert_eq!(fx.roster.armor_of(target, Location::CenterTorso, false), 5);
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 9);
        assert_eq!(fx.roster.heat_of(fx.attacker), 1);
        assert_eq!(
            report_ids(&outcome),
            vec![
                ReportId::AttackDeclared,
                ReportId::ToHitRoll,
                ReportId::Hit,
                ReportId::DamageApplied
            ]
        );
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn impossible_shot_aborts_without_mutation() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::impossible("no line of sight"));

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert!(outcome.side_effects.is_empty());
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 10);
        assert_eq!(fx.roster.heat_of(fx.attacker), 0);
        assert_eq!(
            report_ids(&outcome),
            vec![ReportId::AttackDeclared, ReportId::ToHitImpossible]
        );
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn missing_ammo_aborts_with_a_diagnostic() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert_eq!(report_ids(&outcome), vec![ReportId::NoAmmoLoaded]);
        let failure = outcome.failure.expect("failure recorded");
        assert_eq!(failure.error_code(), "CONFIG_NO_AMMO_LOADED");
    }

    #[test]
    fn destroyed_target_is_rejected_before_commit() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        fx.roster.unit_mut(target).destroyed = true;
        let weapon = fx.arm(ac5());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert!(matches!(
            outcome.failure,
            Some(ResolutionError::InvalidTarget { .. })
        ));
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 10);
    }

    #[test]
    fn dry_bin_switches_to_an_interchangeable_one() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        let dry = fx.load(weapon, MunitionType::STANDARD, 0);
        let spare = fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([4]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(!outcome.hit);
        assert_eq!(fx.roster.shots_in(fx.attacker, dry), 0);
        assert_eq!(fx.roster.shots_in(fx.attacker, spare), 9);
        assert!(outcome.side_effects.contains(&SideEffect::AmmoBinSwitched {
            entity: fx.attacker,
            weapon,
            bin: spare,
        }));
        assert_eq!(
            fx.roster.unit(fx.attacker).weapons[0].loaded_bin,
            Some(spare)
        );
    }

    #[test]
    fn exhausted_ammo_is_a_configuration_error_before_commit() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::STANDARD, 0);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert_eq!(
            outcome.failure,
            Some(ResolutionError::Configuration(
                ConfigurationError::AmmoExhausted(weapon)
            ))
        );
        assert_eq!(fx.roster.heat_of(fx.attacker), 0);
    }

    #[test]
    fn miss_into_a_building_damages_it() {
        let mut fx = Fixture::new();
        let hex = Coords::new(4, 4);
        let target = fx.mech(2, hex);
        fx.board.add_building(hex, 40);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([5]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(!outcome.hit);
        assert_eq!(fx.board.building_cf(hex), Some(35));
        assert!(report_ids(&outcome).contains(&ReportId::AccidentalBuildingDamage));
    }

    #[test]
    fn cluster_rounds_into_a_building_hex_absorb_before_the_occupant() {
        let mut fx = Fixture::new();
        fx.rules = RulesConfig::new().with_all_shots_hit();
        let hex = Coords::new(5, 5);
        fx.board.add_building(hex, 40);
        let occupant = fx.mech(2, hex);
        let weapon = fx.arm(WeaponProfile::new("AC/9", WeaponFamily::Autocannon, 9));
        fx.load(weapon, MunitionType::CLUSTER, 5);
        // to-hit, then one location roll per point that gets through
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 7, 7, 7, 7]);

        let target = TargetRef::Hex {
            coords: hex,
            intent: HexIntent::Strike,
        };
        let decl = fx.declare(weapon, target);
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        let absorbed: u32 = outcome.damage_events.iter().map(|e| e.absorbed).sum();
        assert_eq!(outcome.hits_landed, 9);
        assert_eq!(absorbed, 4);
        assert_eq!(outcome.total_damage_applied(), 5);
        assert_eq!(fx.board.building_cf(hex), Some(36));
        assert_eq!(fx.roster.armor_of(occupant, Location::CenterTorso, false), 5);
        assert_eq!(fx.dice.overruns(), 0);
    }

    // ===== streak =====

    fn streak() -> WeaponProfile {
        WeaponProfile::new("Streak SRM 2", WeaponFamily::StreakRack, 2)
            .with_rack(2, 1)
            .with_heat(2)
    }

    #[test]
    fn streak_without_lock_spends_nothing() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(streak());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([5]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(!outcome.hit);
        assert_eq!(outcome.hits_landed, 0);
        assert!(outcome.side_effects.is_empty());
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 10);
        assert_eq!(fx.roster.heat_of(fx.attacker), 0);
        assert!(report_ids(&outcome).contains(&ReportId::StreakNoLock));
    }

    #[test]
    fn ecm_streak_miss_narration_follows_the_flag() {
        let mut fx = Fixture::new();
        fx.rules.ecm_streak_miss_report = true;
        let attacker = fx.attacker;
        fx.roster.unit_mut(attacker).ecm_affected = true;
        let target = enemy(&mut fx);
        let weapon = fx.arm(streak());
        fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([5]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));
        assert!(report_ids(&outcome).contains(&ReportId::StreakNoLockEcm));
    }

    #[test]
    fn streak_lock_lands_the_full_rack() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(streak());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(outcome.hit);
        assert_eq!(outcome.hits_landed, 2);
        assert_eq!(fx.roster.armor_of(target, Location::CenterTorso, false), 6);
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 9);
        assert_eq!(fx.roster.heat_of(fx.attacker), 2);
        assert!(!report_ids(&outcome).contains(&ReportId::ClusterRoll));
    }

    // ===== rapid fire =====

    fn rotary() -> WeaponProfile {
        WeaponProfile::new("RAC/5", WeaponFamily::RotaryAutocannon, 5).with_heat(1)
    }

    #[test]
    fn six_shot_rotary_explodes_on_a_two() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(rotary());
        let bin = fx.load(weapon, MunitionType::STANDARD, 20);
        fx.dice = crate::env::ScriptedRolls::new([2]);

        let decl = fx
            .declare(weapon, TargetRef::Entity(target))
            .with_mode(FireMode::Rotary(6));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(!outcome.hit);
        assert_eq!(outcome.status, OutcomeStatus::Resolved);
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 14);
        assert_eq!(fx.roster.heat_of(fx.attacker), 6);
        assert_eq!(
            fx.roster.weapon_status(fx.attacker, weapon),
            WeaponStatus::Destroyed
        );
        // Self-damage equal to the rated damage at the mount location.
        assert_eq!(fx.roster.armor_of(fx.attacker, Location::RightArm, false), 5);
        assert_eq!(fx.roster.armor_of(target, Location::CenterTorso, false), 10);
        assert_eq!(fx.dice.overruns(), 0);

        let again = fx.declare(weapon, TargetRef::Entity(target));
        let refused = fx.resolve(&again, &ToHitResult::new(8));
        assert_eq!(refused.status, OutcomeStatus::Aborted);
    }

    #[test]
    fn jam_takes_effect_after_the_volley() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(rotary());
        fx.load(weapon, MunitionType::STANDARD, 20);
        // jam 4, to-hit 9, cluster 7 on the 6 column (4 hits), four locations
        fx.dice = crate::env::ScriptedRolls::new([4, 9, 7, 7, 7, 7, 7]);

        let decl = fx
            .declare(weapon, TargetRef::Entity(target))
            .with_mode(FireMode::Rotary(6));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(outcome.hit);
        assert_eq!(outcome.hits_landed, 4);
        assert_eq!(
            fx.roster.weapon_status(fx.attacker, weapon),
            WeaponStatus::Jammed
        );
        let ids = report_ids(&outcome);
        let jam = ids.iter().position(|id| *id == ReportId::WeaponJammed);
        let damage = ids.iter().rposition(|id| *id == ReportId::DamageApplied);
        assert!(jam > damage);
    }

    #[test]
    fn ultra_volley_spans_bins() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(WeaponProfile::new("UAC/5", WeaponFamily::UltraAutocannon, 5));
        let first = fx.load(weapon, MunitionType::STANDARD, 1);
        let second = fx.load(weapon, MunitionType::STANDARD, 10);
        // jam clear, to-hit, cluster 7 on the 2 column (1 hit), location
        fx.dice = crate::env::ScriptedRolls::new([5, 9, 7, 7]);

        let decl = fx
            .declare(weapon, TargetRef::Entity(target))
            .with_mode(FireMode::Ultra);
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.hits_landed, 1);
        assert_eq!(fx.roster.shots_in(fx.attacker, first), 0);
        assert_eq!(fx.roster.shots_in(fx.attacker, second), 9);
    }

    // ===== missiles =====

    #[test]
    fn ams_cannot_push_hits_below_zero() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        {
            let unit = fx.roster.unit_mut(target);
            unit.bins.push(AmmoBin {
                id: BinId(0),
                feeds: "AMS".into(),
                munitions: MunitionType::STANDARD,
                shots: 12,
            });
            unit.ams.push(AmsMount {
                weapon: WeaponId(0),
                bin: Some(BinId(0)),
                heat: 1,
                engaged: false,
            });
        }
        let lrm5 = WeaponProfile::new("LRM 5", WeaponFamily::MissileRack, 1).with_rack(5, 5);
        let weapon = fx.arm(lrm5);
        fx.load(weapon, MunitionType::STANDARD, 24);
        fx.dice = crate::env::ScriptedRolls::new([9, 2]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(outcome.hit);
        assert_eq!(outcome.hits_landed, 0);
        assert!(outcome.damage_events.is_empty());
        assert_eq!(fx.roster.shots_in(target, BinId(0)), 11);
        assert_eq!(fx.roster.heat_of(target), 1);
        assert!(fx.roster.unit(target).ams[0].engaged);
        assert!(report_ids(&outcome).contains(&ReportId::AmsEngaged));
    }

    // ===== artillery =====

    fn arrow_iv() -> WeaponProfile {
        WeaponProfile::new("Arrow IV", WeaponFamily::Artillery, 20)
            .with_splash(10)
            .with_heat(10)
    }

    #[test]
    fn artillery_in_flight_resolves_only_when_due() {
        let mut fx = Fixture::new();
        let hex = Coords::new(5, 5);
        fx.board.add_building(hex, 100);
        let weapon = fx.arm(arrow_iv());
        let bin = fx.load(weapon, MunitionType::STANDARD, 5);

        let target = TargetRef::Hex {
            coords: hex,
            intent: HexIntent::Strike,
        };
        let decl = fx.declare(weapon, target).with_flight_time(2);
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Pending);
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 4);
        assert_eq!(fx.roster.heat_of(fx.attacker), 10);
        let mut flight = outcome.scheduled_flight().cloned().expect("flight scheduled");

        fx.phase = PhaseInfo::new(2, PhaseKind::Targeting);
        flight.advance(fx.phase);
        let early = fx.run(|env| resolve_artillery(&flight, &ToHitResult::new(8), env));
        assert_eq!(early.status, OutcomeStatus::Aborted);
        assert_eq!(fx.board.building_cf(hex), Some(100));

        fx.phase = PhaseInfo::new(3, PhaseKind::Targeting);
        flight.advance(fx.phase);
        fx.dice = crate::env::ScriptedRolls::new([9]);
        let landed = fx.run(|env| resolve_artillery(&flight, &ToHitResult::new(8), env));

        assert_eq!(landed.status, OutcomeStatus::Resolved);
        assert!(landed.hit);
        assert_eq!(fx.board.building_cf(hex), Some(90));
        let splash = landed
            .reports
            .iter()
            .filter(|r| r.id == ReportId::SplashDamage)
            .count();
        assert_eq!(splash, 6);
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn artillery_miss_scatters_by_the_margin() {
        let mut fx = Fixture::new();
        let weapon = fx.arm(WeaponProfile::new("Sniper", WeaponFamily::Artillery, 10));
        fx.load(weapon, MunitionType::STANDARD, 5);
        // to-hit 5 against 8, scatter direction die 4 (south)
        fx.dice = crate::env::ScriptedRolls::new([5, 4]);

        let target = TargetRef::Hex {
            coords: Coords::new(5, 5),
            intent: HexIntent::Strike,
        };
        let decl = fx.declare(weapon, target);
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        let scatter = outcome
            .reports
            .iter()
            .find(|r| r.id == ReportId::ArtilleryScatter)
            .expect("scatter reported");
        assert_eq!(scatter.render(), "  round scatters 3 hex(es) to hex (5, 8)");
        assert!(report_ids(&outcome).contains(&ReportId::ArtilleryImpact));
    }

    fn homing(fx: &mut Fixture) -> AttackDeclaration {
        let weapon = fx.arm(WeaponProfile::new("Arrow IV", WeaponFamily::Artillery, 20));
        fx.load(weapon, MunitionType::HOMING, 5);
        let target = TargetRef::Hex {
            coords: Coords::new(5, 5),
            intent: HexIntent::Strike,
        };
        fx.declare(weapon, target)
    }

    #[test]
    fn homing_without_tags_is_unresolvable_and_resets_counters() {
        let mut fx = Fixture::new();
        let enemy = enemy(&mut fx);
        fx.board.add_tag(1, enemy, Coords::new(6, 5), 1);
        fx.board.tags[0].shots = 3;
        let decl = homing(&mut fx);

        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Unresolvable);
        assert!(report_ids(&outcome).contains(&ReportId::NoTaggedTarget));
        assert_eq!(fx.board.tags[0].shots, 0);
        assert!(outcome.is_committed());
    }

    #[test]
    fn homing_prefers_the_least_used_tag() {
        let mut fx = Fixture::new();
        let spotter = fx.attacker;
        fx.board.add_tag(1, spotter, Coords::new(6, 5), 1);
        fx.board.add_tag(2, spotter, Coords::new(7, 5), 1);
        fx.board.tags[0].shots = 1;
        let decl = homing(&mut fx);
        fx.dice = crate::env::ScriptedRolls::new([9]);

        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.status, OutcomeStatus::Resolved);
        assert_eq!(fx.board.tags[1].shots, 1);
        assert!(outcome.side_effects.contains(&SideEffect::TagShotRecorded(2)));
        let impact = outcome
            .reports
            .iter()
            .find(|r| r.id == ReportId::ArtilleryImpact)
            .expect("impact reported");
        assert_eq!(impact.render(), "  round impacts at hex (7, 5)");
    }

    // ===== area profiles =====

    #[test]
    fn leg_attack_needs_a_unit_target() {
        let mut fx = Fixture::new();
        let weapon = fx.arm(WeaponProfile::new("Leg attack", WeaponFamily::LegAttack, 4));
        let target = TargetRef::Hex {
            coords: Coords::new(2, 2),
            intent: HexIntent::Strike,
        };
        let decl = fx.declare(weapon, target);
        let outcome = fx.resolve(&decl, &ToHitResult::new(6));
        assert_eq!(outcome.status, OutcomeStatus::Aborted);
    }

    #[test]
    fn minefield_damage_alternates_legs() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(WeaponProfile::new("Minefield", WeaponFamily::Minefield, 10));
        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::automatic_success("mines"));

        assert!(outcome.hit);
        assert_eq!(fx.roster.armor_of(target, Location::LeftLeg, false), 7);
        assert_eq!(fx.roster.armor_of(target, Location::RightLeg, false), 7);
    }

    // ===== optional rules =====

    fn lrm10() -> WeaponProfile {
        WeaponProfile::new("LRM 10", WeaponFamily::MissileRack, 1).with_rack(10, 5)
    }

    fn cluster_modifiers(outcome: &ResolutionOutcome) -> usize {
        outcome
            .reports
            .iter()
            .filter(|r| r.id == ReportId::ClusterModifier)
            .count()
    }

    #[test]
    fn roll_on_the_target_number_is_a_glancing_blow() {
        let mut fx = Fixture::new();
        fx.rules.glancing_blows = true;
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([8, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(outcome.hit);
        assert_eq!(outcome.hits_landed, 1);
        assert_eq!(outcome.total_damage_applied(), 2);
        assert_eq!(fx.roster.armor_of(target, Location::CenterTorso, false), 8);
        assert!(report_ids(&outcome).contains(&ReportId::GlancingBlow));
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn glancing_blows_stay_off_without_the_rule() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::STANDARD, 10);
        fx.dice = crate::env::ScriptedRolls::new([8, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.total_damage_applied(), 5);
        assert!(!report_ids(&outcome).contains(&ReportId::GlancingBlow));
    }

    #[test]
    fn glancing_salvo_takes_the_cluster_penalty() {
        let mut fx = Fixture::new();
        fx.rules.glancing_blows = true;
        let target = enemy(&mut fx);
        let weapon = fx.arm(lrm10());
        fx.load(weapon, MunitionType::STANDARD, 24);
        // to-hit, cluster, then one location roll per cluster
        fx.dice = crate::env::ScriptedRolls::new([8, 10, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        // 10 - 4 reads the 6 column of the 10 row
        assert_eq!(outcome.hits_landed, 6);
        assert_eq!(cluster_modifiers(&outcome), 1);
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn direct_blow_bonus_comes_from_the_roll_margin() {
        let mut fx = Fixture::new();
        fx.rules.direct_blow = true;
        let target = enemy(&mut fx);
        let weapon = fx.arm(lrm10());
        fx.load(weapon, MunitionType::STANDARD, 24);
        fx.dice = crate::env::ScriptedRolls::new([11, 7, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(5));

        // margin 6 gives +2, so the cluster roll of 7 reads as 9
        assert_eq!(outcome.hits_landed, 8);
        assert_eq!(cluster_modifiers(&outcome), 1);
        let blow = outcome
            .reports
            .iter()
            .find(|r| r.id == ReportId::DirectBlow)
            .expect("direct blow reported");
        assert!(blow.render().ends_with("direct blow, +2 to cluster roll"));
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn automatic_failure_commits_and_misses_without_rolling() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        let bin = fx.load(weapon, MunitionType::STANDARD, 10);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::automatic_fail("target evaded"));

        assert_eq!(outcome.status, OutcomeStatus::Resolved);
        assert!(!outcome.hit);
        assert!(outcome.damage_events.is_empty());
        assert_eq!(fx.roster.shots_in(fx.attacker, bin), 9);
        assert_eq!(fx.roster.heat_of(fx.attacker), 1);
        assert_eq!(
            report_ids(&outcome),
            vec![ReportId::AttackDeclared, ReportId::ToHitAutoFail, ReportId::Miss]
        );
        assert_eq!(fx.dice.overruns(), 0);
    }

    // ===== munitions =====

    #[test]
    fn incendiary_miss_still_tries_to_ignite() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let hex = Coords::new(3, 0);
        fx.board.ignition.insert(hex, 6);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::INCENDIARY, 10);
        fx.dice = crate::env::ScriptedRolls::new([4, 8]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(!outcome.hit);
        assert!(fx.board.burning.contains(&hex));
        assert!(outcome.side_effects.contains(&SideEffect::TerrainIgnited(hex)));
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn tracer_hit_illuminates_the_target_hex() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let hex = Coords::new(3, 0);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::TRACER, 10);
        fx.dice = crate::env::ScriptedRolls::new([9, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert!(outcome.hit);
        assert!(fx.board.illuminated.contains(&hex));
        assert!(outcome.side_effects.contains(&SideEffect::TargetIlluminated(hex)));
        assert!(report_ids(&outcome).contains(&ReportId::TargetIlluminated));
        assert_eq!(fx.roster.armor_of(target, Location::CenterTorso, false), 5);
    }

    #[test]
    fn tracer_miss_leaves_the_hex_dark() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::TRACER, 10);
        fx.dice = crate::env::ScriptedRolls::new([4]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        fx.resolve(&decl, &ToHitResult::new(8));

        assert!(fx.board.illuminated.is_empty());
    }

    #[test]
    fn flak_gains_a_bonus_against_airborne_targets() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        fx.roster.unit_mut(target).airborne = true;
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::FLAK, 10);
        // to-hit, cluster, one location roll per pellet
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 7, 7, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        // five pellets; the roll of 7 reads as 9
        assert_eq!(outcome.hits_landed, 4);
        assert_eq!(cluster_modifiers(&outcome), 1);
        assert_eq!(outcome.total_damage_applied(), 4);
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn flak_against_ground_targets_rolls_unmodified() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::FLAK, 10);
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 7, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));

        assert_eq!(outcome.hits_landed, 3);
        assert_eq!(cluster_modifiers(&outcome), 0);
        assert_eq!(fx.dice.overruns(), 0);
    }

    #[test]
    fn flechette_doubles_against_infantry_and_halves_otherwise() {
        let mut fx = Fixture::new();
        let platoon = fx.infantry(2, Coords::new(3, 0));
        let mech = fx.mech(2, Coords::new(4, 0));
        let weapon = fx.arm(ac5());
        fx.load(weapon, MunitionType::FLECHETTE, 10);
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 9, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(platoon));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));
        assert_eq!(outcome.total_damage_applied(), 10);
        assert_eq!(fx.roster.internal_of(platoon, Location::Troopers), 10);

        let decl = fx.declare(weapon, TargetRef::Entity(mech));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8));
        assert_eq!(outcome.total_damage_applied(), 3);
        assert_eq!(fx.roster.armor_of(mech, Location::CenterTorso, false), 7);
    }

    #[test]
    fn all_shots_hit_skips_anti_missile_fire() {
        let mut fx = Fixture::new();
        let target = enemy(&mut fx);
        {
            let unit = fx.roster.unit_mut(target);
            unit.bins.push(AmmoBin {
                id: BinId(0),
                feeds: "AMS".into(),
                munitions: MunitionType::STANDARD,
                shots: 12,
            });
            unit.ams.push(AmsMount {
                weapon: WeaponId(0),
                bin: Some(BinId(0)),
                heat: 1,
                engaged: false,
            });
        }
        let weapon = fx.arm(lrm10());
        fx.load(weapon, MunitionType::STANDARD, 24);
        fx.dice = crate::env::ScriptedRolls::new([9, 7, 7]);

        let decl = fx.declare(weapon, TargetRef::Entity(target));
        let outcome = fx.resolve(&decl, &ToHitResult::new(8).with_all_shots_hit());

        assert_eq!(outcome.hits_landed, 10);
        assert_eq!(fx.roster.shots_in(target, BinId(0)), 12);
        assert_eq!(fx.roster.heat_of(target), 0);
        assert!(!fx.roster.unit(target).ams[0].engaged);
        assert!(!report_ids(&outcome).contains(&ReportId::AmsEngaged));
    }
}
