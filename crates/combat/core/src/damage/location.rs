//! Hit location tables.

use crate::config::RulesConfig;
use crate::env::RandomSource;
use crate::types::{EntityKind, HitData, HitSide, Location};

use Location::*;

/// Mech front/rear table, rolls 2..=12. Rear hits use the same column with
/// rear armor.
const MECH_FRONT: [Location; 11] = [
    CenterTorso, RightArm, RightArm, RightLeg, RightTorso, CenterTorso, LeftTorso, LeftLeg,
    LeftArm, LeftArm, Head,
];

const MECH_LEFT: [Location; 11] = [
    LeftTorso, LeftLeg, LeftArm, LeftArm, LeftLeg, LeftTorso, CenterTorso, RightTorso, RightArm,
    RightLeg, Head,
];

const MECH_RIGHT: [Location; 11] = [
    RightTorso, RightLeg, RightArm, RightArm, RightLeg, RightTorso, CenterTorso, LeftTorso,
    LeftArm, LeftLeg, Head,
];

/// Swarming infantry clamp onto the upper body; `true` marks rear armor.
const MECH_SWARM: [(Location, bool); 11] = [
    (Head, false),
    (CenterTorso, true),
    (RightTorso, true),
    (RightTorso, false),
    (RightArm, false),
    (CenterTorso, false),
    (LeftArm, false),
    (LeftTorso, false),
    (LeftTorso, true),
    (CenterTorso, true),
    (Head, false),
];

fn column(roll: u8) -> usize {
    usize::from(roll.clamp(2, 12) - 2)
}

/// Location struck on a roll for the given unit type and attack side.
///
/// A roll of 2 against a mech, or 2 and 12 against a vehicle, calls for a
/// critical check through armor.
pub fn locate(kind: EntityKind, side: HitSide, roll: u8) -> HitData {
    match kind {
        EntityKind::Mech => {
            let table = match side {
                HitSide::Front | HitSide::Rear => &MECH_FRONT,
                HitSide::Left => &MECH_LEFT,
                HitSide::Right => &MECH_RIGHT,
            };
            let hit = HitData::new(table[column(roll)]).rear(side == HitSide::Rear);
            if roll == 2 { hit.with_critical() } else { hit }
        }
        EntityKind::Vehicle => vehicle_location(side, roll),
        EntityKind::Infantry => HitData::new(Troopers),
    }
}

fn vehicle_location(side: HitSide, roll: u8) -> HitData {
    let (facing, on_five, on_nine) = match side {
        HitSide::Front => (Front, RightSide, LeftSide),
        HitSide::Rear => (Rear, LeftSide, RightSide),
        HitSide::Left => (LeftSide, Front, Rear),
        HitSide::Right => (RightSide, Rear, Front),
    };
    match roll {
        0..=2 => HitData::new(facing).with_critical(),
        5 => HitData::new(on_five),
        9 => HitData::new(on_nine),
        10 | 11 => HitData::new(Turret),
        12..=u8::MAX => HitData::new(Turret).with_critical(),
        _ => HitData::new(facing),
    }
}

/// Roll a hit location.
///
/// With floating criticals a through-armor result rerolls the location once
/// and the critical check follows the new location.
pub fn roll_location(
    kind: EntityKind,
    side: HitSide,
    rng: &mut dyn RandomSource,
    rules: &RulesConfig,
) -> HitData {
    let hit = locate(kind, side, rng.roll_two_dice());
    if hit.through_armor_critical && rules.floating_criticals && kind == EntityKind::Mech {
        return locate(kind, side, rng.roll_two_dice()).with_critical();
    }
    hit
}

/// Location struck by a swarm attack.
pub fn roll_swarm_location(kind: EntityKind, rng: &mut dyn RandomSource) -> HitData {
    let roll = rng.roll_two_dice();
    match kind {
        EntityKind::Mech => {
            let (location, rear) = MECH_SWARM[column(roll)];
            HitData::new(location).rear(rear)
        }
        EntityKind::Vehicle => vehicle_location(HitSide::Rear, roll),
        EntityKind::Infantry => HitData::new(Troopers),
    }
}

/// Leg struck by a leg attack: left on 1-3, right on 4-6.
pub fn roll_leg(kind: EntityKind, rng: &mut dyn RandomSource) -> HitData {
    match kind {
        EntityKind::Mech if rng.roll_d6() <= 3 => HitData::new(LeftLeg),
        EntityKind::Mech => HitData::new(RightLeg),
        EntityKind::Vehicle => HitData::new(Front),
        EntityKind::Infantry => HitData::new(Troopers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRolls;

    #[test]
    fn mech_front_table() {
        assert_eq!(locate(EntityKind::Mech, HitSide::Front, 7).location, CenterTorso);
        assert_eq!(locate(EntityKind::Mech, HitSide::Front, 3).location, RightArm);
        assert_eq!(locate(EntityKind::Mech, HitSide::Front, 12).location, Head);
        let tac = locate(EntityKind::Mech, HitSide::Front, 2);
        assert_eq!(tac.location, CenterTorso);
        assert!(tac.through_armor_critical);
    }

    #[test]
    fn rear_attacks_hit_rear_torso_armor_only() {
        assert!(locate(EntityKind::Mech, HitSide::Rear, 7).rear);
        let arm = locate(EntityKind::Mech, HitSide::Rear, 10);
        assert_eq!(arm.location, LeftArm);
        assert!(!arm.rear);
    }

    #[test]
    fn side_tables_mirror() {
        for roll in 2..=12 {
            let left = locate(EntityKind::Mech, HitSide::Left, roll).location;
            let right = locate(EntityKind::Mech, HitSide::Right, roll).location;
            let mirrored = match left {
                LeftTorso => RightTorso,
                RightTorso => LeftTorso,
                LeftArm => RightArm,
                RightArm => LeftArm,
                LeftLeg => RightLeg,
                RightLeg => LeftLeg,
                other => other,
            };
            assert_eq!(mirrored, right, "roll {roll}");
        }
    }

    #[test]
    fn vehicle_criticals_on_both_extremes() {
        assert!(locate(EntityKind::Vehicle, HitSide::Front, 2).through_armor_critical);
        let turret = locate(EntityKind::Vehicle, HitSide::Front, 12);
        assert_eq!(turret.location, Turret);
        assert!(turret.through_armor_critical);
        assert_eq!(locate(EntityKind::Vehicle, HitSide::Front, 5).location, RightSide);
    }

    #[test]
    fn floating_critical_rerolls_location() {
        let rules = RulesConfig {
            floating_criticals: true,
            ..RulesConfig::default()
        };
        let mut dice = ScriptedRolls::new([2, 12]);
        let hit = roll_location(EntityKind::Mech, HitSide::Front, &mut dice, &rules);
        assert_eq!(hit.location, Head);
        assert!(hit.through_armor_critical);
    }

    #[test]
    fn leg_attack_picks_a_leg() {
        let mut dice = ScriptedRolls::new([2, 5]);
        assert_eq!(roll_leg(EntityKind::Mech, &mut dice).location, LeftLeg);
        assert_eq!(roll_leg(EntityKind::Mech, &mut dice).location, RightLeg);
    }
}
