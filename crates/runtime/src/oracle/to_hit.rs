//! Range-bracket to-hit numbers.
//!
//! A stand-in for a full modifier catalog: gunnery skill plus a range
//! modifier, with a few fixed cases for hex targets, area attacks and
//! artillery.

use combat_core::{
    ArtilleryFlight, AttackDeclaration, BoardState, Coords, EntityId, EntityRegistry, MountedWeapon,
    RangeBracket, TargetRef, ToHitResolver, ToHitResult, WeaponFamily,
};

use super::Roster;

/// Computes to-hit numbers from the distance between attacker and target.
pub struct RangeToHit<'a> {
    roster: &'a Roster,
    gunnery: i32,
}

impl<'a> RangeToHit<'a> {
    pub const DEFAULT_GUNNERY: i32 = 4;
    /// Hexes and buildings do not move.
    pub const IMMOBILE_TARGET: i32 = -4;
    /// Indirect artillery fire.
    pub const ARTILLERY_BASE: i32 = 7;

    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            gunnery: Self::DEFAULT_GUNNERY,
        }
    }

    pub fn with_gunnery(mut self, gunnery: i32) -> Self {
        self.gunnery = gunnery;
        self
    }

    /// To-hit for a declaration, looking the weapon up on the attacker.
    pub fn for_declaration(
        &self,
        declaration: &AttackDeclaration,
        board: &dyn BoardState,
    ) -> ToHitResult {
        match self.roster.weapon(declaration.attacker, declaration.weapon) {
            Ok(weapon) => self.compute(declaration.attacker, &declaration.target, &weapon, board),
            Err(err) => ToHitResult::impossible(err.to_string()),
        }
    }

    /// To-hit for a round landing now. The launcher may be gone by the time
    /// it arrives, so only the artillery base number applies.
    pub fn for_impact(&self, flight: &ArtilleryFlight) -> ToHitResult {
        let profile = &flight.weapon.profile;
        if profile.family == WeaponFamily::Artillery || profile.offboard {
            finish(Self::ARTILLERY_BASE)
        } else {
            finish(self.gunnery)
        }
    }

    fn target_position(&self, target: &TargetRef) -> Result<Coords, String> {
        match target {
            TargetRef::Entity(id) => match self.roster.unit(*id) {
                Some(unit) if !unit.destroyed => Ok(unit.position),
                _ => Err(format!("unit {id} is not on the board")),
            },
            TargetRef::Hex { coords, .. } => Ok(*coords),
        }
    }
}

fn bracket(distance: u32, ranges: [u32; 3]) -> Option<(RangeBracket, i32)> {
    if ranges == [0; 3] {
        return Some((RangeBracket::Short, 0));
    }
    let [short, medium, long] = ranges;
    if distance <= short {
        Some((RangeBracket::Short, 0))
    } else if distance <= medium {
        Some((RangeBracket::Medium, 2))
    } else if distance <= long {
        Some((RangeBracket::Long, 4))
    } else {
        None
    }
}

impl ToHitResolver for RangeToHit<'_> {
    fn compute(
        &self,
        attacker: EntityId,
        target: &TargetRef,
        weapon: &MountedWeapon,
        board: &dyn BoardState,
    ) -> ToHitResult {
        let Some(origin) = self.roster.unit(attacker).map(|unit| unit.position) else {
            return ToHitResult::impossible(format!("attacker {attacker} is not on the board"));
        };
        let point = match self.target_position(target) {
            Ok(point) => point,
            Err(reason) => return ToHitResult::impossible(reason),
        };
        if !board.in_bounds(point) && !weapon.profile.offboard {
            return ToHitResult::impossible(format!("hex {point} is off the map"));
        }

        let family = weapon.profile.family;
        let distance = origin.distance(point);
        let value = match family {
            WeaponFamily::Minefield => return ToHitResult::automatic_success("minefield"),
            WeaponFamily::LegAttack | WeaponFamily::SwarmAttack => {
                if distance > 0 {
                    return ToHitResult::impossible("target must share the attacker's hex");
                }
                self.gunnery
            }
            WeaponFamily::Artillery => Self::ARTILLERY_BASE,
            _ => {
                let Some((range, modifier)) = bracket(distance, weapon.profile.ranges) else {
                    return ToHitResult::impossible(format!(
                        "target out of range ({distance} hexes)"
                    ));
                };
                let immobile = if target.entity().is_none() {
                    Self::IMMOBILE_TARGET
                } else {
                    0
                };
                return finish(self.gunnery + modifier + immobile).with_range(range);
            }
        };
        finish(value)
    }
}

fn finish(value: i32) -> ToHitResult {
    if value > 12 {
        ToHitResult::automatic_fail(format!("needs {value}"))
    } else {
        ToHitResult::new(value)
    }
}
