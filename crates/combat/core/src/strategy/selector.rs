use tracing::debug;

use super::{AreaProfile, ArtilleryKind, MunitionVariant, RapidFireKind, Strategy};
use crate::error::{CombatError, ConfigurationError, ErrorSeverity};
use crate::types::WeaponId;
use crate::weapon::{FireMode, MunitionType, WeaponFamily};

/// Munition flags checked in order; the first one the family supports wins.
const MUNITION_PRECEDENCE: [(MunitionType, MunitionVariant); 6] = [
    (MunitionType::ARMOR_PIERCING, MunitionVariant::ArmorPiercing),
    (MunitionType::FLECHETTE, MunitionVariant::Flechette),
    (MunitionType::INCENDIARY, MunitionVariant::Incendiary),
    (MunitionType::TRACER, MunitionVariant::Tracer),
    (MunitionType::FLAK, MunitionVariant::Flak),
    (MunitionType::CLUSTER, MunitionVariant::Cluster),
];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("weapon {0:?} requires ammunition but no bin is loaded")]
    NoAmmoLoaded(WeaponId),
}

impl CombatError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoAmmoLoaded(_) => "SELECTION_NO_AMMO_LOADED",
        }
    }
}

impl From<SelectionError> for ConfigurationError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::NoAmmoLoaded(weapon) => ConfigurationError::NoAmmoLoaded(weapon),
        }
    }
}

/// Pick the strategy for a weapon firing `loaded` munitions in `mode`.
///
/// Pure and total: the same inputs always give the same strategy. `loaded`
/// is `None` when no bin is loaded.
pub fn select(
    weapon: WeaponId,
    family: WeaponFamily,
    loaded: Option<MunitionType>,
    mode: FireMode,
) -> Result<Strategy, SelectionError> {
    if family.requires_ammo() && loaded.is_none() {
        return Err(SelectionError::NoAmmoLoaded(weapon));
    }

    let strategy = mode_override(family, mode)
        .or_else(|| munition_variant(family, loaded.unwrap_or_default()))
        .unwrap_or_else(|| family_standard(family));
    debug!(
        target: "combat::strategy",
        weapon = weapon.0,
        %family,
        %strategy,
        "strategy selected"
    );
    Ok(strategy)
}

fn mode_override(family: WeaponFamily, mode: FireMode) -> Option<Strategy> {
    match (family, mode) {
        (WeaponFamily::UltraAutocannon, FireMode::Ultra) => {
            Some(Strategy::RapidFire(RapidFireKind::Ultra))
        }
        (WeaponFamily::RotaryAutocannon, FireMode::Rotary(n)) if n > 1 => {
            Some(Strategy::RapidFire(RapidFireKind::Rotary))
        }
        (WeaponFamily::Autocannon, FireMode::Rapid) => {
            Some(Strategy::RapidFire(RapidFireKind::RapidAutocannon))
        }
        _ => None,
    }
}

fn munition_variant(family: WeaponFamily, munitions: MunitionType) -> Option<Strategy> {
    if family.is_autocannon() {
        return MUNITION_PRECEDENCE
            .iter()
            .find(|(flag, _)| munitions.contains(*flag))
            .map(|(_, variant)| Strategy::Munition(*variant));
    }
    if family == WeaponFamily::Artillery && munitions.contains(MunitionType::HOMING) {
        return Some(Strategy::Artillery(ArtilleryKind::Homing));
    }
    None
}

fn family_standard(family: WeaponFamily) -> Strategy {
    match family {
        WeaponFamily::Energy
        | WeaponFamily::Autocannon
        | WeaponFamily::UltraAutocannon
        | WeaponFamily::RotaryAutocannon => Strategy::Standard,
        WeaponFamily::MissileRack => Strategy::Missile,
        WeaponFamily::StreakRack => Strategy::Streak,
        WeaponFamily::Artillery => Strategy::Artillery(ArtilleryKind::Indirect),
        WeaponFamily::Minefield => Strategy::Area(AreaProfile::Minefield),
        WeaponFamily::LegAttack => Strategy::Area(AreaProfile::LegAttack),
        WeaponFamily::SwarmAttack => Strategy::Area(AreaProfile::Swarm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: WeaponId = WeaponId(0);

    #[test]
    fn ammo_families_need_a_loaded_bin() {
        assert_eq!(
            select(W, WeaponFamily::Autocannon, None, FireMode::Single),
            Err(SelectionError::NoAmmoLoaded(W))
        );
        assert_eq!(
            select(W, WeaponFamily::Energy, None, FireMode::Single),
            Ok(Strategy::Standard)
        );
    }

    #[test]
    fn fire_mode_overrides_munitions() {
        let ap = Some(MunitionType::ARMOR_PIERCING);
        assert_eq!(
            select(W, WeaponFamily::UltraAutocannon, ap, FireMode::Ultra),
            Ok(Strategy::RapidFire(RapidFireKind::Ultra))
        );
        assert_eq!(
            select(W, WeaponFamily::RotaryAutocannon, ap, FireMode::Rotary(6)),
            Ok(Strategy::RapidFire(RapidFireKind::Rotary))
        );
        // a single-shot rotary falls through to its munition
        assert_eq!(
            select(W, WeaponFamily::RotaryAutocannon, ap, FireMode::Rotary(1)),
            Ok(Strategy::Munition(MunitionVariant::ArmorPiercing))
        );
        assert_eq!(
            select(W, WeaponFamily::Autocannon, ap, FireMode::Rapid),
            Ok(Strategy::RapidFire(RapidFireKind::RapidAutocannon))
        );
    }

    #[test]
    fn munition_precedence_is_fixed() {
        let mixed = MunitionType::CLUSTER | MunitionType::TRACER | MunitionType::FLAK;
        assert_eq!(
            select(W, WeaponFamily::Autocannon, Some(mixed), FireMode::Single),
            Ok(Strategy::Munition(MunitionVariant::Tracer))
        );
        assert_eq!(
            select(
                W,
                WeaponFamily::Autocannon,
                Some(MunitionType::FLAK | MunitionType::CLUSTER),
                FireMode::Single
            ),
            Ok(Strategy::Munition(MunitionVariant::Flak))
        );
    }

    #[test]
    fn munitions_outside_their_family_are_ignored() {
        assert_eq!(
            select(
                W,
                WeaponFamily::MissileRack,
                Some(MunitionType::ARMOR_PIERCING | MunitionType::ARTEMIS_CAPABLE),
                FireMode::Single
            ),
            Ok(Strategy::Missile)
        );
        assert_eq!(
            select(W, WeaponFamily::Autocannon, Some(MunitionType::HOMING), FireMode::Single),
            Ok(Strategy::Standard)
        );
        assert_eq!(
            select(W, WeaponFamily::Artillery, Some(MunitionType::HOMING), FireMode::Single),
            Ok(Strategy::Artillery(ArtilleryKind::Homing))
        );
    }

    #[test]
    fn family_defaults() {
        let std = Some(MunitionType::STANDARD);
        assert_eq!(
            select(W, WeaponFamily::StreakRack, std, FireMode::Single),
            Ok(Strategy::Streak)
        );
        assert_eq!(
            select(W, WeaponFamily::Artillery, std, FireMode::Single),
            Ok(Strategy::Artillery(ArtilleryKind::Indirect))
        );
        assert_eq!(
            select(W, WeaponFamily::SwarmAttack, None, FireMode::Single),
            Ok(Strategy::Area(AreaProfile::Swarm))
        );
        // ultra autocannon fired single-shot is a plain autocannon
        assert_eq!(
            select(W, WeaponFamily::UltraAutocannon, std, FireMode::Single),
            Ok(Strategy::Standard)
        );
    }
}
