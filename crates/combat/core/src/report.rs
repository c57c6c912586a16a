//! Narration trail.
//!
//! Each [`ReportEntry`] carries a stable numeric [`ReportId`], the unit it is
//! about, an indent level and typed parameters. Rendering fills the `{n}`
//! placeholders of the id's template; clients are free to use their own
//! templates keyed by the numeric code instead.

use std::fmt;

use crate::types::{BuildingId, Coords, EntityId, HitData};

/// Stable narration identifiers. The numeric values are part of the log
/// format and must not be renumbered.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u16)]
pub enum ReportId {
    // Declaration
    AttackDeclared = 3100,
    ArtilleryInFlight = 3101,
    AmmoSwitched = 3102,

    // To-hit
    ToHitImpossible = 3110,
    ToHitAutoFail = 3111,
    ToHitAutoSuccess = 3112,
    ToHitRoll = 3113,
    Hit = 3114,
    Miss = 3115,
    DirectBlow = 3116,
    GlancingBlow = 3117,
    StreakNoLock = 3118,
    StreakNoLockEcm = 3119,

    // Cluster modifiers
    ClusterModifier = 3120,
    ArtemisDeniedEcm = 3121,
    ArtemisDeniedStealth = 3122,
    NarcDeniedEcm = 3123,
    AmsEngaged = 3124,
    ClusterRoll = 3125,
    AllShotsHit = 3126,

    // Damage
    DamageApplied = 3200,
    DamageAbsorbed = 3201,
    DamageDiscarded = 3202,
    LocationDestroyed = 3203,
    DamageTransferred = 3204,
    CriticalTriggered = 3205,
    LimbBlownOff = 3206,
    EntityDestroyed = 3207,
    BuildingCollapsed = 3208,

    // Weapon failures
    JamCheckRoll = 3300,
    WeaponJammed = 3301,
    WeaponDestroyed = 3302,

    // Terrain
    TerrainIgnited = 3400,
    IgnitionFailed = 3401,
    TerrainCleared = 3402,
    AccidentalBuildingDamage = 3403,
    TargetIlluminated = 3404,

    // Artillery
    ArtilleryScatter = 3500,
    ArtilleryImpact = 3501,
    ArtilleryRetargeted = 3502,
    NoTaggedTarget = 3503,
    SplashDamage = 3504,
    HomingRoundLost = 3505,
    ArtilleryOffBoard = 3506,

    // Diagnostics
    NoAmmoLoaded = 3900,
    AttackAborted = 3901,
    ResolutionFailed = 3902,
}

impl ReportId {
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// English message template with positional `{n}` placeholders.
    pub const fn template(self) -> &'static str {
        use ReportId::*;
        match self {
            AttackDeclared => "{0} fires {1} at {2}",
            ArtilleryInFlight => "round in flight, impact in {0} turn(s)",
            AmmoSwitched => "switches {0} to bin {1}",
            ToHitImpossible => "attack impossible: {0}",
            ToHitAutoFail => "automatic failure: {0}",
            ToHitAutoSuccess => "automatic success: {0}",
            ToHitRoll => "needs {0}, rolls {1}",
            Hit => "hits",
            Miss => "misses",
            DirectBlow => "direct blow, +{0} to cluster roll",
            GlancingBlow => "glancing blow",
            StreakNoLock => "no lock, streak does not fire",
            StreakNoLockEcm => "no lock through ECM, streak does not fire",
            ClusterModifier => "{0} modifier {1}",
            ArtemisDeniedEcm => "Artemis bonus denied by ECM",
            ArtemisDeniedStealth => "Artemis bonus denied by stealth armor",
            NarcDeniedEcm => "Narc bonus denied by ECM",
            AmsEngaged => "{0} engages incoming missiles with AMS",
            ClusterRoll => "cluster roll {0} (modified {1}): {2} of {3} hit",
            AllShotsHit => "all {0} shots hit",
            DamageApplied => "{0} takes {1} damage to {2}",
            DamageAbsorbed => "{0} absorbs {1} damage",
            DamageDiscarded => "{0} damage lands harmlessly in {1}",
            LocationDestroyed => "{0} loses {1}",
            DamageTransferred => "{0} damage transfers to {1}",
            CriticalTriggered => "critical roll {0}: {1} critical hit(s) to {2}",
            LimbBlownOff => "{0} blown off",
            EntityDestroyed => "{0} is destroyed",
            BuildingCollapsed => "{0} collapses",
            JamCheckRoll => "jam check rolls {0}",
            WeaponJammed => "{0} jams",
            WeaponDestroyed => "{0} explodes",
            TerrainIgnited => "{0} ignites",
            IgnitionFailed => "ignition at {0} fails (needs {1}, rolls {2})",
            TerrainCleared => "{0} is cleared",
            AccidentalBuildingDamage => "stray fire hits {0} for {1} damage",
            TargetIlluminated => "{0} is illuminated",
            ArtilleryScatter => "round scatters {0} hex(es) to {1}",
            ArtilleryImpact => "round impacts at {0}",
            ArtilleryRetargeted => "homing round locks onto tag at {0}",
            NoTaggedTarget => "no tagged target, homing round cannot guide",
            SplashDamage => "{0} takes {1} splash damage",
            HomingRoundLost => "homing round is lost",
            ArtilleryOffBoard => "round lands off the map at {0}",
            NoAmmoLoaded => "{0} has no ammunition loaded",
            AttackAborted => "attack aborted: {0}",
            ResolutionFailed => "resolution failed: {0}",
        }
    }
}

/// Typed report parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportParam {
    Int(i64),
    Text(String),
    Entity(EntityId),
    Location(HitData),
    Hex(Coords),
    Building(BuildingId),
}

impl fmt::Display for ReportParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportParam::Int(v) => write!(f, "{v}"),
            ReportParam::Text(s) => f.write_str(s),
            ReportParam::Entity(id) => write!(f, "unit {id}"),
            ReportParam::Location(hit) => write!(f, "{hit}"),
            ReportParam::Hex(coords) => write!(f, "hex {coords}"),
            ReportParam::Building(id) => write!(f, "{id}"),
        }
    }
}

/// One narration line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEntry {
    pub id: ReportId,
    pub subject: EntityId,
    pub indent: u8,
    pub params: Vec<ReportParam>,
}

impl ReportEntry {
    pub fn new(id: ReportId, subject: EntityId) -> Self {
        Self {
            id,
            subject,
            indent: 0,
            params: Vec::new(),
        }
    }

    pub fn indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    pub fn int(mut self, value: impl Into<i64>) -> Self {
        self.params.push(ReportParam::Int(value.into()));
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.params.push(ReportParam::Text(value.into()));
        self
    }

    pub fn entity(mut self, id: EntityId) -> Self {
        self.params.push(ReportParam::Entity(id));
        self
    }

    pub fn location(mut self, hit: HitData) -> Self {
        self.params.push(ReportParam::Location(hit));
        self
    }

    pub fn hex(mut self, coords: Coords) -> Self {
        self.params.push(ReportParam::Hex(coords));
        self
    }

    pub fn building(mut self, id: BuildingId) -> Self {
        self.params.push(ReportParam::Building(id));
        self
    }

    /// Fill the template placeholders. Unknown placeholders are left as-is.
    pub fn render(&self) -> String {
        let mut line = self.id.template().to_string();
        for (index, param) in self.params.iter().enumerate() {
            line = line.replace(&format!("{{{index}}}"), &param.to_string());
        }
        format!("{}{}", "  ".repeat(usize::from(self.indent)), line)
    }
}
