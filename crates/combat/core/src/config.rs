/// Optional rules and house rules that change how attacks resolve.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Hits with a large margin of success add a bonus on the cluster roll.
    pub direct_blow: bool,
    /// Hits made exactly on the to-hit value are glancing blows.
    pub glancing_blows: bool,
    /// A streak miss against an ECM-affected attacker gets its own narration.
    pub ecm_streak_miss_report: bool,
    /// Rapid-fire jam and destruction thresholds are capped at 2.
    pub kind_rapid_fire: bool,
    /// Every sub-shot lands; the cluster table is bypassed.
    pub all_shots_hit: bool,
    /// A hit location roll of 2 calls for a critical check through armor.
    pub floating_criticals: bool,
}

impl RulesConfig {
    // ===== compile-time rule constants =====
    /// Named modifier contributed by an engaging anti-missile system.
    pub const AMS_CLUSTER_MODIFIER: i32 = -4;
    pub const ARTEMIS_BONUS: i32 = 2;
    pub const NARC_BONUS: i32 = 2;
    /// Planetary electromagnetic interference, guided weapons only.
    pub const EMI_PENALTY: i32 = -2;
    /// Flak rounds against airborne targets.
    pub const FLAK_BONUS: i32 = 2;
    pub const GLANCING_PENALTY: i32 = -4;
    /// One slot per modifier source.
    pub const MAX_CLUSTER_MODIFIERS: usize = 8;
    /// Artillery damage is applied in groups of this size.
    pub const ARTILLERY_CLUSTER: u32 = 5;
    /// Minefield damage is applied in groups of this size.
    pub const MINEFIELD_CLUSTER: u32 = 5;
    /// Maximum distance between a guidance tag and the homing target point.
    pub const HOMING_SEARCH_RADIUS: u32 = 8;
    /// Lowest natural roll; margin of success is measured from here at least.
    pub const MIN_TARGET: i32 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rules preset where every sub-shot lands, used by replays and tests that
    /// need deterministic hit counts.
    pub fn with_all_shots_hit(mut self) -> Self {
        self.all_shots_hit = true;
        self
    }
}
