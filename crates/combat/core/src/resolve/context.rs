use arrayvec::ArrayVec;

use crate::attack::{AttackDeclaration, ToHitResult};
use crate::config::RulesConfig;
use crate::damage::DamageEvent;
use crate::error::ResolutionError;
use crate::report::{ReportEntry, ReportId};
use crate::strategy::{JamCheck, Strategy};
use crate::types::{AttackId, BinId, Coords, EntityId};
use crate::weapon::{MountedWeapon, MunitionType};

use super::modifiers::ClusterModifier;
use super::outcome::{OutcomeStatus, ResolutionOutcome, SideEffect};

/// Rounds planned from one bin before anything is consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmoDraw {
    pub bin: BinId,
    pub rounds: u32,
}

/// Per-attack scratch state threaded through every protocol step.
#[derive(Clone, Debug)]
pub struct ResolutionContext {
    pub declaration: AttackDeclaration,
    pub to_hit: ToHitResult,
    pub strategy: Strategy,
    pub weapon: MountedWeapon,
    /// Munition set actually fired (after bin selection).
    pub munition: MunitionType,

    // ===== to-hit =====
    pub roll: Option<u8>,
    pub to_hit_evaluated: bool,
    pub hit: bool,
    pub glancing: bool,
    pub direct_blow: bool,
    /// Roll minus `max(2, target)`; negative on a miss.
    pub margin: i32,

    // ===== volley =====
    pub ammo_plan: Vec<AmmoDraw>,
    /// Bin to load before drawing, when the loaded one is dry.
    pub switch_to: Option<BinId>,
    pub shots_fired: u32,
    pub salvo: bool,
    pub damage_per_hit: u32,
    pub cluster_size: u32,
    pub hits_landed: u32,
    pub modifiers: ArrayVec<ClusterModifier, { RulesConfig::MAX_CLUSTER_MODIFIERS }>,
    pub jam: Option<JamCheck>,
    /// The weapon exploded; nothing from this volley lands.
    pub volley_lost: bool,
    /// Where an artillery round is aimed, then where it lands.
    pub impact_point: Option<Coords>,

    // ===== bookkeeping =====
    pub committed: bool,
    pub status: OutcomeStatus,
    pub failure: Option<ResolutionError>,
    pub reports: Vec<ReportEntry>,
    /// Entries held back until the report is finalized.
    pub deferred: Vec<ReportEntry>,
    pub side_effects: Vec<SideEffect>,
    pub damage_events: Vec<DamageEvent>,
}

impl ResolutionContext {
    pub fn new(
        declaration: AttackDeclaration,
        to_hit: ToHitResult,
        strategy: Strategy,
        weapon: MountedWeapon,
    ) -> Self {
        let munition = declaration.munition.unwrap_or_default();
        let damage_per_hit = weapon.profile.damage;
        let cluster_size = weapon.profile.cluster_size;
        Self {
            declaration,
            to_hit,
            strategy,
            weapon,
            munition,
            roll: None,
            to_hit_evaluated: false,
            hit: false,
            glancing: false,
            direct_blow: false,
            margin: 0,
            ammo_plan: Vec::new(),
            switch_to: None,
            shots_fired: 0,
            salvo: false,
            damage_per_hit,
            cluster_size,
            hits_landed: 0,
            modifiers: ArrayVec::new(),
            jam: None,
            volley_lost: false,
            impact_point: None,
            committed: false,
            status: OutcomeStatus::Resolved,
            failure: None,
            reports: Vec::new(),
            deferred: Vec::new(),
            side_effects: Vec::new(),
            damage_events: Vec::new(),
        }
    }

    pub fn attack_id(&self) -> AttackId {
        self.declaration.id
    }

    /// Unit the narration is about.
    pub fn subject(&self) -> EntityId {
        self.declaration.attacker
    }

    /// Start a report entry about the attacker.
    pub fn entry(&self, id: ReportId) -> ReportEntry {
        ReportEntry::new(id, self.subject())
    }

    pub fn push_report(&mut self, entry: ReportEntry) {
        self.reports.push(entry);
    }

    pub fn defer_report(&mut self, entry: ReportEntry) {
        self.deferred.push(entry);
    }

    pub fn effect(&mut self, effect: SideEffect) {
        self.side_effects.push(effect);
    }

    /// Sum of the cluster modifiers assembled so far.
    pub fn net_modifier(&self) -> i32 {
        self.modifiers.iter().map(|m| m.value).sum()
    }

    pub fn into_outcome(self) -> ResolutionOutcome {
        ResolutionOutcome {
            attack_id: self.declaration.id,
            status: self.status,
            hit: self.hit,
            hits_landed: self.hits_landed,
            damage_events: self.damage_events,
            reports: self.reports,
            side_effects: self.side_effects,
            failure: self.failure,
        }
    }
}
