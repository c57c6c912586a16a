//! Structured record of every resolved phase.
//!
//! The log keeps the full [`ResolutionOutcome`] of each attack so callers can
//! replay narration or inspect damage without re-running the dice. It is
//! exported as JSON.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use combat_core::{AttackId, EntityId, PhaseInfo, ResolutionOutcome, ToHitResult};

use super::errors::{Result, RuntimeError};

/// Where an attack record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AttackSource {
    /// Declared during this phase.
    Declared,
    /// An artillery round from an earlier phase landing now.
    Impact,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attack_id: AttackId,
    pub attacker: EntityId,
    pub source: AttackSource,
    pub to_hit: ToHitResult,
    pub outcome: ResolutionOutcome,
}

impl AttackRecord {
    pub fn lines(&self) -> Vec<String> {
        self.outcome.rendered_reports()
    }

    pub fn failed(&self) -> bool {
        self.outcome.failure.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: PhaseInfo,
    /// Flights whose countdown moved this phase.
    pub advanced: Vec<AttackId>,
    pub attacks: Vec<AttackRecord>,
}

impl PhaseRecord {
    pub fn new(phase: PhaseInfo) -> Self {
        Self {
            phase,
            advanced: Vec::new(),
            attacks: Vec::new(),
        }
    }

    pub fn attack(&self, id: AttackId) -> Option<&AttackRecord> {
        self.attacks.iter().find(|record| record.attack_id == id)
    }

    pub fn impacts(&self) -> impl Iterator<Item = &AttackRecord> {
        self.attacks
            .iter()
            .filter(|record| record.source == AttackSource::Impact)
    }

    pub fn failures(&self) -> usize {
        self.attacks.iter().filter(|record| record.failed()).count()
    }

    pub fn damage_applied(&self) -> u32 {
        self.attacks
            .iter()
            .map(|record| record.outcome.total_damage_applied())
            .sum()
    }

    /// Narration for the whole phase, attack by attack.
    pub fn lines(&self) -> Vec<String> {
        self.attacks.iter().flat_map(AttackRecord::lines).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseLog {
    phases: Vec<PhaseRecord>,
}

impl PhaseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PhaseRecord) -> &PhaseRecord {
        self.phases.push(record);
        &self.phases[self.phases.len() - 1]
    }

    pub fn phases(&self) -> &[PhaseRecord] {
        &self.phases
    }

    pub fn last(&self) -> Option<&PhaseRecord> {
        self.phases.last()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Every record for `id` across phases, oldest first.
    pub fn history(&self, id: AttackId) -> impl Iterator<Item = &AttackRecord> {
        self.phases
            .iter()
            .filter_map(move |phase| phase.attack(id))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(RuntimeError::Encode)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
