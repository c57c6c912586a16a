//! Phase-by-phase orchestration of attack resolution.
//!
//! [`PhaseRunner`] owns the battlefield, the rules in force and the store of
//! in-flight artillery. Each call to [`PhaseRunner::run_phase`] advances
//! pending rounds, lands the ones that are due and then resolves the
//! phase's declarations in order. A failed attack is logged and never stops
//! the rest of the phase.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use combat_content::PhaseSpec;
use combat_core::{
    AttackDeclaration, AttackId, CombatEnv, EntityId, FlightStatus, PcgRng, PhaseInfo,
    ResolutionOutcome, RulesConfig, ToHitResult, compute_seed, resolve, resolve_artillery,
};

use crate::api::{AttackRecord, AttackSource, PhaseLog, PhaseRecord, Result, RuntimeError};
use crate::oracle::RangeToHit;
use crate::repository::{ArtilleryRepository, InMemoryArtilleryRepo};
use crate::scenario::Battlefield;

/// Seed stream for attacks declared in the current phase.
const DECLARATION_STREAM: u32 = 0;
/// Seed stream for artillery rounds landing.
const IMPACT_STREAM: u32 = 1;

/// Runtime configuration shared by every phase of a game.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    /// Game seed. A random one is drawn when absent.
    pub seed: Option<u64>,
    pub gunnery: i32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            seed: None,
            gunnery: RangeToHit::DEFAULT_GUNNERY,
        }
    }
}

impl RuntimeConfig {
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gunnery(mut self, gunnery: i32) -> Self {
        self.gunnery = gunnery;
        self
    }
}

/// One attack to resolve this phase, optionally with a fixed to-hit result.
#[derive(Debug, Clone)]
pub struct PlannedAttack {
    pub declaration: AttackDeclaration,
    pub to_hit: Option<ToHitResult>,
}

impl PlannedAttack {
    pub fn new(declaration: AttackDeclaration) -> Self {
        Self {
            declaration,
            to_hit: None,
        }
    }

    pub fn with_to_hit(mut self, to_hit: ToHitResult) -> Self {
        self.to_hit = Some(to_hit);
        self
    }
}

pub struct PhaseRunner<R: ArtilleryRepository = InMemoryArtilleryRepo> {
    battlefield: Battlefield,
    rules: RulesConfig,
    seed: u64,
    gunnery: i32,
    flights: R,
    log: PhaseLog,
    /// Ids of every declaration already resolved in this game.
    declared: BTreeSet<AttackId>,
    next_attack: u64,
}

impl PhaseRunner<InMemoryArtilleryRepo> {
    pub fn new(config: RuntimeConfig, battlefield: Battlefield) -> Self {
        Self::with_repository(config, battlefield, InMemoryArtilleryRepo::new())
    }
}

impl<R: ArtilleryRepository> PhaseRunner<R> {
    pub fn with_repository(config: RuntimeConfig, battlefield: Battlefield, flights: R) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(target: "runtime", seed, "phase runner ready");
        Self {
            battlefield,
            rules: config.rules,
            seed,
            gunnery: config.gunnery,
            flights,
            log: PhaseLog::new(),
            declared: BTreeSet::new(),
            next_attack: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.battlefield
    }

    pub fn flights(&self) -> &R {
        &self.flights
    }

    pub fn log(&self) -> &PhaseLog {
        &self.log
    }

    pub fn into_log(self) -> PhaseLog {
        self.log
    }

    /// Hand out the next attack id. Ids are never reused within a game.
    pub fn next_attack_id(&mut self) -> AttackId {
        let id = AttackId(self.next_attack);
        self.next_attack += 1;
        id
    }

    /// Resolve one phase.
    ///
    /// Order is fixed: anti-missile systems stand down, pending rounds count
    /// down, due rounds land in attack id order, then `attacks` resolve in the
    /// order given.
    pub fn run_phase(
        &mut self,
        phase: PhaseInfo,
        attacks: &[PlannedAttack],
    ) -> Result<&PhaseRecord> {
        self.check_ids(attacks)?;
        info!(
            target: "runtime::phase",
            turn = phase.turn,
            phase = %phase.kind,
            declared = attacks.len(),
            "phase started"
        );

        self.battlefield.roster.reset_ams();
        let mut record = PhaseRecord::new(phase);

        let mut due = Vec::new();
        for mut flight in self.flights.list()? {
            let before = flight.turns_remaining;
            let status = flight.advance(phase);
            if flight.turns_remaining != before {
                self.flights.update(&flight)?;
                record.advanced.push(flight.attack_id);
            }
            if status == FlightStatus::Due {
                due.push(flight);
            }
        }

        for flight in due {
            let to_hit = RangeToHit::new(&self.battlefield.roster)
                .with_gunnery(self.gunnery)
                .for_impact(&flight);
            let mut rng = PcgRng::new(compute_seed(self.seed, flight.attack_id.0, IMPACT_STREAM));
            let outcome = {
                let Battlefield { board, roster } = &mut self.battlefield;
                let mut env = CombatEnv::new(board, roster, &mut rng, &self.rules, phase);
                resolve_artillery(&flight, &to_hit, &mut env)
            };
            self.flights.remove(flight.attack_id)?;
            record.attacks.push(attack_record(
                flight.attack_id,
                flight.attacker(),
                AttackSource::Impact,
                to_hit,
                outcome,
            ));
        }

        for planned in attacks {
            let declaration = &planned.declaration;
            let to_hit = match &planned.to_hit {
                Some(to_hit) => to_hit.clone(),
                None => RangeToHit::new(&self.battlefield.roster)
                    .with_gunnery(self.gunnery)
                    .for_declaration(declaration, &self.battlefield.board),
            };
            let mut rng =
                PcgRng::new(compute_seed(self.seed, declaration.id.0, DECLARATION_STREAM));
            let outcome = {
                let Battlefield { board, roster } = &mut self.battlefield;
                let mut env = CombatEnv::new(board, roster, &mut rng, &self.rules, phase);
                resolve(declaration, &to_hit, &mut env)
            };
            self.declared.insert(declaration.id);
            if let Some(flight) = outcome.scheduled_flight() {
                self.flights.insert(flight.clone())?;
            }
            record.attacks.push(attack_record(
                declaration.id,
                declaration.attacker,
                AttackSource::Declared,
                to_hit,
                outcome,
            ));
        }

        info!(
            target: "runtime::phase",
            turn = phase.turn,
            phase = %phase.kind,
            resolved = record.attacks.len(),
            failed = record.failures(),
            damage = record.damage_applied(),
            in_flight = self.flights.len()?,
            "phase finished"
        );
        Ok(self.log.push(record))
    }

    /// Run every phase of a scenario script, assigning attack ids in order.
    pub fn run_script(&mut self, phases: &[PhaseSpec]) -> Result<&PhaseLog> {
        for spec in phases {
            let planned: Vec<_> = spec
                .attacks
                .iter()
                .map(|attack| {
                    let declared = PlannedAttack::new(attack.declare(self.next_attack_id()));
                    match attack.to_hit {
                        Some(value) => declared.with_to_hit(ToHitResult::new(value)),
                        None => declared,
                    }
                })
                .collect();
            self.run_phase(spec.info(), &planned)?;
        }
        Ok(&self.log)
    }

    /// An id may be declared once per game, even if its earlier resolution
    /// failed or its round has already landed.
    fn check_ids(&self, attacks: &[PlannedAttack]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for planned in attacks {
            let id = planned.declaration.id;
            if !seen.insert(id)
                || self.declared.contains(&id)
                || self.flights.get(id)?.is_some()
            {
                return Err(RuntimeError::DuplicateAttack(id));
            }
        }
        Ok(())
    }
}

fn attack_record(
    attack_id: AttackId,
    attacker: EntityId,
    source: AttackSource,
    to_hit: ToHitResult,
    outcome: ResolutionOutcome,
) -> AttackRecord {
    match &outcome.failure {
        Some(failure) => warn!(
            target: "runtime::attack",
            attack = attack_id.0,
            attacker = attacker.0,
            %source,
            error = %failure,
            "attack failed"
        ),
        None => debug!(
            target: "runtime::attack",
            attack = attack_id.0,
            attacker = attacker.0,
            %source,
            status = ?outcome.status,
            hits = outcome.hits_landed,
            damage = outcome.total_damage_applied(),
            "attack resolved"
        ),
    }
    AttackRecord {
        attack_id,
        attacker,
        source,
        to_hit,
        outcome,
    }
}
