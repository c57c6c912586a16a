//! Collaborators injected into resolution.
//!
//! The engine never owns board, unit or dice state. Everything it reads or
//! mutates goes through the traits re-exported here, bundled per call in a
//! [`CombatEnv`].
mod board;
mod entities;
mod error;
mod rng;
mod to_hit;

pub use board::{BoardState, BuildingInfo, GuidanceTag};
pub use entities::EntityRegistry;
pub use error::OracleError;
pub use rng::{PcgRng, RandomSource, ScriptedRolls, compute_seed};
pub use to_hit::ToHitResolver;

use crate::config::RulesConfig;
use crate::types::PhaseInfo;

/// Exclusive borrows of every collaborator for the duration of one
/// resolution call.
pub struct CombatEnv<'a> {
    pub board: &'a mut dyn BoardState,
    pub entities: &'a mut dyn EntityRegistry,
    pub rng: &'a mut dyn RandomSource,
    pub rules: &'a RulesConfig,
    pub phase: PhaseInfo,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        board: &'a mut dyn BoardState,
        entities: &'a mut dyn EntityRegistry,
        rng: &'a mut dyn RandomSource,
        rules: &'a RulesConfig,
        phase: PhaseInfo,
    ) -> Self {
        Self {
            board,
            entities,
            rng,
            rules,
            phase,
        }
    }
}
