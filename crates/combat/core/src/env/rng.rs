//! Injectable dice.
//!
//! Every roll made during resolution goes through [`RandomSource`], so a
//! seeded generator replays a game exactly and tests can script the dice.

use std::collections::VecDeque;

/// Source of six-sided dice rolls.
pub trait RandomSource {
    /// Roll one die (1-6 inclusive).
    fn roll_d6(&mut self) -> u8;

    /// Roll two dice and return their sum (2-12 inclusive).
    fn roll_two_dice(&mut self) -> u8 {
        self.roll_d6() + self.roll_d6()
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// The state advances on every call, so one generator serves a whole attack
/// or phase. Seed it with [`compute_seed`] to give each attack an independent
/// but reproducible stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let state = self.step();
        Self::output(state)
    }
}

impl RandomSource for PcgRng {
    fn roll_d6(&mut self) -> u8 {
        (self.next_u32() % 6) as u8 + 1
    }
}

/// Derive a per-attack seed from the game seed.
///
/// `context` separates independent streams for the same attack (for example
/// the declaration roll and the later artillery impact).
pub fn compute_seed(game_seed: u64, attack_id: u64, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= attack_id.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Pre-recorded dice for replays and tests.
///
/// `roll_two_dice` consumes one recorded value as the full 2d6 total and
/// `roll_d6` consumes one value as a single die. When the script runs dry the
/// source keeps answering with average rolls (7 and 3) and counts the
/// overrun so callers can detect an incomplete script.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<u8>,
    overruns: u32,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            overruns: 0,
        }
    }

    pub fn push(&mut self, roll: u8) {
        self.rolls.push_back(roll);
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    fn next_or(&mut self, fallback: u8) -> u8 {
        match self.rolls.pop_front() {
            Some(roll) => roll,
            None => {
                self.overruns += 1;
                fallback
            }
        }
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_d6(&mut self) -> u8 {
        self.next_or(3)
    }

    fn roll_two_dice(&mut self) -> u8 {
        self.next_or(7)
    }
}
