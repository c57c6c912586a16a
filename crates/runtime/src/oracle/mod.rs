//! In-memory implementations of the collaborators resolution consumes.
//!
//! [`Board`] and [`Roster`] own the mutable battlefield; [`RangeToHit`] is a
//! simple range-bracket to-hit resolver. All of them are built from a
//! scenario by [`crate::scenario::Battlefield`].
mod board;
mod roster;
mod to_hit;

pub use board::{Board, Building};
pub use roster::{Roster, Unit};
pub use to_hit::RangeToHit;
