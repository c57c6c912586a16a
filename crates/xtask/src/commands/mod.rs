//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod hit_table;
mod scenarios;
mod simulate;

pub use hit_table::HitTable;
pub use scenarios::ListScenarios;
pub use simulate::Simulate;

use std::path::PathBuf;

use combat_content::ContentFactory;

/// Content from `dir`, or the data bundled with `combat-content`.
fn factory(dir: Option<PathBuf>) -> ContentFactory {
    match dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    }
}
