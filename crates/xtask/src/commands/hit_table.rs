//! Print the cluster hit table.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;

use combat_core::hits_landed;

/// Print how many sub-shots land for each cluster roll
#[derive(Parser)]
pub struct HitTable {
    /// Volley size in sub-shots
    #[arg(value_name = "SHOTS")]
    shots: u32,

    /// Net cluster modifier applied to every roll
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    modifier: i32,
}

impl HitTable {
    pub fn execute(self) -> Result<()> {
        if self.shots == 0 {
            bail!("a volley needs at least one sub-shot");
        }
        println!(
            "{} {} sub-shots, modifier {:+}",
            style("Cluster Table:").bold().cyan(),
            self.shots,
            self.modifier
        );
        for roll in 2..=12u8 {
            let hits = hits_landed(self.shots, self.modifier, roll, false);
            println!("  {:>2}  {:>3}", style(roll).yellow(), hits);
        }
        Ok(())
    }
}
