//! List the scenarios a data directory provides.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

/// List available scenarios
#[derive(Parser)]
pub struct ListScenarios {
    /// Content directory (defaults to the bundled data)
    #[arg(short, long, value_name = "DIR", env = "COMBAT_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

impl ListScenarios {
    pub fn execute(self) -> Result<()> {
        let factory = super::factory(self.data_dir);
        let catalog = factory.load_weapons()?;
        println!(
            "{} {}",
            style("Data Directory:").bold().cyan(),
            factory.data_dir().display()
        );
        for name in factory.scenario_names()? {
            match factory.load_scenario(&name, &catalog) {
                Ok(scenario) => println!(
                    "  {} ({} units, {} phases)",
                    style(&name).green(),
                    scenario.units.len(),
                    scenario.phases.len()
                ),
                Err(err) => println!("  {} {}", style(&name).red(), style(err).dim()),
            }
        }
        Ok(())
    }
}
