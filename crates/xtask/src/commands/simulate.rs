//! Run a scenario script through the phase runner.
//!
//! Prints every phase's narration and a closing summary of the survivors;
//! the full phase log can also be written as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_runtime::{
    ArtilleryRepository, AttackSource, LoadedScenario, PhaseRunner, RuntimeConfig,
};

/// Run a scenario and print the narration
#[derive(Parser)]
pub struct Simulate {
    /// Scenario name (file stem under `scenarios/`)
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Content directory (defaults to the bundled data)
    #[arg(short, long, value_name = "DIR", env = "COMBAT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the scenario's game seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Gunnery skill used for computed to-hit numbers
    #[arg(short, long)]
    gunnery: Option<i32>,

    /// Every sub-shot lands; the cluster table is bypassed
    #[arg(long)]
    all_shots_hit: bool,

    /// Write the phase log as JSON
    #[arg(short, long, value_name = "FILE")]
    json: Option<PathBuf>,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let factory = super::factory(self.data_dir);
        let LoadedScenario {
            scenario,
            battlefield,
            mut rules,
        } = LoadedScenario::load(&factory, &self.scenario)
            .with_context(|| format!("Failed to load scenario '{}'", self.scenario))?;
        if self.all_shots_hit {
            rules = rules.with_all_shots_hit();
        }

        let mut config = RuntimeConfig::new(rules);
        config.seed = self.seed.or(scenario.seed);
        if let Some(gunnery) = self.gunnery {
            config = config.with_gunnery(gunnery);
        }

        let mut runner = PhaseRunner::new(config, battlefield);
        println!("{} {}", style("Scenario:").bold().cyan(), scenario.name);
        println!("{} {}", style("Seed:").bold().cyan(), runner.seed());
        println!();

        runner.run_script(&scenario.phases)?;

        for phase in runner.log().phases() {
            println!(
                "{}",
                style(format!("=== Turn {} / {} phase ===", phase.phase.turn, phase.phase.kind))
                    .bold()
                    .green()
            );
            for record in &phase.attacks {
                let id = record.attack_id;
                let tag = match record.source {
                    AttackSource::Declared => style(format!("[{id}]")).yellow(),
                    AttackSource::Impact => style(format!("[{id} impact]")).magenta(),
                };
                println!("{tag}");
                for line in record.lines() {
                    println!("  {line}");
                }
                if let Some(failure) = &record.outcome.failure {
                    println!("  {} {}", style("failed:").red(), failure);
                }
            }
            println!();
        }

        print_summary(&runner)?;

        if let Some(path) = self.json {
            runner
                .log()
                .write_json(&path)
                .with_context(|| format!("Failed to write phase log: {}", path.display()))?;
            println!("{} {}", style("Phase log:").bold().cyan(), path.display());
        }
        Ok(())
    }
}

fn print_summary(runner: &PhaseRunner) -> Result<()> {
    println!("{}", style("=== Summary ===").bold().green());
    let roster = &runner.battlefield().roster;
    for (id, unit) in roster.units() {
        let status = if unit.destroyed {
            style("destroyed".to_string()).red()
        } else {
            style(format!("heat {}", unit.heat)).dim()
        };
        println!("  {} {} (team {}) {}", id, unit.name, unit.team, status);
    }
    for building in runner.battlefield().board.buildings() {
        println!("  building {} CF {}", building.id.0, building.cf);
    }
    println!("  rounds in flight: {}", runner.flights().len()?);
    Ok(())
}
