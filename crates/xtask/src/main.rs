//! Development tasks for the combat workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{HitTable, ListScenarios, Simulate};

/// Development tasks for the combat workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for combat resolution", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario phase by phase and print the narration
    Simulate(Simulate),

    /// List scenarios available in the data directory
    Scenarios(ListScenarios),

    /// Print the cluster hit table for a volley size
    HitTable(HitTable),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for COMBAT_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::Scenarios(cmd) => cmd.execute(),
        Command::HitTable(cmd) => cmd.execute(),
    }
}
