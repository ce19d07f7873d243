//! Development tasks for the raid engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod bots;
mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Simulate;

/// Development tasks for the raid engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the raid engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run seeded raids end-to-end with bot players
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RAID_* overrides)
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
    }
}
