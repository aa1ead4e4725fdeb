//! `routecalc`: replays route scenarios and queries the calculator.
//!
//! Results go to stdout; logs go to stderr (`RUST_LOG`, default `info`).

mod commands;
mod logging;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Calc, Check, Damage, Replay, Rolls};
use session::ContentArgs;

/// Hidden-stat inference and damage ranges for route documents
#[derive(Parser)]
#[command(name = "routecalc")]
#[command(about = "Hidden-stat inference and damage ranges for route documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    content: ContentArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a scenario and print the inferred ranges of every tracker
    Replay(Replay),

    /// Evaluate a calc expression against a scenario
    Calc(Calc),

    /// Evaluate a stat condition against a scenario
    Check(Check),

    /// Print the damage table for one tracked stat
    Damage(Damage),

    /// Combine the rolls of consecutive hits against a kill threshold
    Rolls(Rolls),
}

fn main() -> Result<()> {
    // Load .env file if it exists (ROUTECALC_CONFIG, ROUTECALC_SPECIES, RUST_LOG)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::setup_logging()?;

    match cli.command {
        Command::Replay(cmd) => cmd.execute(&cli.content),
        Command::Calc(cmd) => cmd.execute(&cli.content),
        Command::Check(cmd) => cmd.execute(&cli.content),
        Command::Damage(cmd) => cmd.execute(&cli.content),
        Command::Rolls(cmd) => cmd.execute(&cli.content),
    }
}
