//! Developer tooling for the island agent.
//!
//! Run with: `cargo run -p island-cli -- <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Advise, Classify, InspectSave, Parse};

/// Developer tools for the island agent
#[derive(Parser)]
#[command(name = "island")]
#[command(about = "Inspect advice parsing and saved agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Show how an utterance is interpreted
    Parse(Parse),

    /// Run the intent classifier on raw text
    Classify(Classify),

    /// Interactive advice console over stdin
    Advise(Advise),

    /// Decode a save file and report its contents
    InspectSave(InspectSave),
}

fn main() -> Result<()> {
    // Load .env file if it exists (ISLAND_* overrides)
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
        Command::Parse(cmd) => cmd.execute(),
        Command::Classify(cmd) => cmd.execute(),
        Command::Advise(cmd) => cmd.execute(),
        Command::InspectSave(cmd) => cmd.execute(),
    }
}
