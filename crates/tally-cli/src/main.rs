//! # tally
//!
//! Command-line tools for the Tally ledger.
//!
//! ## Usage
//!
//! ```bash
//! # Check a store snapshot against a replay from genesis
//! tally replay --store store.json --genesis genesis.json
//!
//! # Authenticate signed-message lines from a file or stdin
//! tally inspect --input capture.log
//!
//! # Identity of a secret phrase
//! tally identity mint
//! ```

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Command::Replay { genesis, store } => commands::replay(genesis.as_deref(), &store),
        Command::Inspect { input } => commands::inspect(input.as_deref()),
        Command::Identity { phrase } => commands::identity(&phrase),
    }
}
