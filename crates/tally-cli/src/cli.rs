//! CLI argument parsing for tally

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tally ledger tools
#[derive(Parser, Debug, Clone)]
#[command(name = "tally")]
#[command(about = "Tally ledger tools")]
#[command(version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay a store snapshot from genesis and check its account table
    Replay {
        /// Genesis file path (uses the default distribution if not specified)
        #[arg(long)]
        genesis: Option<PathBuf>,

        /// Store snapshot (JSON)
        #[arg(long)]
        store: PathBuf,
    },

    /// Authenticate signed-message lines and report on each
    Inspect {
        /// Input file (reads stdin if not specified)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the identity derived from a secret phrase
    Identity {
        /// Secret phrase
        phrase: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_args() {
        let cli = Cli::parse_from(["tally", "replay", "--store", "store.json"]);
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Command::Replay { genesis, store } => {
                assert!(genesis.is_none());
                assert_eq!(store, PathBuf::from("store.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replay_requires_store() {
        assert!(Cli::try_parse_from(["tally", "replay"]).is_err());
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::parse_from(["tally", "inspect", "--log-level", "debug"]);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Inspect { input: None }));
    }

    #[test]
    fn test_identity_phrase() {
        let cli = Cli::parse_from(["tally", "identity", "mint"]);
        match cli.command {
            Command::Identity { phrase } => assert_eq!(phrase, "mint"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
