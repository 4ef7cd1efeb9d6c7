//! Subcommand implementations

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tally_core::{GenesisConfig, ReplayChecker, ReplayError};
use tally_crypto::KeyPair;
use tally_storage::{MemoryStore, StoreSnapshot};
use tally_types::{read_signed_message, EnvelopeError, SignedMessage};

/// Load a snapshot and replay it from genesis
pub fn replay(genesis: Option<&Path>, store: &Path) -> Result<()> {
    let genesis = match genesis {
        Some(path) => GenesisConfig::load(path)
            .with_context(|| format!("loading genesis from {}", path.display()))?,
        None => GenesisConfig::default(),
    };
    let snapshot = StoreSnapshot::load(store)
        .with_context(|| format!("loading store snapshot {}", store.display()))?;
    let store = MemoryStore::from_snapshot(snapshot)?;

    match ReplayChecker::new(genesis).check(&store) {
        Ok(report) => {
            println!(
                "replay ok: {} blocks, {} accounts",
                report.blocks_replayed, report.accounts_checked
            );
            Ok(())
        }
        Err(ReplayError::Inconsistent(mismatches)) => {
            for mismatch in &mismatches {
                println!("mismatch {}", mismatch);
            }
            bail!("{} accounts inconsistent with the store", mismatches.len())
        }
        Err(e) => Err(e.into()),
    }
}

/// Read signed-message lines and print a verdict for each
pub fn inspect(input: Option<&Path>) -> Result<()> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            inspect_lines(&mut BufReader::new(file))
        }
        None => inspect_lines(&mut io::stdin().lock()),
    }
}

fn inspect_lines<R: BufRead>(reader: &mut R) -> Result<()> {
    let mut total = 0usize;
    let mut rejected = 0usize;
    loop {
        let line_no = total + 1;
        match read_signed_message(reader) {
            Ok(None) => break,
            Ok(Some(SignedMessage::KeepAlive)) => println!("line {}: keep-alive", line_no),
            Ok(Some(message)) => println!("line {}: {}", line_no, describe(&message)),
            // Truncated final line
            Err(EnvelopeError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                rejected += 1;
                println!("line {}: rejected: {}", line_no, e);
            }
            Err(EnvelopeError::Io(e)) => return Err(e.into()),
            Err(e) => {
                rejected += 1;
                println!("line {}: rejected: {}", line_no, e);
            }
        }
        total = line_no;
    }

    tracing::info!("Inspected {} lines, {} rejected", total, rejected);
    if rejected > 0 {
        bail!("{} of {} lines rejected", rejected, total);
    }
    Ok(())
}

fn describe(message: &SignedMessage) -> String {
    match (message.message(), message.signer()) {
        (Some(m), Some(signer)) => format!("{} from {}", m.tag(), signer),
        _ => "keep-alive".to_string(),
    }
}

/// Print the identity of a secret phrase
pub fn identity(phrase: &str) -> Result<()> {
    println!("{}", KeyPair::from_secret_phrase(phrase).identity());
    Ok(())
}
