//! Replay of the block log against the stored account table

use crate::genesis::{GenesisConfig, GenesisError};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;
use tally_primitives::{Identity, Slot};
use tally_state::AccountMap;
use tally_storage::{LedgerStore, StorageError};
use tally_types::Account;
use thiserror::Error;

/// An account whose replayed state differs from the stored one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMismatch {
    /// Account owner
    pub id: Identity,
    /// State produced by replay, `None` if replay never created it
    pub replayed: Option<Account>,
    /// State held by the store, `None` if absent there
    pub stored: Option<Account>,
}

impl fmt::Display for AccountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: replayed {:?}, stored {:?}",
            self.id, self.replayed, self.stored
        )
    }
}

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Genesis config is unusable
    #[error("genesis error: {0}")]
    Genesis(#[from] GenesisError),

    /// Store could not be read
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored chunk does not apply on top of its predecessors
    #[error("chunk at slot {slot} does not apply")]
    ChunkRejected {
        /// Failing slot
        slot: Slot,
    },

    /// Replay succeeded but the account table disagrees with it
    #[error("{} accounts inconsistent with the store", .0.len())]
    Inconsistent(Vec<AccountMismatch>),
}

/// Outcome of a successful replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    /// Number of blocks applied
    pub blocks_replayed: u32,
    /// Number of accounts compared with the store
    pub accounts_checked: usize,
}

/// Rebuilds ledger state from genesis and the block log, then checks it
/// against the stored accounts
pub struct ReplayChecker {
    genesis: GenesisConfig,
}

impl ReplayChecker {
    /// Create a checker seeded from `genesis`
    pub fn new(genesis: GenesisConfig) -> Self {
        Self { genesis }
    }

    /// Replay every block and compare the result with the store
    pub fn check(&self, store: &dyn LedgerStore) -> Result<ReplayReport, ReplayError> {
        let mut map = AccountMap::new();
        self.genesis.seed(&mut map)?;

        tracing::info!("Replaying blocks...");
        let blocks_replayed = Self::replay_blocks(&mut map, store)?;

        let replayed = map.accounts();
        let mismatches = Self::compare(&replayed, store)?;
        if !mismatches.is_empty() {
            for mismatch in &mismatches {
                tracing::warn!("Account mismatch: {}", mismatch);
            }
            return Err(ReplayError::Inconsistent(mismatches));
        }

        let report = ReplayReport {
            blocks_replayed,
            accounts_checked: replayed.len(),
        };
        tracing::info!(
            "Replay consistent: blocks={}, accounts={}",
            report.blocks_replayed,
            report.accounts_checked
        );
        Ok(report)
    }

    fn replay_blocks(
        map: &mut AccountMap<'_>,
        store: &dyn LedgerStore,
    ) -> Result<u32, ReplayError> {
        let mut applied = 0u32;
        let mut rejected = None;
        store.for_each_block(&mut |block| {
            if !map.process_chunk(&block.chunk) {
                rejected = Some(block.slot);
                return ControlFlow::Break(());
            }
            applied += 1;
            tracing::debug!(
                "Replayed block {} ({} operations)",
                block.slot,
                block.chunk.len()
            );
            ControlFlow::Continue(())
        })?;

        match rejected {
            Some(slot) => {
                tracing::warn!("Replay stopped: chunk at slot {} rejected", slot);
                Err(ReplayError::ChunkRejected { slot })
            }
            None => Ok(applied),
        }
    }

    // Both directions: replayed accounts must be stored, stored accounts must be replayed
    fn compare(
        replayed: &BTreeMap<Identity, Account>,
        store: &dyn LedgerStore,
    ) -> Result<Vec<AccountMismatch>, ReplayError> {
        let mut mismatches = Vec::new();
        for (id, account) in replayed {
            let stored = store.get_account(id)?;
            if stored.as_ref() != Some(account) {
                mismatches.push(AccountMismatch {
                    id: *id,
                    replayed: Some(*account),
                    stored,
                });
            }
        }

        store.for_each_account(&mut |id, account| {
            if !replayed.contains_key(id) {
                mismatches.push(AccountMismatch {
                    id: *id,
                    replayed: None,
                    stored: Some(*account),
                });
            }
        })?;

        Ok(mismatches)
    }
}
