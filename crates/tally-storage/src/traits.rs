//! Persistence interface

use crate::error::StorageResult;
use std::ops::ControlFlow;
use tally_primitives::{Identity, Slot};
use tally_state::AccountMap;
use tally_types::{Account, Block};

/// Account table and block log.
///
/// Each call observes one consistent snapshot of the store. Isolation across
/// calls is the implementation's business.
pub trait LedgerStore {
    /// Get an account
    fn get_account(&self, id: &Identity) -> StorageResult<Option<Account>>;

    /// Insert or replace an account
    fn upsert_account(&self, id: Identity, account: Account) -> StorageResult<()>;

    /// Visit every stored account
    fn for_each_account(&self, f: &mut dyn FnMut(&Identity, &Account)) -> StorageResult<()>;

    /// Get the block for a slot
    fn get_block(&self, slot: Slot) -> StorageResult<Option<Block>>;

    /// Append a block.
    ///
    /// Fails with [`StorageError::DuplicateBlock`](crate::StorageError::DuplicateBlock)
    /// if the slot is taken.
    ///
    /// # Panics
    ///
    /// If the slot is not exactly one past [`last_slot`](Self::last_slot).
    fn insert_block(&self, block: Block) -> StorageResult<()>;

    /// Visit blocks in slot order until the callback breaks, failing with
    /// [`StorageError::SlotGap`](crate::StorageError::SlotGap) if slots are not
    /// contiguous from 1
    fn for_each_block(&self, f: &mut dyn FnMut(&Block) -> ControlFlow<()>) -> StorageResult<()>;

    /// Highest stored slot, 0 when there are no blocks
    fn last_slot(&self) -> StorageResult<Slot>;

    /// Number of stored accounts
    fn account_count(&self) -> StorageResult<usize> {
        let mut count = 0;
        self.for_each_account(&mut |_, _| count += 1)?;
        Ok(count)
    }
}

/// Write the own layer of an account map to the store. Returns the number of
/// accounts written.
pub fn commit_changes(store: &dyn LedgerStore, map: &AccountMap<'_>) -> StorageResult<usize> {
    let mut written = 0;
    for (id, account) in map.changes() {
        store.upsert_account(*id, *account)?;
        written += 1;
    }
    tracing::debug!("Committed {} account changes", written);
    Ok(written)
}
