//! In-memory ledger store

use crate::error::{StorageError, StorageResult};
use crate::snapshot::StoreSnapshot;
use crate::traits::LedgerStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use tally_primitives::{Identity, Slot};
use tally_types::{Account, Block};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<Identity, Account>,
    blocks: BTreeMap<Slot, Block>,
}

/// Store kept entirely in memory behind a read-write lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot.
    ///
    /// Blocks are taken as given; gaps surface from
    /// [`for_each_block`](LedgerStore::for_each_block).
    pub fn from_snapshot(snapshot: StoreSnapshot) -> StorageResult<Self> {
        let mut blocks = BTreeMap::new();
        for block in snapshot.blocks {
            let slot = block.slot;
            if blocks.insert(slot, block).is_some() {
                return Err(StorageError::DuplicateBlock(slot));
            }
        }
        Ok(Self {
            tables: RwLock::new(Tables {
                accounts: snapshot.accounts,
                blocks,
            }),
        })
    }

    /// Copy the current contents into a snapshot
    pub fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.read();
        StoreSnapshot {
            accounts: tables.accounts.clone(),
            blocks: tables.blocks.values().cloned().collect(),
        }
    }

    /// Number of stored blocks
    pub fn block_count(&self) -> usize {
        self.tables.read().blocks.len()
    }
}

impl LedgerStore for MemoryStore {
    fn get_account(&self, id: &Identity) -> StorageResult<Option<Account>> {
        Ok(self.tables.read().accounts.get(id).copied())
    }

    fn upsert_account(&self, id: Identity, account: Account) -> StorageResult<()> {
        self.tables.write().accounts.insert(id, account);
        Ok(())
    }

    fn for_each_account(&self, f: &mut dyn FnMut(&Identity, &Account)) -> StorageResult<()> {
        // copy out so the callback may use the store
        let accounts = self.tables.read().accounts.clone();
        for (id, account) in &accounts {
            f(id, account);
        }
        Ok(())
    }

    fn get_block(&self, slot: Slot) -> StorageResult<Option<Block>> {
        Ok(self.tables.read().blocks.get(&slot).cloned())
    }

    fn insert_block(&self, block: Block) -> StorageResult<()> {
        let mut tables = self.tables.write();
        if tables.blocks.contains_key(&block.slot) {
            return Err(StorageError::DuplicateBlock(block.slot));
        }
        let last = tables.blocks.keys().next_back().copied().unwrap_or(0);
        assert_eq!(
            block.slot,
            last + 1,
            "inserting block for slot {} but last slot is {}",
            block.slot,
            last
        );
        tracing::debug!("Inserted block {}", block.slot);
        tables.blocks.insert(block.slot, block);
        Ok(())
    }

    fn for_each_block(&self, f: &mut dyn FnMut(&Block) -> ControlFlow<()>) -> StorageResult<()> {
        let blocks: Vec<Block> = self.tables.read().blocks.values().cloned().collect();
        let mut expected: Slot = 1;
        for block in &blocks {
            if block.slot != expected {
                return Err(StorageError::SlotGap {
                    expected,
                    found: block.slot,
                });
            }
            if f(block).is_break() {
                break;
            }
            expected += 1;
        }
        Ok(())
    }

    fn last_slot(&self) -> StorageResult<Slot> {
        Ok(self
            .tables
            .read()
            .blocks
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0))
    }
}
