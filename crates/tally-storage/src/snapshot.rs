//! JSON snapshots of a store

use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tally_primitives::Identity;
use tally_types::{Account, Block};

/// Full contents of a store: the account table and the block log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Account table
    #[serde(default)]
    pub accounts: BTreeMap<Identity, Account>,
    /// Blocks, normally in slot order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl StoreSnapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StorageError::Deserialization(e.to_string()))
    }

    /// Write the snapshot as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
