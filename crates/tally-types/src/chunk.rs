//! Ledger chunks: the unit of agreement for one slot

use crate::account::Account;
use crate::signed_operation::SignedOperation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_primitives::Identity;

/// Maximum number of operations in a single chunk
pub const MAX_CHUNK_SIZE: usize = 100;

/// An ordered batch of signed operations plus the account states expected
/// after applying them.
///
/// A `None` entry in `state` asserts that the account does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerChunk {
    /// Operations, applied in order
    pub operations: Vec<SignedOperation>,
    /// Expected post-state of every touched account
    pub state: BTreeMap<Identity, Option<Account>>,
}

impl LedgerChunk {
    /// Create a chunk
    pub fn new(
        operations: Vec<SignedOperation>,
        state: BTreeMap<Identity, Option<Account>>,
    ) -> Self {
        Self { operations, state }
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True if the chunk carries no operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// True if the chunk exceeds [`MAX_CHUNK_SIZE`]
    pub fn is_oversized(&self) -> bool {
        self.operations.len() > MAX_CHUNK_SIZE
    }
}
