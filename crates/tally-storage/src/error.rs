//! Storage error types

use tally_primitives::Slot;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A block for this slot is already stored
    #[error("duplicate block for slot {0}")]
    DuplicateBlock(Slot),

    /// Stored blocks are not contiguous
    #[error("slot gap: expected {expected}, found {found}")]
    SlotGap {
        /// Next slot in sequence
        expected: Slot,
        /// Slot actually stored
        found: Slot,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
