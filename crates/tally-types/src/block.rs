//! Finalized blocks

use crate::chunk::LedgerChunk;
use serde::{Deserialize, Serialize};
use tally_primitives::Slot;

/// Ballot bounds recorded by consensus when the chunk was externalized.
/// Carried through storage, never interpreted here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusMetadata {
    /// Lowest committed ballot
    pub commit_low: u32,
    /// Highest committed ballot
    pub commit_high: u32,
}

/// A chunk finalized for a slot. Slots start at 1 and are contiguous.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Slot number
    pub slot: Slot,
    /// Agreed chunk
    pub chunk: LedgerChunk,
    /// Consensus bookkeeping
    #[serde(default)]
    pub consensus: ConsensusMetadata,
}

impl Block {
    /// Create a block with empty consensus metadata
    pub fn new(slot: Slot, chunk: LedgerChunk) -> Self {
        Self {
            slot,
            chunk,
            consensus: ConsensusMetadata::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consensus_defaults_when_missing() {
        let json = r#"{"slot":4,"chunk":{"operations":[],"state":{}}}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.slot, 4);
        assert_eq!(block.consensus, ConsensusMetadata::default());
        assert!(block.chunk.is_empty());
    }

    #[test]
    fn test_block_json_roundtrip() {
        let mut block = Block::new(2, LedgerChunk::default());
        block.consensus = ConsensusMetadata {
            commit_low: 1,
            commit_high: 3,
        };
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
