//! Messages exchanged between nodes
//!
//! Each message encodes as `<Tag>:<json>`, the same layout as operations.

use crate::account::Account;
use crate::block::Block;
use crate::chunk::LedgerChunk;
use crate::codec::{encode_tagged, split_tagged};
use crate::error::CodecError;
use crate::signed_operation::SignedOperation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_primitives::{Identity, Slot};

/// Gossip of pending operations
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationMessage {
    /// Signed operations awaiting inclusion
    pub operations: Vec<SignedOperation>,
}

/// A chunk proposed for a slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMessage {
    /// Slot the chunk is proposed for
    pub slot: Slot,
    /// Proposed chunk
    pub chunk: LedgerChunk,
}

/// Request for ledger data. Either field may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMessage {
    /// Account to look up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Identity>,
    /// Slot of the block to look up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Slot>,
}

/// Reply to a query. A `None` account means it does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMessage {
    /// Last finalized slot the data reflects
    #[serde(default)]
    pub slot: Slot,
    /// Requested accounts
    #[serde(default)]
    pub accounts: BTreeMap<Identity, Option<Account>>,
    /// Requested blocks by slot
    #[serde(default)]
    pub blocks: BTreeMap<Slot, Block>,
}

/// Any message that can travel inside a signed envelope
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Pending operations
    Operation(OperationMessage),
    /// Proposed chunk
    Chunk(ChunkMessage),
    /// Data request
    Query(QueryMessage),
    /// Data response
    Data(DataMessage),
}

impl Message {
    /// Wire tag
    pub fn tag(&self) -> &'static str {
        match self {
            Message::Operation(_) => "Operation",
            Message::Chunk(_) => "Chunk",
            Message::Query(_) => "Query",
            Message::Data(_) => "Data",
        }
    }

    /// Canonical `<Tag>:<json>` encoding
    pub fn encode(&self) -> Result<String, CodecError> {
        let tag = self.tag();
        match self {
            Message::Operation(m) => encode_tagged(tag, m),
            Message::Chunk(m) => encode_tagged(tag, m),
            Message::Query(m) => encode_tagged(tag, m),
            Message::Data(m) => encode_tagged(tag, m),
        }
    }

    /// Decode a `<Tag>:<json>` string
    pub fn decode(encoded: &str) -> Result<Self, CodecError> {
        let (tag, body) = split_tagged(encoded)?;
        let message = match tag {
            "Operation" => Message::Operation(serde_json::from_str(body)?),
            "Chunk" => Message::Chunk(serde_json::from_str(body)?),
            "Query" => Message::Query(serde_json::from_str(body)?),
            "Data" => Message::Data(serde_json::from_str(body)?),
            other => return Err(CodecError::UnknownMessageType(other.to_string())),
        };
        Ok(message)
    }
}

impl From<OperationMessage> for Message {
    fn from(m: OperationMessage) -> Self {
        Message::Operation(m)
    }
}

impl From<ChunkMessage> for Message {
    fn from(m: ChunkMessage) -> Self {
        Message::Chunk(m)
    }
}

impl From<QueryMessage> for Message {
    fn from(m: QueryMessage) -> Self {
        Message::Query(m)
    }
}

impl From<DataMessage> for Message {
    fn from(m: DataMessage) -> Self {
        Message::Data(m)
    }
}
