//! # tally-types
//!
//! Core ledger types for Tally.
//!
//! This crate provides:
//! - [`Account`](account::Account) - per-identity sequence and balance
//! - [`Operation`](operation::Operation) - transfers and storage operations
//! - [`SignedOperation`](signed_operation::SignedOperation) - operations with their signature
//! - [`LedgerChunk`](chunk::LedgerChunk) and [`Block`](block::Block)
//! - [`Message`](message::Message) and the [`SignedMessage`](signed_message::SignedMessage)
//!   line envelope

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod block;
pub mod bucket;
pub mod chunk;
pub mod codec;
pub mod error;
pub mod message;
pub mod operation;
pub mod signed_message;
pub mod signed_operation;
pub mod transaction;

// Re-export commonly used types
pub use account::Account;
pub use block::{Block, ConsensusMetadata};
pub use bucket::{is_valid_bucket_name, MAX_BUCKET_NAME_LEN};
pub use chunk::{LedgerChunk, MAX_CHUNK_SIZE};
pub use error::CodecError;
pub use message::{ChunkMessage, DataMessage, Message, OperationMessage, QueryMessage};
pub use operation::{
    AllocateOperation, DeallocateOperation, DeleteOperation, Operation, OperationBody,
    OperationKind,
};
pub use signed_message::{read_signed_message, EnvelopeError, SignedMessage, KEEP_ALIVE};
pub use signed_operation::SignedOperation;
pub use transaction::Transaction;
