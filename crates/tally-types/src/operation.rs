//! Ledger operations
//!
//! Every operation is signed by one account, consumes one sequence number of
//! that account and pays a fee. The set of variants is closed: decoding is a
//! single `match` over the type tag.

use crate::bucket::is_valid_bucket_name;
use crate::codec::{encode_tagged, split_tagged};
use crate::error::CodecError;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_primitives::{Amount, Identity, Sequence};

/// Operation type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Currency transfer
    Transfer,
    /// Allocate a bucket to a provider
    Allocate,
    /// Release a bucket from a provider
    Deallocate,
    /// Delete a document
    Delete,
}

impl OperationKind {
    /// All known kinds
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Transfer,
        OperationKind::Allocate,
        OperationKind::Deallocate,
        OperationKind::Delete,
    ];

    /// Stable wire tag
    pub fn tag(&self) -> &'static str {
        match self {
            OperationKind::Transfer => "Transfer",
            OperationKind::Allocate => "Allocate",
            OperationKind::Deallocate => "Deallocate",
            OperationKind::Delete => "Delete",
        }
    }

    /// Look up a kind by its wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fields and checks shared by every operation variant
pub trait OperationBody {
    /// Type tag of this variant
    const KIND: OperationKind;

    /// Account that must sign the operation
    fn signer(&self) -> Identity;

    /// Sequence number consumed from the signer
    fn sequence(&self) -> Sequence;

    /// Fee paid by the signer
    fn fee(&self) -> Amount;

    /// Structural validity, independent of account state
    fn verify(&self) -> bool;
}

/// Allocate a bucket to a storage provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateOperation {
    /// Bucket owner or provider owner
    pub signer: Identity,
    /// Sequence number for this operation
    pub sequence: Sequence,
    /// Fee for entering the operation into the ledger
    pub fee: Amount,
    /// Bucket name
    pub name: String,
    /// Provider id
    pub id: u64,
}

/// Release a bucket from a storage provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeallocateOperation {
    /// Bucket owner or provider owner
    pub signer: Identity,
    /// Sequence number for this operation
    pub sequence: Sequence,
    /// Fee for entering the operation into the ledger
    pub fee: Amount,
    /// Bucket name
    pub name: String,
    /// Provider id
    pub id: u64,
}

/// Delete a document. Ownership is checked by the document store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOperation {
    /// Document owner
    pub signer: Identity,
    /// Sequence number for this operation
    pub sequence: Sequence,
    /// Fee for entering the operation into the ledger
    pub fee: Amount,
    /// Document id
    pub id: u64,
}

impl OperationBody for Transaction {
    const KIND: OperationKind = OperationKind::Transfer;

    fn signer(&self) -> Identity {
        self.from
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn fee(&self) -> Amount {
        self.fee
    }

    // Transfers are validated entirely against account state
    fn verify(&self) -> bool {
        true
    }
}

impl OperationBody for AllocateOperation {
    const KIND: OperationKind = OperationKind::Allocate;

    fn signer(&self) -> Identity {
        self.signer
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn fee(&self) -> Amount {
        self.fee
    }

    fn verify(&self) -> bool {
        is_valid_bucket_name(&self.name) && self.id != 0
    }
}

impl OperationBody for DeallocateOperation {
    const KIND: OperationKind = OperationKind::Deallocate;

    fn signer(&self) -> Identity {
        self.signer
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn fee(&self) -> Amount {
        self.fee
    }

    fn verify(&self) -> bool {
        is_valid_bucket_name(&self.name) && self.id != 0
    }
}

impl OperationBody for DeleteOperation {
    const KIND: OperationKind = OperationKind::Delete;

    fn signer(&self) -> Identity {
        self.signer
    }

    fn sequence(&self) -> Sequence {
        self.sequence
    }

    fn fee(&self) -> Amount {
        self.fee
    }

    fn verify(&self) -> bool {
        true
    }
}

/// Any ledger operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Currency transfer
    Transfer(Transaction),
    /// Bucket allocation
    Allocate(AllocateOperation),
    /// Bucket deallocation
    Deallocate(DeallocateOperation),
    /// Document deletion
    Delete(DeleteOperation),
}

macro_rules! dispatch {
    ($op:expr, $body:ident => $e:expr) => {
        match $op {
            Operation::Transfer($body) => $e,
            Operation::Allocate($body) => $e,
            Operation::Deallocate($body) => $e,
            Operation::Delete($body) => $e,
        }
    };
}

impl Operation {
    /// Type tag
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Transfer(_) => Transaction::KIND,
            Operation::Allocate(_) => AllocateOperation::KIND,
            Operation::Deallocate(_) => DeallocateOperation::KIND,
            Operation::Delete(_) => DeleteOperation::KIND,
        }
    }

    /// Signing account
    pub fn signer(&self) -> Identity {
        dispatch!(self, op => op.signer())
    }

    /// Sequence consumed from the signer
    pub fn sequence(&self) -> Sequence {
        dispatch!(self, op => op.sequence())
    }

    /// Fee paid by the signer
    pub fn fee(&self) -> Amount {
        dispatch!(self, op => op.fee())
    }

    /// Structural self-validation
    pub fn verify(&self) -> bool {
        dispatch!(self, op => op.verify())
    }

    /// The transfer, if this is one
    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Operation::Transfer(tx) => Some(tx),
            _ => None,
        }
    }

    /// Canonical `<Tag>:<json>` encoding; this is the string that gets signed
    pub fn encode(&self) -> Result<String, CodecError> {
        let tag = self.kind().tag();
        dispatch!(self, op => encode_tagged(tag, op))
    }

    /// Decode a `<Tag>:<json>` string
    pub fn decode(encoded: &str) -> Result<Self, CodecError> {
        let (tag, body) = split_tagged(encoded)?;
        let kind = OperationKind::from_tag(tag)
            .ok_or_else(|| CodecError::UnknownOperationType(tag.to_string()))?;
        let op = match kind {
            OperationKind::Transfer => Operation::Transfer(serde_json::from_str(body)?),
            OperationKind::Allocate => Operation::Allocate(serde_json::from_str(body)?),
            OperationKind::Deallocate => Operation::Deallocate(serde_json::from_str(body)?),
            OperationKind::Delete => Operation::Delete(serde_json::from_str(body)?),
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Transfer(tx) => write!(f, "{}", tx),
            Operation::Allocate(op) => write!(
                f,
                "allocate signer={}, name={}, id={}",
                op.signer.short(),
                op.name,
                op.id
            ),
            Operation::Deallocate(op) => write!(
                f,
                "deallocate signer={}, name={}, id={}",
                op.signer.short(),
                op.name,
                op.id
            ),
            Operation::Delete(op) => {
                write!(f, "delete owner={}, id={}", op.signer.short(), op.id)
            }
        }
    }
}

impl From<Transaction> for Operation {
    fn from(tx: Transaction) -> Self {
        Operation::Transfer(tx)
    }
}

impl From<AllocateOperation> for Operation {
    fn from(op: AllocateOperation) -> Self {
        Operation::Allocate(op)
    }
}

impl From<DeallocateOperation> for Operation {
    fn from(op: DeallocateOperation) -> Self {
        Operation::Deallocate(op)
    }
}

impl From<DeleteOperation> for Operation {
    fn from(op: DeleteOperation) -> Self {
        Operation::Delete(op)
    }
}
