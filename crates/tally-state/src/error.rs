//! Reasons an operation is rejected by the ledger

use tally_primitives::{Amount, Identity, Sequence};
use thiserror::Error;

/// Why an operation cannot be applied to the current state
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Signer has no account
    #[error("unknown signer: {0}")]
    UnknownSigner(Identity),

    /// Sequence is not exactly one past the signer's current sequence
    #[error("bad sequence: expected {expected}, got {got}")]
    BadSequence {
        /// Required sequence
        expected: Sequence,
        /// Sequence carried by the operation
        got: Sequence,
    },

    /// Signer cannot cover amount plus fee
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount plus fee
        required: Amount,
        /// Signer balance
        available: Amount,
    },

    /// Amount plus fee does not fit in an amount
    #[error("cost overflows")]
    CostOverflow,

    /// Crediting the recipient would overflow its balance
    #[error("recipient balance overflows: {0}")]
    RecipientOverflow(Identity),

    /// Sequence number space of the signer is used up
    #[error("sequence exhausted for {0}")]
    SequenceExhausted(Identity),
}
