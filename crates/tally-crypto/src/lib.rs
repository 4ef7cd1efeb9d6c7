//! # tally-crypto
//!
//! Cryptographic primitives for Tally.
//!
//! - SHA3-256 hashing
//! - Ed25519 signing/verification over UTF-8 messages
//! - Base64 signature encoding used on the wire

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::sha3_256;
pub use signature::{verify, verify_signature, KeyPair, SIGNATURE_LEN};
