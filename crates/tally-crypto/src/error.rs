//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signature string was not valid base64
    #[error("invalid signature encoding: {0}")]
    InvalidEncoding(String),

    /// Decoded signature had the wrong length
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidLength(usize),

    /// Identity payload is not a valid public key
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature did not verify
    #[error("signature verification failed")]
    VerificationFailed,
}
