//! Ed25519 signatures over UTF-8 messages
//!
//! Signatures travel as unpadded standard base64 (86 characters). The signer
//! is identified by an [`Identity`] whose payload is the verifying key.

use crate::{sha3_256, CryptoError};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use std::fmt;
use tally_primitives::Identity;

/// Raw signature length in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 keypair bound to its public identity
pub struct KeyPair {
    signing_key: SigningKey,
    identity: Identity,
}

impl KeyPair {
    /// Create from a 32-byte secret seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let identity = Identity::from_payload(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            identity,
        }
    }

    /// Derive a keypair from a secret phrase (seed = SHA3-256 of the phrase).
    ///
    /// Only suitable for test networks and fixtures.
    pub fn from_secret_phrase(phrase: &str) -> Self {
        Self::from_seed(sha3_256(phrase.as_bytes()))
    }

    /// Public identity of this keypair
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Sign a message, returning the base64 signature
    pub fn sign(&self, message: &str) -> String {
        let signature = self.signing_key.sign(message.as_bytes());
        STANDARD_NO_PAD.encode(signature.to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

fn decode_signature(signature: &str) -> Result<Signature, CryptoError> {
    let bytes = STANDARD_NO_PAD
        .decode(signature)
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
    let bytes: [u8; SIGNATURE_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidLength(bytes.len()))?;
    Ok(Signature::from_bytes(&bytes))
}

/// Verify a base64 signature of `message` by `signer`, reporting why it failed
pub fn verify_signature(
    signer: &Identity,
    message: &str,
    signature: &str,
) -> Result<(), CryptoError> {
    let signature = decode_signature(signature)?;
    let key = VerifyingKey::from_bytes(&signer.payload())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    key.verify_strict(message.as_bytes(), &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Verify a base64 signature of `message` by `signer`
pub fn verify(signer: &Identity, message: &str, signature: &str) -> bool {
    verify_signature(signer, message, signature).is_ok()
}
