//! Operations together with the signature of their signer

use crate::error::CodecError;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use tally_crypto::KeyPair;
use tally_primitives::Identity;

/// An operation and a signature over its canonical encoding.
///
/// The encoding is kept verbatim so the signature is always checked against
/// exactly the bytes that were signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSignedOperation", into = "RawSignedOperation")]
pub struct SignedOperation {
    operation: Operation,
    encoded: String,
    signature: String,
}

/// Wire form: `{"operation": "<Tag>:<json>", "signature": "<base64>"}`
#[derive(Serialize, Deserialize)]
struct RawSignedOperation {
    operation: String,
    signature: String,
}

impl SignedOperation {
    /// Sign an operation. The keypair should belong to the operation's signer,
    /// otherwise the result will not verify.
    pub fn sign(keypair: &KeyPair, operation: Operation) -> Result<Self, CodecError> {
        let encoded = operation.encode()?;
        let signature = keypair.sign(&encoded);
        Ok(Self {
            operation,
            encoded,
            signature,
        })
    }

    /// Rebuild from the encoded operation and its signature. Does not verify.
    pub fn from_parts(encoded: String, signature: String) -> Result<Self, CodecError> {
        let operation = Operation::decode(&encoded)?;
        Ok(Self {
            operation,
            encoded,
            signature,
        })
    }

    /// Signature check over the encoding, then the operation's own checks
    pub fn verify(&self) -> bool {
        tally_crypto::verify(&self.operation.signer(), &self.encoded, &self.signature)
            && self.operation.verify()
    }

    /// The decoded operation
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Take ownership of the decoded operation
    pub fn into_operation(self) -> Operation {
        self.operation
    }

    /// Signing account
    pub fn signer(&self) -> Identity {
        self.operation.signer()
    }

    /// Base64 signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Canonical encoding that was signed
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl TryFrom<RawSignedOperation> for SignedOperation {
    type Error = CodecError;

    fn try_from(raw: RawSignedOperation) -> Result<Self, Self::Error> {
        Self::from_parts(raw.operation, raw.signature)
    }
}

impl From<SignedOperation> for RawSignedOperation {
    fn from(op: SignedOperation) -> Self {
        RawSignedOperation {
            operation: op.encoded,
            signature: op.signature,
        }
    }
}
