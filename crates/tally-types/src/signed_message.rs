//! Authenticated message envelope and its line protocol
//!
//! A line is either `ok` (keep-alive) or
//! `e:<signer>:<signature>:<encoded message>`, terminated by `\n`.

use crate::error::CodecError;
use crate::message::Message;
use std::io::{self, BufRead, Write};
use tally_crypto::KeyPair;
use tally_primitives::Identity;
use thiserror::Error;

/// Keep-alive line content
pub const KEEP_ALIVE: &str = "ok";

const VERSION: &str = "e";

/// Error reading or authenticating an envelope
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The line does not have the envelope layout
    #[error("malformed envelope: {0}")]
    Malformed(&'static str),

    /// Version field is not `e`
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(String),

    /// Signer is not a valid identity, or the signature does not verify
    #[error("envelope failed authentication")]
    Unauthenticated,

    /// The authenticated payload is not a known message
    #[error("bad message: {0}")]
    Codec(#[from] CodecError),

    /// Reading or writing the stream failed
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A signed message with its exact wire encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    message: Message,
    encoded: String,
    signer: Identity,
    signature: String,
}

/// A line of the protocol
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignedMessage {
    /// No content; keeps a connection alive
    KeepAlive,
    /// Authenticated message
    Content(Envelope),
}

impl SignedMessage {
    /// Sign a message. The encoding is computed once and used both for the
    /// signature and for the wire form.
    pub fn sign(keypair: &KeyPair, message: Message) -> Result<Self, CodecError> {
        let encoded = message.encode()?;
        let signature = keypair.sign(&encoded);
        Ok(SignedMessage::Content(Envelope {
            message,
            encoded,
            signer: keypair.identity(),
            signature,
        }))
    }

    /// The keep-alive marker
    pub fn keep_alive() -> Self {
        SignedMessage::KeepAlive
    }

    /// True for keep-alive lines
    pub fn is_keep_alive(&self) -> bool {
        matches!(self, SignedMessage::KeepAlive)
    }

    /// The authenticated message, `None` for keep-alive
    pub fn message(&self) -> Option<&Message> {
        self.envelope().map(|e| &e.message)
    }

    /// Identity that signed the message
    pub fn signer(&self) -> Option<Identity> {
        self.envelope().map(|e| e.signer)
    }

    /// Base64 signature
    pub fn signature(&self) -> Option<&str> {
        self.envelope().map(|e| e.signature.as_str())
    }

    fn envelope(&self) -> Option<&Envelope> {
        match self {
            SignedMessage::KeepAlive => None,
            SignedMessage::Content(envelope) => Some(envelope),
        }
    }

    /// Wire form without the trailing newline
    pub fn serialize(&self) -> String {
        match self {
            SignedMessage::KeepAlive => KEEP_ALIVE.to_string(),
            SignedMessage::Content(e) => {
                format!("{}:{}:{}:{}", VERSION, e.signer, e.signature, e.encoded)
            }
        }
    }

    /// Parse and authenticate one line (without its newline).
    ///
    /// The signature is checked before the payload is decoded.
    pub fn parse(line: &str) -> Result<Self, EnvelopeError> {
        if line == KEEP_ALIVE {
            return Ok(SignedMessage::KeepAlive);
        }

        let mut parts = line.splitn(4, ':');
        let (version, signer, signature, encoded) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(v), Some(s), Some(sig), Some(m)) => (v, s, sig, m),
                _ => return Err(EnvelopeError::Malformed("expected 4 colon-separated parts")),
            };

        if version != VERSION {
            return Err(EnvelopeError::UnsupportedVersion(version.to_string()));
        }

        let signer: Identity = signer.parse().map_err(|_| EnvelopeError::Unauthenticated)?;
        if !tally_crypto::verify(&signer, encoded, signature) {
            return Err(EnvelopeError::Unauthenticated);
        }

        let message = Message::decode(encoded)?;
        Ok(SignedMessage::Content(Envelope {
            message,
            encoded: encoded.to_string(),
            signer,
            signature: signature.to_string(),
        }))
    }

    /// Write the wire form followed by `\n`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.serialize().as_bytes())?;
        writer.write_all(b"\n")
    }
}

/// Read one `\n`-terminated line and parse it.
///
/// Returns `Ok(None)` at a clean end of stream. A final line with no
/// terminator is reported as [`EnvelopeError::Io`] with kind
/// `UnexpectedEof`. Only the `\n` is removed; a preceding `\r` stays part of
/// the line.
pub fn read_signed_message<R: BufRead>(
    reader: &mut R,
) -> Result<Option<SignedMessage>, EnvelopeError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    match line.strip_suffix('\n') {
        Some(content) => SignedMessage::parse(content).map(Some),
        None => Err(EnvelopeError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stream ended before end of line",
        ))),
    }
}
