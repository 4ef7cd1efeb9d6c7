//! Encoding errors

use thiserror::Error;

/// Error decoding a tagged operation or message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No `<tag>:` prefix
    #[error("missing type tag")]
    MissingTag,

    /// Tag names no known operation
    #[error("unknown operation type: {0}")]
    UnknownOperationType(String),

    /// Tag names no known message
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// Body did not (de)serialize
    #[error("json error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}
