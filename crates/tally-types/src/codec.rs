//! Tagged `<Tag>:<json>` encoding shared by operations and messages

use crate::error::CodecError;
use serde::Serialize;

/// Encode a body as `<tag>:<json>`
pub fn encode_tagged<T: Serialize>(tag: &str, body: &T) -> Result<String, CodecError> {
    let json = serde_json::to_string(body)?;
    Ok(format!("{}:{}", tag, json))
}

/// Split `<tag>:<json>` at the first colon. The body may contain colons.
pub fn split_tagged(encoded: &str) -> Result<(&str, &str), CodecError> {
    encoded.split_once(':').ok_or(CodecError::MissingTag)
}
