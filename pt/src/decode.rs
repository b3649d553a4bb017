//! Decoding recovered model output

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ResponseParseError;
use crate::recovery;

/// A decoded model answer: string keys to arbitrary JSON values
pub type StructuredResult = Map<String, Value>;

/// Recover and decode a model reply into a JSON object
///
/// The error carries `raw`, not the cleaned text, since the cleaned text is
/// derived and can always be recomputed.
pub fn decode(raw: &str) -> Result<StructuredResult, ResponseParseError> {
    decode_as(raw)
}

/// Recover and decode a model reply into any deserializable type
pub fn decode_as<T: DeserializeOwned>(raw: &str) -> Result<T, ResponseParseError> {
    let cleaned = recovery::clean(raw);
    serde_json::from_str(&cleaned).map_err(|e| {
        debug!(error = %e, cleaned_len = cleaned.len(), "decode_as: recovered text did not decode");
        ResponseParseError::new(raw, e)
    })
}
