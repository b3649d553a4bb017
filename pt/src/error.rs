//! Error types for template extraction and response decoding

use thiserror::Error;

/// Errors raised while extracting or rendering a prompt template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("No '## Prompt Template' section found in prompt document")]
    TemplateNotFound,

    #[error("Missing value for placeholder '%{{{0}}}'")]
    MissingPlaceholder(String),
}

/// The recovered model output could not be decoded as JSON
///
/// Keeps the raw model text (before recovery) so callers can report or log
/// exactly what the model said.
#[derive(Debug, Error)]
#[error("Failed to parse response as JSON: {source}")]
pub struct ResponseParseError {
    raw_response: String,
    #[source]
    source: serde_json::Error,
}

impl ResponseParseError {
    pub fn new(raw_response: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            raw_response: raw_response.into(),
            source,
        }
    }

    /// The model text exactly as received
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// The underlying decoder error
    pub fn cause(&self) -> &serde_json::Error {
        &self.source
    }
}
