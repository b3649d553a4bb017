//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),
}

impl LlmError {
    /// Whether a later identical call could succeed
    ///
    /// Nothing here retries; this only informs what gets reported.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => *status == 429 || *status >= 500,
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::Json(_) => false,
            LlmError::MissingApiKey(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(
            LlmError::ApiError {
                status: 529,
                message: "Overloaded".to_string()
            }
            .is_transient()
        );
        assert!(
            LlmError::ApiError {
                status: 429,
                message: "Rate limited".to_string()
            }
            .is_transient()
        );
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_transient()
        );
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(!LlmError::InvalidResponse("empty".to_string()).is_transient());
        assert!(!LlmError::MissingApiKey("ANTHROPIC_API_KEY".to_string()).is_transient());
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = LlmError::MissingApiKey("ANTHROPIC_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Missing API key: set the ANTHROPIC_API_KEY environment variable"
        );
    }
}
