//! Assessment pipeline errors

use std::path::PathBuf;

use prompttext::{ResponseParseError, TemplateError};
use thiserror::Error;

use crate::llm::LlmError;
use crate::roles::ConfigError;

/// Everything that can stop an assessment or role identification
#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Parse(#[from] ResponseParseError),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Prompt file not found: {0}")]
    PromptNotFound(String),

    #[error("CV file not found: {}", .0.display())]
    CvNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load ESCO skills: {0}")]
    Esco(String),
}

impl AssessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Raw model text when the failure was an undecodable reply
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Parse(e) => Some(e.raw_response()),
            _ => None,
        }
    }
}
