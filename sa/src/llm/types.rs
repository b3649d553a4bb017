//! LLM request/response types
//!
//! Modeled on the Anthropic Messages API: a user message made of text and
//! document blocks, answered with text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User messages (one for an assessment)
    pub messages: Vec<Message>,

    /// Max tokens for the reply
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// A single user turn: the prompt text followed by a PDF attachment
    pub fn with_pdf(prompt: impl Into<String>, pdf: &[u8], max_tokens: u32) -> Self {
        debug!(pdf_bytes = pdf.len(), %max_tokens, "CompletionRequest::with_pdf: called");
        Self {
            messages: vec![Message::user_blocks(vec![
                ContentBlock::text(prompt),
                ContentBlock::pdf(pdf),
            ])],
            max_tokens,
        }
    }

    /// Text of the first text block of the first message, for previews
    pub fn prompt_text(&self) -> Option<&str> {
        self.messages.first().and_then(|m| {
            m.content.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
        })
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message with multiple content blocks
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        debug!(block_count = %blocks.len(), "Message::user_blocks: called");
        Self {
            role: Role::User,
            content: blocks,
        }
    }
}

/// Message role; only user turns are ever sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A content block in a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "document")]
    Document { source: DocumentSource },
}

impl ContentBlock {
    /// Create a text content block
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Create a base64 PDF document block
    pub fn pdf(bytes: &[u8]) -> Self {
        ContentBlock::Document {
            source: DocumentSource {
                kind: "base64".to_string(),
                media_type: "application/pdf".to_string(),
                data: STANDARD.encode(bytes),
            },
        }
    }
}

/// Inline document payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub data: String,
}

/// Why the model stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
    StopSequence,
    Other,
}

impl StopReason {
    pub fn from_anthropic(reason: &str) -> Self {
        match reason {
            "end_turn" => Self::EndTurn,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            _ => Self::Other,
        }
    }
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The model's answer
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text of the first text block, if any
    pub content: Option<String>,

    pub stop_reason: StopReason,

    pub usage: TokenUsage,

    /// Response body as returned by the provider, kept for the response log
    pub raw: serde_json::Value,
}

impl CompletionResponse {
    /// Plain text response, as a mock or test double would produce
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Whether the reply was cut off by the token budget
    pub fn is_truncated(&self) -> bool {
        self.stop_reason == StopReason::MaxTokens
    }
}
