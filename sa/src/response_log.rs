//! Raw LLM response log
//!
//! When enabled, every successful API reply is written to its own pretty JSON
//! file so a bad assessment can be traced back to exactly what the model said.
//! A failure to write the log is reported and otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::LlmLogConfig;
use crate::llm::CompletionResponse;

/// Characters of the prompt kept in the log entry
pub const PROMPT_PREVIEW_CHARS: usize = 200;

/// What one API call looked like
#[derive(Debug, Clone, Copy)]
pub struct CallInfo<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub prompt: &'a str,
    pub pdf_path: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    timestamp: String,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    prompt_preview: String,
    pdf_file: Option<String>,
    raw_response: &'a serde_json::Value,
    response_text: Option<&'a str>,
    success: bool,
}

/// Writes response log files when enabled
#[derive(Debug, Clone)]
pub struct ResponseLogger {
    enabled: bool,
    dir: PathBuf,
}

impl ResponseLogger {
    pub fn new(config: &LlmLogConfig) -> Self {
        Self {
            enabled: config.enabled,
            dir: config.dir.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::new(),
        }
    }

    /// Log `response`; returns the file written, if any
    pub fn log(&self, call: &CallInfo<'_>, response: &CompletionResponse) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        match self.write(call, response, Local::now()) {
            Ok(path) => {
                info!(path = %path.display(), "LLM response logged");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to log LLM response");
                None
            }
        }
    }

    fn write(&self, call: &CallInfo<'_>, response: &CompletionResponse, now: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory {}", self.dir.display()))?;

        let entry = LogEntry {
            timestamp: now.to_rfc3339(),
            model: call.model,
            max_tokens: call.max_tokens,
            temperature: call.temperature,
            prompt_preview: preview(call.prompt, PROMPT_PREVIEW_CHARS),
            pdf_file: call
                .pdf_path
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            raw_response: &response.raw,
            response_text: response.content.as_deref(),
            success: true,
        };

        let path = self.unique_path(now);
        let body = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// `llm_response_<YYYYmmdd_HHMMSS>.json`, suffixed if that second is taken
    fn unique_path(&self, now: DateTime<Local>) -> PathBuf {
        let stem = format!("llm_response_{}", now.format("%Y%m%d_%H%M%S"));
        let mut path = self.dir.join(format!("{stem}.json"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{stem}_{n}.json"));
            n += 1;
        }
        path
    }
}

/// First `limit` characters of `text`, with `...` when cut
fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
