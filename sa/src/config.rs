//! SkillsAssess configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;

/// Environment variable that switches on the LLM response log
pub const LLM_LOGGING_ENV: &str = "LLM_LOGGING";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Prompt and skill data locations
    pub paths: PathsConfig,

    /// Raw LLM response logging
    #[serde(rename = "llm-log")]
    pub llm_log: LlmLogConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key environment variable is set so a missing key
    /// fails before any file is read.
    pub fn validate(&self) -> Result<()> {
        self.llm.get_api_key()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .skillsassess.yml
        let local_config = PathBuf::from(".skillsassess.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/skillsassess/skillsassess.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("skillsassess").join("skillsassess.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Environment overrides applied on top of the file
    fn apply_env(&mut self) {
        if std::env::var(LLM_LOGGING_ENV).is_ok_and(|v| v == "true") {
            tracing::debug!("apply_env: {} enables response logging", LLM_LOGGING_ENV);
            self.llm_log.enabled = true;
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Reply budget for role identification; assessments use the role's own
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 2000,
            temperature: 0.1,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// API key from the configured environment variable; empty counts as unset
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

/// Where prompts, skill catalogs and reports live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Repo prompt directory, consulted after `.skillsassess/prompts/`
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: PathBuf,

    /// Directory of `<role>-skills.csv` ESCO exports
    #[serde(rename = "esco-dir")]
    pub esco_dir: PathBuf,

    /// Where bare `--output` file names are written
    #[serde(rename = "reports-dir")]
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from("prompts"),
            esco_dir: PathBuf::from("esco"),
            reports_dir: PathBuf::from("reports"),
        }
    }
}

/// Raw LLM response logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmLogConfig {
    pub enabled: bool,

    /// Directory for `llm_response_<timestamp>.json` files
    pub dir: PathBuf,
}

impl Default for LlmLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("logs").join("llm"),
        }
    }
}
