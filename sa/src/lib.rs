//! SkillsAssess - CV skills assessment against role profiles
//!
//! A CV (PDF) is sent to an LLM together with a role-specific prompt and,
//! when available, the role's ESCO skill profile. The model's reply is
//! recovered into JSON with [`prompttext`] and shown in the terminal or saved.
//!
//! # Core Concepts
//!
//! - **Prompts as documents**: prompts are markdown files; only the
//!   `## Prompt Template` section is ever sent
//! - **Forgiving decode**: fences, prose and truncation are repaired before
//!   the reply is parsed
//! - **Closed role set**: every role has a prompt, a token budget and a title
//!
//! # Modules
//!
//! - [`analyzer`] - The assess / identify-roles pipeline
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`prompts`] - Prompt document loading chain
//! - [`roles`] - Role catalog
//! - [`esco`] - ESCO skill CSVs
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod esco;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod response_log;
pub mod roles;

pub use analyzer::{Analyzer, Assessment};
pub use config::Config;
pub use error::AssessError;
pub use roles::{ConfigError, RoleConfig};
