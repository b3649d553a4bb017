//! Role catalog
//!
//! The closed set of roles a CV can be assessed against, each with the prompt
//! it uses, the token budget for the reply, and the report title.

use thiserror::Error;
use tracing::debug;

/// Lookup failures against the role catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration not found for: {0}")]
    UnknownRole(String),
}

/// Per-role assessment settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleConfig {
    /// Prompt document key, e.g. `data_scientist_skills`
    pub prompt_key: &'static str,
    /// Reply token budget
    pub max_tokens: u32,
    /// Banner shown above the assessment
    pub title: &'static str,
}

const ROLES: &[(&str, RoleConfig)] = &[
    (
        "data-scientist",
        RoleConfig {
            prompt_key: "data_scientist_skills",
            max_tokens: 3000,
            title: "DATA SCIENTIST SKILLS ASSESSMENT",
        },
    ),
    (
        "it-manager",
        RoleConfig {
            prompt_key: "it_manager_skills",
            max_tokens: 4000,
            title: "IT MANAGER SKILLS ASSESSMENT",
        },
    ),
    (
        "software-architect",
        RoleConfig {
            prompt_key: "software_architect_skills",
            max_tokens: 4000,
            title: "SOFTWARE ARCHITECT SKILLS ASSESSMENT",
        },
    ),
];

/// Settings for `role`
pub fn lookup(role: &str) -> Result<&'static RoleConfig, ConfigError> {
    debug!(%role, "lookup: called");
    ROLES
        .iter()
        .find(|(id, _)| *id == role)
        .map(|(_, config)| config)
        .ok_or_else(|| ConfigError::UnknownRole(role.to_string()))
}

/// All role identifiers, in catalog order
pub fn valid_roles() -> Vec<&'static str> {
    ROLES.iter().map(|(id, _)| *id).collect()
}

pub fn is_valid(role: &str) -> bool {
    ROLES.iter().any(|(id, _)| *id == role)
}

/// Every role with its settings
pub fn all() -> impl Iterator<Item = (&'static str, &'static RoleConfig)> {
    ROLES.iter().map(|(id, config)| (*id, config))
}

/// ESCO skills CSV file name for `role`
pub fn esco_file_name(role: &str) -> String {
    format!("{}-skills.csv", role)
}
