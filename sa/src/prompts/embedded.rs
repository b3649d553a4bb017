//! Embedded prompts
//!
//! These are compiled into the binary from the markdown prompt documents.

use tracing::debug;

pub const DATA_SCIENTIST: &str = include_str!("../../prompts/data-scientist-skills-assessment.md");

pub const IT_MANAGER: &str = include_str!("../../prompts/it-manager-skills-assessment.md");

pub const SOFTWARE_ARCHITECT: &str = include_str!("../../prompts/software-architect-skills-assessment.md");

/// Role identification prompt
pub const ROLE_IDENTIFICATION: &str = include_str!("../../prompts/role-identification.md");

/// Get the embedded prompt document by file name
pub fn get_embedded(file_name: &str) -> Option<&'static str> {
    debug!(%file_name, "get_embedded: called");
    match file_name {
        "data-scientist-skills-assessment.md" => Some(DATA_SCIENTIST),
        "it-manager-skills-assessment.md" => Some(IT_MANAGER),
        "software-architect-skills-assessment.md" => Some(SOFTWARE_ARCHITECT),
        "role-identification.md" => Some(ROLE_IDENTIFICATION),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
