//! Prompt documents
//!
//! Loads markdown prompt documents and extracts their `## Prompt Template`
//! section.
//!
//! Loading chain:
//! 1. `.skillsassess/prompts/{file}` (user override)
//! 2. `{paths.prompts-dir}/{file}` (repo default)
//! 3. Embedded fallback in code

pub mod embedded;
mod loader;

pub use loader::{PromptLoader, ROLE_IDENTIFICATION_FILE, assessment_file_name};
