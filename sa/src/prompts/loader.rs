//! Prompt Loader
//!
//! Loads prompt documents from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use prompttext::PromptTemplate;
use tracing::{debug, info};

use super::embedded;
use crate::error::AssessError;

/// Prompt document used to pick roles for a CV
pub const ROLE_IDENTIFICATION_FILE: &str = "role-identification.md";

/// Directory under the working directory checked before the repo prompts
const USER_PROMPT_DIR: &str = ".skillsassess/prompts";

/// File name of the assessment prompt for a role's prompt key
///
/// `data_scientist_skills` maps to `data-scientist-skills-assessment.md`.
pub fn assessment_file_name(prompt_key: &str) -> String {
    format!("{}-assessment.md", prompt_key.replace('_', "-"))
}

/// Loads prompt documents and extracts their templates
#[derive(Debug, Clone)]
pub struct PromptLoader {
    /// User override directory (`.skillsassess/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (`prompts/` unless configured)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader rooted at `base`, using `repo_dir` for the repo prompts
    ///
    /// A relative `repo_dir` is resolved against `base`.
    pub fn new(base: impl AsRef<Path>, repo_dir: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let user_dir = base.join(USER_PROMPT_DIR);
        let repo_dir = base.join(repo_dir);

        let user_dir_exists = user_dir.is_dir();
        let repo_dir_exists = repo_dir.is_dir();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            user_dir: user_dir_exists.then_some(user_dir),
            repo_dir: repo_dir_exists.then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Raw document text for `file_name`
    ///
    /// Checks in order:
    /// 1. User override: `.skillsassess/prompts/{file_name}`
    /// 2. Repo default: `{prompts-dir}/{file_name}`
    /// 3. Embedded fallback
    pub fn load_document(&self, file_name: &str) -> Result<String, AssessError> {
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(file_name);
            if path.is_file() {
                debug!(path = %path.display(), "PromptLoader::load_document: found on disk");
                return std::fs::read_to_string(&path).map_err(|e| AssessError::io(path, e));
            }
        }

        if let Some(content) = embedded::get_embedded(file_name) {
            debug!(%file_name, "PromptLoader::load_document: using embedded");
            return Ok(content.to_string());
        }

        Err(AssessError::PromptNotFound(file_name.to_string()))
    }

    /// Template extracted from the document `file_name`
    pub fn load(&self, file_name: &str) -> Result<PromptTemplate, AssessError> {
        let document = self.load_document(file_name)?;
        let template = prompttext::extract(&document)?;
        info!(%file_name, placeholders = ?template.placeholders(), "Loaded prompt template");
        Ok(template)
    }

    /// Assessment template for a role's prompt key
    pub fn assessment(&self, prompt_key: &str) -> Result<PromptTemplate, AssessError> {
        self.load(&assessment_file_name(prompt_key))
    }

    pub fn role_identification(&self) -> Result<PromptTemplate, AssessError> {
        self.load(ROLE_IDENTIFICATION_FILE)
    }
}
