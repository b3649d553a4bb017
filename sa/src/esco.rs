//! ESCO skill catalogs
//!
//! Each role can ship a CSV export of its ESCO occupation profile. The first
//! data rows are the essential skills, the rest optional; the list is handed to
//! the model through the `esco_skills` placeholder.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, info, warn};

use crate::roles;

/// Number of leading data rows treated as essential
pub const ESSENTIAL_SKILL_LIMIT: usize = 50;

/// Essential and optional skill labels for one role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscoSkills {
    pub essential: Vec<String>,
    pub optional: Vec<String>,
}

impl EscoSkills {
    /// Parse a CSV export
    ///
    /// The header row is skipped. The label is everything after the first
    /// column. Data rows 1-50 are essential by position, so a row without a
    /// label still uses up its slot.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut skills = Self::default();
        for (index, record) in reader.records().enumerate() {
            let record = record.context("Malformed ESCO CSV row")?;
            let row = index + 1;
            if record.len() < 2 {
                continue;
            }
            let label = record.iter().skip(1).collect::<Vec<_>>().join(",");
            let label = label.replace('"', "").trim().to_string();
            if label.is_empty() {
                continue;
            }
            if row <= ESSENTIAL_SKILL_LIMIT {
                skills.essential.push(label);
            } else {
                skills.optional.push(label);
            }
        }

        debug!(
            essential = skills.essential.len(),
            optional = skills.optional.len(),
            "EscoSkills::parse: parsed"
        );
        Ok(skills)
    }

    pub fn is_empty(&self) -> bool {
        self.essential.is_empty() && self.optional.is_empty()
    }

    /// Text substituted for `%{esco_skills}`
    pub fn render(&self) -> String {
        let mut text = String::from("ESSENTIAL SKILLS:\n");
        for skill in &self.essential {
            text.push_str(&format!("- {}\n", skill));
        }
        text.push_str("\nOPTIONAL SKILLS:\n");
        for skill in &self.optional {
            text.push_str(&format!("- {}\n", skill));
        }
        text
    }
}

/// Finds per-role skill CSVs in a directory
#[derive(Debug, Clone)]
pub struct EscoCatalog {
    dir: PathBuf,
}

impl EscoCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, role: &str) -> PathBuf {
        self.dir.join(roles::esco_file_name(role))
    }

    /// Skills for `role`; `None` when the role has no CSV or it lists nothing
    pub fn load(&self, role: &str) -> Result<Option<EscoSkills>> {
        let path = self.path_for(role);
        if !path.exists() {
            debug!(path = %path.display(), "EscoCatalog::load: no skills file");
            return Ok(None);
        }
        let skills = load_file(&path)?;
        if skills.is_empty() {
            warn!(path = %path.display(), "ESCO skills file has no skill rows");
            return Ok(None);
        }
        info!(%role, essential = skills.essential.len(), optional = skills.optional.len(), "Loaded ESCO skills");
        Ok(Some(skills))
    }

    /// Rendered skill list for `role`, empty when the role has no CSV
    pub fn render_for(&self, role: &str) -> Result<String> {
        Ok(self.load(role)?.map(|s| s.render()).unwrap_or_default())
    }
}

fn load_file(path: &Path) -> Result<EscoSkills> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read ESCO skills {}", path.display()))?;
    EscoSkills::parse(&content).with_context(|| format!("Failed to parse ESCO skills {}", path.display()))
}
