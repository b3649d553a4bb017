//! Prompt template extraction
//!
//! Prompts are authored as markdown documents: optional frontmatter,
//! explanatory prose, a `## Prompt Template` section holding the text that is
//! actually sent to the model, then parameter docs and usage notes. Only the
//! template section is kept; editing the surrounding prose never changes the
//! executed prompt.
//!
//! Extraction is a chain of small text passes:
//!
//! ```text
//! document -> strip_frontmatter -> template_section -> strip_fences
//!          -> placeholder::canonicalize -> collapse_whitespace -> PromptTemplate
//! ```

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::TemplateError;
use crate::placeholder;

static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)\A---[ \t]*\n.*?^---[ \t]*(?:\n|\z)").expect("frontmatter pattern is valid"));

// First terminator wins; the lazy body stops at whichever appears earliest.
static TEMPLATE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ms)^## Prompt Template[ \t]*(?:\n|\z)(.*?)(?:\n## Parameters|\n## Expected|\n## Usage|\n##|\z)",
    )
    .expect("template section pattern is valid")
});

static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\w*\n?").expect("fence pattern is valid"));

/// A prompt with `%{name}` placeholders, ready for substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Wrap already-canonical template text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Extract the template section of a markdown prompt document
    pub fn extract(document: &str) -> Result<Self, TemplateError> {
        extract(document)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names referenced by this template
    pub fn placeholders(&self) -> Vec<String> {
        placeholder::names(&self.text)
    }

    /// Substitute every placeholder from `vars`
    ///
    /// Extra keys are ignored. A placeholder with no entry in `vars` is an
    /// error; nothing is ever replaced by blank text.
    pub fn render<K, V>(&self, vars: &HashMap<K, V>) -> Result<String, TemplateError>
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        debug!(placeholders = ?self.placeholders(), provided = vars.len(), "PromptTemplate::render: called");
        placeholder::substitute(&self.text, |name| vars.get(name).map(|v| v.as_ref()))
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for PromptTemplate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Turn a markdown prompt document into a [`PromptTemplate`]
pub fn extract(document: &str) -> Result<PromptTemplate, TemplateError> {
    debug!(len = document.len(), "extract: called");
    let document = normalize_newlines(document);
    let body = strip_frontmatter(&document);
    let section = template_section(body)?;
    let unfenced = strip_fences(section);
    let canonical = placeholder::canonicalize(&unfenced);
    let text = collapse_whitespace(&canonical);
    debug!(len = text.len(), "extract: template extracted");
    Ok(PromptTemplate { text })
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Drop a leading `---` ... `---` block
pub fn strip_frontmatter(document: &str) -> &str {
    match FRONTMATTER.find(document) {
        Some(m) => {
            debug!(end = m.end(), "strip_frontmatter: frontmatter removed");
            &document[m.end()..]
        }
        None => document,
    }
}

/// Body of the `## Prompt Template` section, up to the next `##` heading
pub fn template_section(document: &str) -> Result<&str, TemplateError> {
    TEMPLATE_SECTION
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| {
            debug!("template_section: heading not found");
            TemplateError::TemplateNotFound
        })
}

/// Remove code fence delimiters, keeping the fenced text
pub fn strip_fences(text: &str) -> Cow<'_, str> {
    FENCE.replace_all(text, "")
}

/// Trim every line, drop blank lines, join with `\n`
pub fn collapse_whitespace(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---\ntitle: Greeting\nversion: 2\n---\n# Greeting prompt\n\nSays hello.\n\n## Prompt Template\n```\nHello {name}\n```\n\n## Parameters\n- name: who to greet {ignored}\n";

    #[test]
    fn test_extract_full_document() {
        let template = extract(DOC).unwrap();
        assert_eq!(template.as_str(), "Hello %{name}");
    }

    #[test]
    fn test_extract_missing_heading() {
        let err = extract("# Title\n\nJust prose, no template.\n").unwrap_err();
        assert_eq!(err, TemplateError::TemplateNotFound);
    }

    #[test]
    fn test_extract_stops_at_expected_and_usage() {
        let doc = "## Prompt Template\nA {x}\n## Expected Output\nB\n## Usage\nC\n";
        assert_eq!(extract(doc).unwrap().as_str(), "A %{x}");

        let doc = "## Prompt Template\nA\n\n## Usage\nC\n";
        assert_eq!(extract(doc).unwrap().as_str(), "A");
    }

    #[test]
    fn test_extract_runs_to_end_of_document() {
        let doc = "intro\n## Prompt Template\nline one\n\n   line two   \n";
        assert_eq!(extract(doc).unwrap().as_str(), "line one\nline two");
    }

    #[test]
    fn test_extract_language_tagged_fence() {
        let doc = "## Prompt Template\n```markdown\nAnalyze {cv_text}\nReturn JSON like {\"score\": 1}\n```\n";
        assert_eq!(
            extract(doc).unwrap().as_str(),
            "Analyze %{cv_text}\nReturn JSON like {\"score\": 1}"
        );
    }

    #[test]
    fn test_extract_keeps_canonical_placeholders() {
        let doc = "## Prompt Template\nUse %{esco_skills} and {cv_text}\n";
        assert_eq!(extract(doc).unwrap().as_str(), "Use %{esco_skills} and %{cv_text}");
    }

    #[test]
    fn test_extract_crlf_document() {
        let doc = "---\r\na: 1\r\n---\r\n## Prompt Template\r\nHi {who}\r\n## Parameters\r\nx\r\n";
        assert_eq!(extract(doc).unwrap().as_str(), "Hi %{who}");
    }

    #[test]
    fn test_heading_inside_frontmatter_is_ignored() {
        let doc = "---\nnote: see ## Prompt Template below\n---\nno template here\n";
        assert_eq!(extract(doc).unwrap_err(), TemplateError::TemplateNotFound);
    }

    #[test]
    fn test_strip_frontmatter_only_at_start() {
        let doc = "intro\n---\nnot: frontmatter\n---\n";
        assert_eq!(strip_frontmatter(doc), doc);
        assert_eq!(strip_frontmatter("---\n---\nbody"), "body");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a  \n\n\t\n b\n"), "a\nb");
        assert_eq!(collapse_whitespace("\n \n"), "");
    }

    #[test]
    fn test_render_substitutes_and_ignores_extra_keys() {
        let template = PromptTemplate::new("Role: %{role}\nCV: %{cv_text}");
        let vars = HashMap::from([("role", "it-manager"), ("cv_text", "attached"), ("unused", "x")]);
        assert_eq!(template.render(&vars).unwrap(), "Role: it-manager\nCV: attached");
    }

    #[test]
    fn test_render_missing_placeholder() {
        let template = PromptTemplate::new("Hello %{name}");
        let vars: HashMap<String, String> = HashMap::from([("other".to_string(), "x".to_string())]);
        assert_eq!(
            template.render(&vars).unwrap_err(),
            TemplateError::MissingPlaceholder("name".to_string())
        );
    }

    #[test]
    fn test_placeholders() {
        let template = extract(DOC).unwrap();
        assert_eq!(template.placeholders(), vec!["name"]);
    }
}
