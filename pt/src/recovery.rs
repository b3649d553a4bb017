//! Recovering a JSON payload from free-form model output
//!
//! Models wrap JSON in markdown fences, add commentary around it, bold
//! field names, or get cut off mid-structure. [`clean`] handles those cases
//! and always returns a string; whether it decodes is the caller's problem
//! (see [`crate::decode`]).
//!
//! Stages, in order:
//!
//! 1. [`fenced_json`]: a fenced block holding a `{...}`/`[...]` body is
//!    returned as-is.
//! 2. [`strip_markdown_noise`]: fences, headings, list items, quotes, note
//!    lines and inline emphasis are removed.
//! 3. [`json_span`]: the text is cut to the first opener / last closer.
//! 4. [`close_open_structures`]: missing `}` / `]` are appended.
//!
//! Brace counting is plain character counting. Braces inside string literals
//! (`"a{b"`) are counted too and can produce a wrong repair.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// Greedy body: the block runs to the last closer that is followed by a fence,
// so later prose after the closing fence does not disqualify it.
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*\}|\[.*\])\s*```").expect("fenced json pattern is valid")
});

/// A single cleanup pass; applied in declaration order
struct NoiseRule {
    name: &'static str,
    pattern: Regex,
}

impl NoiseRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("noise rule pattern is valid"),
        }
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "")
    }
}

static NOISE_RULES: LazyLock<Vec<NoiseRule>> = LazyLock::new(|| {
    vec![
        NoiseRule::new("opening fence", r"```json\s*"),
        NoiseRule::new("closing fence", r"(?m)```\s*$"),
        NoiseRule::new("heading", r"(?m)^#+[ \t]+.*\n"),
        NoiseRule::new("star bullet", r"(?m)^\*[ \t]+.*\n"),
        NoiseRule::new("dash bullet", r"(?m)^-+[ \t]+.*\n"),
        NoiseRule::new("numbered item", r"(?m)^\d+\.[ \t]+.*\n"),
        NoiseRule::new("blockquote", r"(?m)^>.*\n"),
        NoiseRule::new("note", r"(?mi)^.*\bnote:.*\n"),
        NoiseRule::new("bold", r"\*\*.*?\*\*"),
        NoiseRule::new("italic", r"\*.*?\*"),
    ]
});

/// Best-effort JSON text from raw model output
///
/// `None` and `""` both give `""`. Never fails.
pub fn clean<'a>(raw: impl Into<Option<&'a str>>) -> String {
    let raw = match raw.into() {
        Some(text) if !text.is_empty() => text,
        _ => {
            debug!("clean: empty input");
            return String::new();
        }
    };
    debug!(len = raw.len(), "clean: called");

    if let Some(body) = fenced_json(raw) {
        debug!(len = body.len(), "clean: fenced block fast path");
        return body.to_string();
    }

    let stripped = strip_markdown_noise(raw);
    let span = json_span(&stripped);
    let repaired = close_open_structures(span);
    let result = repaired.trim().to_string();
    debug!(len = result.len(), "clean: recovered via fallback");
    result
}

/// Body of the first fenced block whose content starts with `{` or `[`
pub fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove markdown structure around the payload, then trim
pub fn strip_markdown_noise(text: &str) -> String {
    let mut current = text.to_string();
    for rule in NOISE_RULES.iter() {
        let next = match rule.apply(&current) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(next) => next,
        };
        debug!(rule = rule.name, "strip_markdown_noise: rule matched");
        current = next;
    }
    current.trim().to_string()
}

/// Cut `text` to the span from the first `{`/`[` to the last `}`/`]`
///
/// Returned unchanged when either end is missing or they are out of order.
pub fn json_span(text: &str) -> &str {
    let start = text.find(['{', '[']);
    let end = text.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Append the closers missing from `text`
///
/// The number of `}` appended is `count('{') - count('}')` and likewise for
/// `]` (never negative). They are emitted innermost-first, following the
/// nesting of the still-open openers, so a truncated `{"a": [1` becomes
/// `{"a": [1]}`.
pub fn close_open_structures(text: &str) -> String {
    let mut missing_braces = unmatched(text, '{', '}');
    let mut missing_brackets = unmatched(text, '[', ']');
    if missing_braces == 0 && missing_brackets == 0 {
        return text.to_string();
    }
    debug!(missing_braces, missing_brackets, "close_open_structures: repairing");

    let mut open = Vec::new();
    for c in text.chars() {
        match c {
            '{' | '[' => open.push(c),
            '}' | ']' => {
                let opener = if c == '}' { '{' } else { '[' };
                if let Some(pos) = open.iter().rposition(|&o| o == opener) {
                    open.remove(pos);
                }
            }
            _ => {}
        }
    }

    let mut repaired = String::with_capacity(text.len() + missing_braces + missing_brackets);
    repaired.push_str(text);
    for opener in open.iter().rev() {
        match opener {
            '{' if missing_braces > 0 => {
                repaired.push('}');
                missing_braces -= 1;
            }
            '[' if missing_brackets > 0 => {
                repaired.push(']');
                missing_brackets -= 1;
            }
            _ => {}
        }
    }
    repaired
}

fn unmatched(text: &str, open: char, close: char) -> usize {
    let opens = text.chars().filter(|&c| c == open).count();
    let closes = text.chars().filter(|&c| c == close).count();
    opens.saturating_sub(closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(s: &str) -> bool {
        let count = |c| s.chars().filter(|&x| x == c).count();
        count('{') == count('}') && count('[') == count(']')
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(clean(None), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_clean_plain_json_unchanged() {
        let json = r#"{"overall_readiness": {"score": 7}, "identified_skills": []}"#;
        assert_eq!(clean(json), json);
        assert_eq!(clean(format!("  {json}\n").as_str()), json);
    }

    #[test]
    fn test_clean_fenced_with_trailing_prose() {
        let raw = "Here is the assessment:\n```json\n{\"x\":1}\n```\nLet me know if you need more.";
        assert_eq!(clean(raw), r#"{"x":1}"#);
    }

    #[test]
    fn test_clean_untagged_fence_array() {
        let raw = "```\n[1, 2, 3]\n```";
        assert_eq!(clean(raw), "[1, 2, 3]");
    }

    #[test]
    fn test_fenced_body_returned_verbatim() {
        let raw = "```json\n{\"a\": \"**kept**\"}\n```";
        assert_eq!(clean(raw), r#"{"a": "**kept**"}"#);
    }

    #[test]
    fn test_fence_with_prose_body_falls_back() {
        let raw = "```\nnot json\n```\n{\"a\": 1}";
        assert_eq!(fenced_json(raw), None);
        assert_eq!(clean(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn test_clean_truncated() {
        let raw = r#"{"a": 1, "b": [1, 2"#;
        let cleaned = clean(raw);
        assert_eq!(cleaned, r#"{"a": 1, "b": [1, 2]}"#);
        let value: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["b"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_clean_truncated_fence_without_close() {
        let raw = "```json\n{\"skills\": [{\"name\": \"SQL\"}, {\"name\": \"Py";
        let cleaned = clean(raw);
        assert!(balanced(&cleaned));
        assert!(cleaned.starts_with("{\"skills\""));
    }

    #[test]
    fn test_clean_commentary_around_json() {
        let raw = "# Assessment\n\nI reviewed the CV carefully.\n\n{\"score\": 8}\n\nOverall a strong fit.";
        assert_eq!(clean(raw), r#"{"score": 8}"#);
    }

    #[test]
    fn test_strip_markdown_noise_lines() {
        let raw = "## Result\n* bullet\n- dash\n1. numbered\n> quote\n**Note:** model aside\nnote: lower\n{\"a\": 1}\n";
        assert_eq!(strip_markdown_noise(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strip_markdown_noise_removes_emphasis_entirely() {
        assert_eq!(strip_markdown_noise("**score** {\"s\": 1}"), r#"{"s": 1}"#);
        assert_eq!(strip_markdown_noise("*aside* {\"s\": 1}"), r#"{"s": 1}"#);
    }

    #[test]
    fn test_json_span_prefers_earliest_opener() {
        assert_eq!(json_span("x [1, {\"a\": 2}] y"), "[1, {\"a\": 2}]");
        assert_eq!(json_span("x {\"a\": [2]} y"), "{\"a\": [2]}");
        assert_eq!(json_span("} nothing {"), "} nothing {");
        assert_eq!(json_span("no json"), "no json");
    }

    #[test]
    fn test_close_open_structures_nesting_order() {
        assert_eq!(close_open_structures("[{\"a\": [1"), "[{\"a\": [1]}]");
        assert_eq!(close_open_structures("{}"), "{}");
    }

    #[test]
    fn test_close_open_structures_counts_string_contents() {
        // Braces inside strings are counted like any other
        assert_eq!(close_open_structures(r#"{"a": "x{y"#), r#"{"a": "x{y}}"#);
    }

    #[test]
    fn test_close_open_structures_excess_closers_untouched() {
        assert_eq!(close_open_structures("{]}"), "{]}");
    }

    #[test]
    fn test_clean_leaves_extra_closers_in_place() {
        // Only missing closers are added; surplus ones are not trimmed
        assert_eq!(clean("{\"a\":1}}"), "{\"a\":1}}");
        assert_eq!(clean("Result: [1, 2]] done"), "[1, 2]]");
        assert!(serde_json::from_str::<serde_json::Value>(&clean("{\"a\":1}}")).is_err());
    }

    #[test]
    fn test_clean_no_json_at_all() {
        assert_eq!(clean("I could not read the document."), "I could not read the document.");
    }
}
