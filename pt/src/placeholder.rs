//! Placeholder syntax
//!
//! Prompt authors write `{name}`; the canonical runtime form is `%{name}`.
//! Names are ASCII word characters.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::TemplateError;

/// Matches both `{name}` and `%{name}`; group 1 holds the optional `%`
static ANY_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(%?)\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

static CANONICAL_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Rewrite every bare `{name}` to `%{name}`
///
/// Already-canonical placeholders are left alone, so applying this twice is
/// the same as applying it once.
pub fn canonicalize(text: &str) -> Cow<'_, str> {
    ANY_PLACEHOLDER.replace_all(text, |caps: &Captures| {
        if caps[1].is_empty() {
            format!("%{{{}}}", &caps[2])
        } else {
            caps[0].to_string()
        }
    })
}

/// Names of the canonical placeholders in `text`, first occurrence order, no duplicates
pub fn names(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in CANONICAL_PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !seen.iter().any(|s: &String| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Replace each `%{name}` with `lookup(name)`
///
/// Fails on the first name `lookup` cannot resolve. Text outside
/// placeholders, including lone `%` characters, is copied through verbatim.
pub fn substitute<'v, F>(text: &str, lookup: F) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in CANONICAL_PLACEHOLDER.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always participates");
        let name = &caps[1];
        let value = lookup(name).ok_or_else(|| {
            debug!(%name, "substitute: no value for placeholder");
            TemplateError::MissingPlaceholder(name.to_string())
        })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}
