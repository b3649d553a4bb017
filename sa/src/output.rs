//! Saving results to disk

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use prompttext::StructuredResult;
use tracing::debug;

/// Where `--output` should write
///
/// A bare file name goes into `reports_dir`; anything with a path separator
/// is used as given.
pub fn resolve_output_path(output: &str, reports_dir: &Path) -> PathBuf {
    if output.contains('/') || output.contains('\\') {
        PathBuf::from(output)
    } else {
        reports_dir.join(output)
    }
}

/// Write `result` as pretty JSON, creating the parent directory if needed
pub fn save_json(result: &StructuredResult, path: &Path) -> Result<()> {
    debug!(path = %path.display(), "save_json: called");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
