//! Username list loading and normalization.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use igfc_core::normalize_username;

/// Used when the input file does not exist.
pub(crate) const FALLBACK_USERNAMES: [&str; 3] = ["instagram", "natgeo", "nike"];

/// Reads one username per line, skipping blank lines and `#` comments.
///
/// A missing file yields [`FALLBACK_USERNAMES`] with a warning.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub(crate) fn read_usernames(path: &Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "usernames file does not exist; falling back to sample list"
        );
        return Ok(FALLBACK_USERNAMES.iter().map(ToString::to_string).collect());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read usernames file {}", path.display()))?;
    Ok(parse_usernames(&content))
}

pub(crate) fn parse_usernames(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Normalizes every entry, dropping empties and later duplicates.
pub(crate) fn normalize_all(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut handles = Vec::with_capacity(raw.len());
    for entry in raw {
        let handle = normalize_username(entry);
        if handle.is_empty() {
            tracing::warn!(entry = %entry, "username is empty after normalization; skipping");
            continue;
        }
        if seen.insert(handle.clone()) {
            handles.push(handle);
        } else {
            tracing::debug!(handle = %handle, "duplicate username; skipping");
        }
    }
    handles
}
