//! File name validation and human-readable name sanitization.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Longest name suffix appended to a file name, in characters.
const MAX_NAME_CHARS: usize = 64;

fn unsafe_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_-]+").expect("name pattern is valid"))
}

/// Turn an item name into a file-name-safe suffix.
///
/// Runs of anything other than letters, digits, '-' and '_' collapse into a
/// single '_'. Returns `None` when nothing usable remains.
pub fn sanitize_name(name: &str) -> Option<String> {
    let replaced = unsafe_run().replace_all(name.trim(), "_");
    let trimmed: String = replaced
        .trim_matches('_')
        .chars()
        .take(MAX_NAME_CHARS)
        .collect();
    let trimmed = trimmed.trim_end_matches('_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Check that a file name stays inside its target directory.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(())
}
