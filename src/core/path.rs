//! Hierarchical path helpers.
//!
//! Directory paths end with the separator (`a/b/`), leaf paths don't
//! (`a/b/creds`), and the engine root is the empty string. Everything here
//! is pure; malformed input is rejected with [`Error::InvalidPath`] instead
//! of being sliced blindly.

use crate::core::constants::{ROOT, SEPARATOR};
use crate::core::types::SecretPath;
use crate::error::{Error, Result};

/// Whether a listing entry or path names a directory.
pub fn is_directory(name: &str) -> bool {
    name.ends_with(SEPARATOR)
}

/// Check that `path` is the root or a well-formed directory path.
///
/// # Errors
///
/// Returns `InvalidPath` when the trailing separator is missing or a
/// segment is empty (`a//b/`, `/`).
pub fn validate_dir(path: &str) -> Result<()> {
    if path == ROOT {
        return Ok(());
    }
    if !is_directory(path) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    let body = &path[..path.len() - 1];
    if body.split(SEPARATOR).any(str::is_empty) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// The directory one level above `path`.
///
/// `parent("a/b/c/")` is `"a/b/"`, `parent("a/")` and `parent("")` are `""`.
pub fn parent(path: &str) -> Result<SecretPath> {
    validate_dir(path)?;
    if path == ROOT {
        return Ok(String::new());
    }
    let body = &path[..path.len() - 1];
    Ok(match body.rfind(SEPARATOR) {
        Some(idx) => body[..=idx].to_string(),
        None => String::new(),
    })
}

/// The final element of a directory path, keeping its trailing separator.
///
/// `last_segment("a/b/c/")` is `"c/"`, `last_segment("")` is `""`.
pub fn last_segment(path: &str) -> Result<String> {
    validate_dir(path)?;
    if path == ROOT {
        return Ok(String::new());
    }
    let body = &path[..path.len() - 1];
    let start = body.rfind(SEPARATOR).map_or(0, |idx| idx + 1);
    Ok(path[start..].to_string())
}

/// Append a listing entry to a directory path.
///
/// `name` may be a directory (`c/`) or a leaf (`creds`) but must be a single
/// non-empty segment.
pub fn child(dir: &str, name: &str) -> Result<SecretPath> {
    validate_dir(dir)?;
    let bare = name.strip_suffix(SEPARATOR).unwrap_or(name);
    if bare.is_empty() || bare.contains(SEPARATOR) {
        return Err(Error::InvalidPath(format!("{}{}", dir, name)));
    }
    Ok(format!("{}{}", dir, name))
}

/// Split a leaf path into its directory and leaf name.
///
/// `split_leaf("a/b/creds")` is `("a/b/", "creds")`.
pub fn split_leaf(path: &str) -> Result<(SecretPath, &str)> {
    if path.is_empty() || is_directory(path) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    let (dir, name) = match path.rfind(SEPARATOR) {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => (ROOT, path),
    };
    validate_dir(dir)?;
    Ok((dir.to_string(), name))
}

/// The display name of a leaf (`creds` for `a/b/creds`).
pub fn leaf_name(path: &str) -> Result<&str> {
    split_leaf(path).map(|(_, name)| name)
}

/// Split a user-supplied directory path into listing entries to descend
/// through: `a/b/` yields `["a/", "b/"]`. A missing trailing separator is
/// tolerated here since this parses typed input, not store paths.
pub fn segments(path: &str) -> Result<Vec<String>> {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let normalized = format!("{}{}", trimmed, SEPARATOR);
    validate_dir(&normalized)?;
    Ok(trimmed
        .split(SEPARATOR)
        .map(|s| format!("{}{}", s, SEPARATOR))
        .collect())
}
