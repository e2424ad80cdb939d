//! # Keys
//!
//! A key is a relative, slash-delimited identifier such as `go/foo` or
//! `auto/1700000000`. It names both the content file under the base directory
//! and the metadata row, so every key that reaches the filesystem goes through
//! this module first.
//!
//! Normalization is validation only: surrounding whitespace is trimmed, but
//! case and separators are preserved.
//!
//! Allowed characters per segment: ASCII letters, digits, `-`, `_` and `.`.
//! Segments may not be empty, `.` or `..`.

use crate::error::{KeyError, Result};
use std::path::{Component, Path, PathBuf};

/// Trims and validates a raw key, returning the normalized form.
pub fn normalize(raw: &str) -> std::result::Result<String, KeyError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(KeyError::Empty);
    }

    if key.starts_with('/') {
        return Err(KeyError::Absolute);
    }

    if key.split('/').any(str::is_empty) {
        return Err(KeyError::BadSegment);
    }

    for segment in key.split('/') {
        validate_segment(segment)?;
    }

    Ok(key.to_string())
}

fn validate_segment(segment: &str) -> std::result::Result<(), KeyError> {
    if segment == "." || segment == ".." {
        return Err(KeyError::Traversal);
    }

    match segment.chars().find(|c| !is_allowed(*c)) {
        Some(bad) => Err(KeyError::BadCharacter(bad)),
        None => Ok(()),
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Resolves a key to a path under `base_dir`.
///
/// The key is normalized first, then joined and lexically cleaned. The cleaned
/// path is checked again against the base directory: segment validation alone
/// is not relied upon to keep the result inside `base_dir`.
pub fn resolve_path(base_dir: &Path, raw: &str) -> Result<PathBuf> {
    let key = normalize(raw)?;

    let base = clean(base_dir);
    let mut full = base.clone();
    for segment in key.split('/') {
        full.push(segment);
    }
    let full = clean(&full);

    // A relative base of `.` cleans away entirely, so the joined path is
    // already relative to it.
    let rel = if base == Path::new(".") {
        Some(full.as_path())
    } else {
        full.strip_prefix(&base).ok()
    };

    match rel {
        Some(rel) if !escapes(rel) => {
            log::debug!("resolved key {key:?} to {}", full.display());
            Ok(full)
        }
        _ => Err(KeyError::Traversal.into()),
    }
}

/// A relative path escapes when it is empty (the base itself) or walks upward.
fn escapes(rel: &Path) -> bool {
    let mut components = rel.components().peekable();
    if components.peek().is_none() {
        return true;
    }
    components.any(|c| matches!(c, Component::ParentDir))
}

/// Lexical path cleaning: drops `.` components and folds `..` into its parent.
/// A `..` that cannot be folded is kept so callers can detect the escape.
fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
