//! Tag merging.
//!
//! Tags are stored on the metadata row as one canonical string: lowercase,
//! trimmed, deduplicated, comma-joined, in order of first addition. An empty
//! tag list is the empty string.
//!
//! [`merge_tags`] is a fold over the existing list: additions are appended in
//! the order given, then removals are applied in a single pass. Removal always
//! wins when a tag is both added and removed in the same call. A comma inside
//! an added or removed tag separates tags, so `"a,b"` adds two tags.

use std::collections::HashSet;

/// Lowercases and trims a single tag.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Parses a canonical (or sloppy) tag string into an ordered, deduplicated list.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for tag in raw.split(',') {
        push_unique(&mut tags, normalize_tag(tag));
    }
    tags
}

/// Applies additions and then removals to `existing`, returning the canonical string.
pub fn merge_tags<A: AsRef<str>, R: AsRef<str>>(existing: &str, add: &[A], remove: &[R]) -> String {
    let mut current = parse_tags(existing);

    for tag in add.iter().flat_map(|tag| tag.as_ref().split(',')) {
        push_unique(&mut current, normalize_tag(tag));
    }

    let drop: HashSet<String> = remove
        .iter()
        .flat_map(|tag| tag.as_ref().split(','))
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .collect();
    if !drop.is_empty() {
        current.retain(|tag| !drop.contains(tag));
    }

    current.join(",")
}

/// Tags present in `after` but not in `before`, in `after` order.
pub fn diff(after: &[String], before: &[String]) -> Vec<String> {
    after
        .iter()
        .filter(|tag| !before.contains(tag))
        .cloned()
        .collect()
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tag.is_empty() && !tags.contains(&tag) {
        tags.push(tag);
    }
}
