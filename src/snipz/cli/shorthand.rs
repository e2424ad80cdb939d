//! Tag shorthand on the command line: `@tag` or `#tag` adds (`+@tag` too),
//! `-@tag` or `-#tag` removes. Anything else is handed back untouched.

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TagWords {
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub rest: Vec<String>,
}

pub fn split_tag_words<S: AsRef<str>>(words: &[S]) -> TagWords {
    let mut out = TagWords::default();
    for word in words {
        let word = word.as_ref();
        if let Some(tag) = added_tag(word) {
            push_tag(&mut out.add, tag);
        } else if let Some(tag) = removed_tag(word) {
            push_tag(&mut out.remove, tag);
        } else {
            out.rest.push(word.to_string());
        }
    }
    out
}

fn added_tag(word: &str) -> Option<&str> {
    let word = word.strip_prefix('+').unwrap_or(word);
    strip_marker(word)
}

fn removed_tag(word: &str) -> Option<&str> {
    strip_marker(word.strip_prefix('-')?)
}

fn strip_marker(word: &str) -> Option<&str> {
    word.strip_prefix('@').or_else(|| word.strip_prefix('#'))
}

/// A bare marker (`@`, `-#`) is consumed but adds nothing.
fn push_tag(tags: &mut Vec<String>, tag: &str) {
    let tag = tag.trim();
    if !tag.is_empty() {
        tags.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_adds_removes_and_rest() {
        let words = split_tag_words(&["go/foo", "@rust", "#cli", "+@web", "-@old", "-#Stale"]);
        assert_eq!(
            words,
            TagWords {
                add: vec!["rust".into(), "cli".into(), "web".into()],
                remove: vec!["old".into(), "Stale".into()],
                rest: vec!["go/foo".into()],
            }
        );
    }

    #[test]
    fn bare_markers_are_swallowed() {
        let words = split_tag_words(&["@", "-@", "+#"]);
        assert_eq!(words, TagWords::default());
    }

    #[test]
    fn other_hyphen_words_are_left_alone() {
        let words = split_tag_words(&["-t", "--tag", "+x", "a@b"]);
        assert!(words.add.is_empty());
        assert!(words.remove.is_empty());
        assert_eq!(words.rest, vec!["-t", "--tag", "+x", "a@b"]);
    }
}
