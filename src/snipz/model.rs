use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a snippet holds, inferred from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetType {
    #[default]
    Text,
    Url,
}

impl SnippetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetType::Text => "text",
            SnippetType::Url => "url",
        }
    }
}

impl fmt::Display for SnippetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SnippetType::Text),
            "url" => Ok(SnippetType::Url),
            other => Err(format!("unknown snippet type: {other}")),
        }
    }
}

const URL_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "file://"];

/// Classifies content as `url` when its first line starts with a known scheme.
pub fn detect_type(content: &[u8]) -> SnippetType {
    let line = first_line(content).to_ascii_lowercase();
    if URL_SCHEMES.iter().any(|scheme| line.starts_with(scheme)) {
        SnippetType::Url
    } else {
        SnippetType::Text
    }
}

/// The first line of `content`, trimmed. Invalid UTF-8 is replaced lossily.
pub fn first_line(content: &[u8]) -> String {
    let line = match content.iter().position(|b| *b == b'\n') {
        Some(idx) => &content[..idx],
        None => content,
    };
    String::from_utf8_lossy(line).trim().to_string()
}

/// The first line of `content` that is not blank, trimmed.
pub fn first_non_empty_line(content: &[u8]) -> Option<String> {
    String::from_utf8_lossy(content)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// One row of the metadata table.
///
/// `key` and `created` never change after insert. `tags` always holds the
/// canonical comma-joined form produced by [`crate::tags`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: SnippetType,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub description: String,
    pub tags: String,
}

impl Metadata {
    pub fn new(key: String, kind: SnippetType, now: DateTime<Utc>) -> Self {
        Self {
            key,
            kind,
            created: now,
            modified: now,
            description: String::new(),
            tags: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn tag_list(&self) -> Vec<String> {
        crate::tags::parse_tags(&self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_url_schemes_case_insensitively() {
        assert_eq!(detect_type(b"https://example.com\n"), SnippetType::Url);
        assert_eq!(detect_type(b"HTTP://EXAMPLE.COM"), SnippetType::Url);
        assert_eq!(detect_type(b"ftp://host/file"), SnippetType::Url);
        assert_eq!(detect_type(b"File:///tmp/x\nmore"), SnippetType::Url);
    }

    #[test]
    fn detects_text_otherwise() {
        assert_eq!(detect_type(b"package main\n"), SnippetType::Text);
        assert_eq!(detect_type(b"see https://example.com"), SnippetType::Text);
        assert_eq!(detect_type(b""), SnippetType::Text);
        assert_eq!(detect_type(b"\nhttps://second.line"), SnippetType::Text);
    }

    #[test]
    fn first_line_is_trimmed() {
        assert_eq!(first_line(b"   https://x.io  \nrest"), "https://x.io");
        assert_eq!(detect_type(b"   https://x.io  \nrest"), SnippetType::Url);
    }

    #[test]
    fn first_non_empty_line_skips_blanks() {
        assert_eq!(
            first_non_empty_line(b"\n  \n https://a.b \n"),
            Some("https://a.b".to_string())
        );
        assert_eq!(first_non_empty_line(b"\n\n"), None);
    }

    #[test]
    fn snippet_type_parses_and_displays() {
        assert_eq!("url".parse::<SnippetType>().unwrap(), SnippetType::Url);
        assert_eq!(SnippetType::Text.to_string(), "text");
        assert!("blob".parse::<SnippetType>().is_err());
    }

    #[test]
    fn metadata_serializes_type_field() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let meta = Metadata::new("go/foo".into(), SnippetType::Url, now);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "url");
        assert_eq!(json["key"], "go/foo");
    }
}
