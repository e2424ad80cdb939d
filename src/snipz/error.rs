use std::path::PathBuf;
use thiserror::Error;

/// Validation failures for user-supplied keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key must not be empty")]
    Empty,

    #[error("key must be relative")]
    Absolute,

    #[error("key segment invalid: empty segment")]
    BadSegment,

    #[error("key cannot traverse parent directories")]
    Traversal,

    #[error("key contains an unsupported character: {0:?}")]
    BadCharacter(char),
}

#[derive(Error, Debug)]
pub enum SnipzError {
    #[error("Invalid key: {0}")]
    Key(#[from] KeyError),

    #[error("Snippet content not found: {}", .0.display())]
    ContentNotFound(PathBuf),

    #[error("Snippet metadata not found: {0}")]
    MetadataNotFound(String),

    #[error("Snippet metadata already exists: {0}")]
    Duplicate(String),

    #[error("Snippet already exists: {0}")]
    SnippetExists(String),

    #[error("Snippet content is empty")]
    EmptyContent,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnipzError>;
