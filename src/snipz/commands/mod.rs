//! # Commands
//!
//! One module per operation. Each `run` function takes the stores and
//! collaborators it needs explicitly and returns a [`CmdResult`]: records it
//! touched, content it read, paths it resolved, and user-facing messages.
//! Nothing here prints.
//!
//! Writes that span both stores are ordered so a failure leaves no half
//! snippet behind:
//!
//! - `save`: content file first, metadata row second; the file is deleted if
//!   the insert fails.
//! - `remove`: metadata row first; the row decides whether the snippet exists.
//! - `edit`: the row is only rewritten after the new content has been read back.

use crate::model::Metadata;
use std::path::PathBuf;

pub mod edit;
pub mod get;
pub mod list;
pub mod open;
pub mod paths;
pub mod remove;
pub mod save;
pub mod tagging;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<Metadata>,
    pub listed: Vec<Metadata>,
    pub content: Option<Vec<u8>>,
    pub paths: Vec<PathBuf>,
    pub tags_added: Vec<String>,
    pub tags_removed: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<Metadata>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, records: Vec<Metadata>) -> Self {
        self.listed = records;
        self
    }

    pub fn with_content(mut self, content: Vec<u8>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    /// The single record an operation acted on, if any.
    pub fn record(&self) -> Option<&Metadata> {
        self.affected.first()
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}
