//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UIs. It owns the stores and the injected collaborators
//! (clock, key generator, editor, opener, pager) and hands them to the
//! command functions.
//!
//! It does no formatting and no terminal I/O: every method returns
//! `Result<CmdResult>`.
//!
//! `SnipzApi<M: MetadataStore>` is generic over the metadata backend:
//! - Production: `SnipzApi<SqliteStore>`
//! - Testing: `SnipzApi<InMemoryStore>`

use crate::clock::{Clock, SystemClock};
use crate::commands::{self, open::Viewer, save::SaveRequest, CmdResult};
use crate::error::{Result, SnipzError};
use crate::keygen::KeyGenerator;
use crate::launcher::Launcher;
use crate::store::content::ContentStore;
use crate::store::MetadataStore;
use std::path::Path;

pub use crate::commands::list::Page;
pub use crate::commands::{CmdMessage, MessageLevel};

pub struct SnipzApi<M: MetadataStore> {
    meta: M,
    content: ContentStore,
    keygen: KeyGenerator,
    clock: Box<dyn Clock>,
    editor: Option<Box<dyn Launcher>>,
    opener: Option<Box<dyn Launcher>>,
    pager: Option<Box<dyn Launcher>>,
}

impl<M: MetadataStore> SnipzApi<M> {
    pub fn new(meta: M, content: ContentStore, keygen: KeyGenerator) -> Self {
        Self {
            meta,
            content,
            keygen,
            clock: Box::new(SystemClock),
            editor: None,
            opener: None,
            pager: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_editor(mut self, editor: impl Launcher + 'static) -> Self {
        self.editor = Some(Box::new(editor));
        self
    }

    pub fn with_opener(mut self, opener: impl Launcher + 'static) -> Self {
        self.opener = Some(Box::new(opener));
        self
    }

    pub fn with_pager(mut self, pager: impl Launcher + 'static) -> Self {
        self.pager = Some(Box::new(pager));
        self
    }

    pub fn base_dir(&self) -> &Path {
        self.content.base_dir()
    }

    pub fn save(&mut self, request: SaveRequest) -> Result<CmdResult> {
        commands::save::run(
            &mut self.meta,
            &self.content,
            &self.keygen,
            &*self.clock,
            request,
        )
    }

    pub fn get(&self, key: &str) -> Result<CmdResult> {
        commands::get::run(&self.meta, &self.content, key)
    }

    pub fn list(&self, tag: Option<&str>, page: Option<Page>) -> Result<CmdResult> {
        commands::list::run(&self.meta, tag, page)
    }

    pub fn edit(&mut self, key: &str) -> Result<CmdResult> {
        let editor = require(&self.editor, "editor")?;
        commands::edit::run(
            &mut self.meta,
            &self.content,
            &*self.clock,
            editor,
            key,
        )
    }

    pub fn open(&self, key: &str, use_pager: bool) -> Result<CmdResult> {
        let viewer = if use_pager {
            Viewer::Pager(require(&self.pager, "pager")?)
        } else {
            Viewer::Opener(require(&self.opener, "opener")?)
        };
        commands::open::run(&self.meta, &self.content, viewer, key)
    }

    pub fn remove(&mut self, key: &str) -> Result<CmdResult> {
        commands::remove::run(&mut self.meta, &self.content, key)
    }

    pub fn update_tags<A: AsRef<str>, R: AsRef<str>>(
        &mut self,
        key: &str,
        add: &[A],
        remove: &[R],
    ) -> Result<CmdResult> {
        commands::tagging::run(&mut self.meta, &*self.clock, key, add, remove)
    }

    pub fn paths<K: AsRef<str>>(&self, keys: &[K]) -> Result<CmdResult> {
        commands::paths::run(&self.meta, &self.content, keys)
    }
}

fn require<'a>(launcher: &'a Option<Box<dyn Launcher>>, what: &str) -> Result<&'a dyn Launcher> {
    launcher
        .as_deref()
        .ok_or_else(|| SnipzError::Config(format!("no {what} configured")))
}
