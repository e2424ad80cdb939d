//! # Storage Layer
//!
//! A snippet lives in two places: its content as a flat file, and its
//! metadata as a row in a relational table. The two are kept separate so that
//! listing never has to open content files.
//!
//! ## Implementations
//!
//! - [`content::ContentStore`]: atomic flat-file storage under the base directory
//! - [`sqlite::SqliteStore`]: production metadata table (`.meta.db`)
//! - [`memory::InMemoryStore`]: metadata kept in memory, for tests
//!
//! ## Storage Format
//!
//! ```text
//! ~/.snipz/
//! ├── .meta.db          # snippets table
//! ├── .id               # next numeric key (counter strategy only)
//! ├── config.json       # optional configuration
//! ├── go/foo            # content for key "go/foo"
//! └── auto/1700000000   # content for an auto key
//! ```
//!
//! No cross-store transaction exists; the orchestrators in `commands` order
//! their writes and compensate on failure.

use crate::config::CONFIG_FILENAME;
use crate::error::Result;
use crate::keygen::COUNTER_FILENAME;
use crate::model::Metadata;
use sqlite::DB_FILENAME;

pub mod content;
pub mod memory;
pub mod sqlite;

/// Files the store keeps beside the snippets. No key may name one of them.
const RESERVED: [&str; 6] = [
    DB_FILENAME,
    ".meta.db-wal",
    ".meta.db-shm",
    ".meta.db-journal",
    COUNTER_FILENAME,
    CONFIG_FILENAME,
];

/// True when a normalized key names one of the store's own files.
pub fn is_reserved(key: &str) -> bool {
    RESERVED.contains(&key)
}

/// CRUD over snippet metadata, keyed by normalized key.
pub trait MetadataStore {
    /// Insert a new row. Fails with `Duplicate` when the key is taken.
    fn insert(&mut self, record: &Metadata) -> Result<()>;

    /// Fetch a row. Fails with `MetadataNotFound` when absent.
    fn get(&self, key: &str) -> Result<Metadata>;

    /// All rows, newest `created` first.
    fn list(&self) -> Result<Vec<Metadata>>;

    /// Replace every mutable column of an existing row.
    /// `created` is left as stored; callers carry it forward.
    fn update(&mut self, record: &Metadata) -> Result<()>;

    /// Delete a row. Fails with `MetadataNotFound` when nothing was removed.
    fn delete(&mut self, key: &str) -> Result<()>;
}
