use super::MetadataStore;
use crate::error::{Result, SnipzError};
use crate::model::{Metadata, SnippetType};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_FILENAME: &str = ".meta.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snippets (
    key TEXT PRIMARY KEY,
    type TEXT NOT NULL DEFAULT 'text',
    created DATETIME NOT NULL,
    modified DATETIME NOT NULL,
    description TEXT,
    tags TEXT
);
"#;

const COLUMNS: &str = "key, type, created, modified, description, tags";

/// Metadata table backed by a single SQLite connection.
///
/// All access in a process is serialized through this one connection;
/// cross-process safety is left to SQLite's file locking.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, creating its directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let store = Self {
            conn,
            path: Some(path),
        };
        store.migrate()?;
        Ok(store)
    }

    /// A private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl MetadataStore for SqliteStore {
    fn insert(&mut self, record: &Metadata) -> Result<()> {
        let sql = format!("INSERT INTO snippets ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)");
        self.conn
            .execute(
                &sql,
                params![
                    record.key,
                    record.kind,
                    record.created,
                    record.modified,
                    record.description,
                    record.tags,
                ],
            )
            .map_err(|err| insert_error(&record.key, err))?;
        log::debug!("inserted metadata for {}", record.key);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Metadata> {
        let sql = format!("SELECT {COLUMNS} FROM snippets WHERE key = ?1");
        self.conn
            .query_row(&sql, params![key], row_to_metadata)
            .optional()?
            .ok_or_else(|| SnipzError::MetadataNotFound(key.to_string()))
    }

    fn list(&self) -> Result<Vec<Metadata>> {
        let sql = format!("SELECT {COLUMNS} FROM snippets ORDER BY created DESC, key ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_metadata)?;
        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn update(&mut self, record: &Metadata) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE snippets SET type = ?2, modified = ?3, description = ?4, tags = ?5 WHERE key = ?1",
            params![
                record.key,
                record.kind,
                record.modified,
                record.description,
                record.tags,
            ],
        )?;
        if changed == 0 {
            return Err(SnipzError::MetadataNotFound(record.key.clone()));
        }
        log::debug!("updated metadata for {}", record.key);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM snippets WHERE key = ?1", params![key])?;
        if changed == 0 {
            return Err(SnipzError::MetadataNotFound(key.to_string()));
        }
        log::debug!("deleted metadata for {key}");
        Ok(())
    }
}

fn row_to_metadata(row: &Row<'_>) -> rusqlite::Result<Metadata> {
    Ok(Metadata {
        key: row.get(0)?,
        kind: row.get(1)?,
        created: row.get(2)?,
        modified: row.get(3)?,
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        tags: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

/// Only a clash on the key column is a duplicate; other constraint failures
/// stay database errors.
fn insert_error(key: &str, err: rusqlite::Error) -> SnipzError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == ErrorCode::ConstraintViolation
                && code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            SnipzError::Duplicate(key.to_string())
        }
        _ => SnipzError::Database(err),
    }
}

impl ToSql for SnippetType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SnippetType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|msg: String| FromSqlError::Other(msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn record(key: &str, created: DateTime<Utc>) -> Metadata {
        Metadata::new(key.to_string(), SnippetType::Text, created)
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let meta = record("go/foo", at(1_700_000_000))
            .with_description("desc")
            .with_tags("tag1,tag2");

        store.insert(&meta).unwrap();

        assert_eq!(store.get("go/foo").unwrap(), meta);
    }

    #[test]
    fn insert_duplicate_is_reported() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let meta = record("dup/key", at(1_700_000_000));
        store.insert(&meta).unwrap();

        let err = store.insert(&meta).unwrap_err();
        assert!(matches!(err, SnipzError::Duplicate(k) if k == "dup/key"));
    }

    #[test]
    fn other_constraint_failures_are_database_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .conn
            .execute(
                "INSERT INTO snippets (key, type, created, modified) VALUES ('k', 'text', NULL, NULL)",
                [],
            )
            .unwrap_err();

        assert!(matches!(insert_error("k", err), SnipzError::Database(_)));
        assert!(store.get("k").is_err());
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.get("missing"),
            Err(SnipzError::MetadataNotFound(_))
        ));
    }

    #[test]
    fn list_is_newest_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.list().unwrap().is_empty());

        let base = at(1_700_000_000);
        store.insert(&record("old", base)).unwrap();
        store
            .insert(&record("new", base + ChronoDuration::hours(2)))
            .unwrap();
        store
            .insert(&record("mid", base + ChronoDuration::hours(1)))
            .unwrap();

        let keys: Vec<_> = store.list().unwrap().into_iter().map(|m| m.key).collect();
        assert_eq!(keys, vec!["new", "mid", "old"]);
    }

    #[test]
    fn update_replaces_mutable_columns_only() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let original = record("k", at(1_700_000_000));
        store.insert(&original).unwrap();

        let mut changed = original.clone();
        changed.kind = SnippetType::Url;
        changed.modified = at(1_700_000_500);
        changed.tags = "a".into();
        changed.description = "d".into();
        changed.created = at(1);
        store.update(&changed).unwrap();

        let stored = store.get("k").unwrap();
        assert_eq!(stored.kind, SnippetType::Url);
        assert_eq!(stored.modified, at(1_700_000_500));
        assert_eq!(stored.tags, "a");
        assert_eq!(stored.description, "d");
        assert_eq!(stored.created, original.created);
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let err = store.update(&record("ghost", at(0))).unwrap_err();
        assert!(matches!(err, SnipzError::MetadataNotFound(_)));
    }

    #[test]
    fn delete_removes_row_once() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(&record("k", at(0))).unwrap();

        store.delete("k").unwrap();

        assert!(matches!(
            store.delete("k"),
            Err(SnipzError::MetadataNotFound(_))
        ));
        assert!(store.get("k").is_err());
    }

    #[test]
    fn null_description_and_tags_read_as_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO snippets (key, created, modified) VALUES ('bare', ?1, ?1)",
                params![at(10)],
            )
            .unwrap();

        let meta = store.get("bare").unwrap();
        assert_eq!(meta.kind, SnippetType::Text);
        assert_eq!(meta.description, "");
        assert_eq!(meta.tags, "");
    }

    #[test]
    fn open_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join(DB_FILENAME);

        {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.insert(&record("kept", at(42))).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.path(), Some(db_path.as_path()));
        assert_eq!(store.get("kept").unwrap().created, at(42));
    }
}
