//! Content files.
//!
//! Snippet bodies live as flat files at `<base>/<key>`. Writes go through a
//! temporary file in the target's own directory which is renamed into place,
//! so a reader never observes a partially written snippet. Files are `0600`,
//! directories `0700`.

use crate::error::{Result, SnipzError};
use crate::key;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const TEMP_PREFIX: &str = ".snipz-";

/// Modification time and size of a content file, used to detect edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub modified: SystemTime,
    pub len: u64,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    base_dir: PathBuf,
}

impl ContentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a raw key to its content path under the base directory.
    pub fn path_for(&self, raw_key: &str) -> Result<PathBuf> {
        key::resolve_path(&self.base_dir, raw_key)
    }

    /// Atomically writes everything from `content` to `path`.
    pub fn save<R: Read>(&self, path: &Path, content: R) -> Result<()> {
        write_atomic(path, content)?;
        log::debug!("wrote content file {}", path.display());
        Ok(())
    }

    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|err| not_found_or_io(err, path))
    }

    pub fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|err| not_found_or_io(err, path))?;
        log::debug!("deleted content file {}", path.display());
        Ok(())
    }

    /// Only regular files count; a directory at `path` is not a snippet.
    pub fn exists(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SnipzError::Io(err)),
        }
    }

    pub fn stat(&self, path: &Path) -> Result<FileStamp> {
        let meta = fs::metadata(path).map_err(|err| not_found_or_io(err, path))?;
        Ok(FileStamp {
            modified: meta.modified()?,
            len: meta.len(),
        })
    }
}

/// Writes `content` to a private temp file beside `path`, then renames it over `path`.
pub fn write_atomic<R: Read>(path: &Path, mut content: R) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        SnipzError::Config(format!("content path has no parent: {}", path.display()))
    })?;
    create_private_dir(dir)?;

    // Dropping the temp file on any early return removes it.
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)?;
    restrict_file(tmp.as_file())?;

    io::copy(&mut content, &mut tmp)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|err| SnipzError::Io(err.error))?;
    Ok(())
}

fn not_found_or_io(err: io::Error, path: &Path) -> SnipzError {
    if err.kind() == io::ErrorKind::NotFound {
        SnipzError::ContentNotFound(path.to_path_buf())
    } else {
        SnipzError::Io(err)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_file(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_file(_file: &fs::File) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Yields a few bytes, then fails as if the source died mid-stream.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "source died"));
            }
            self.sent = true;
            let chunk = b"partial content";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    fn setup() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        (dir, store)
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(TEMP_PREFIX))
            .collect()
    }

    #[test]
    fn save_then_read() {
        let (_dir, store) = setup();
        let path = store.path_for("go/foo").unwrap();

        store.save(&path, &b"package main\n"[..]).unwrap();

        assert_eq!(store.read(&path).unwrap(), b"package main\n");
        assert!(store.exists(&path).unwrap());
        assert!(leftovers(path.parent().unwrap()).is_empty());
    }

    #[test]
    fn save_replaces_existing_file() {
        let (_dir, store) = setup();
        let path = store.path_for("note").unwrap();

        store.save(&path, &b"old"[..]).unwrap();
        store.save(&path, &b"new"[..]).unwrap();

        assert_eq!(store.read(&path).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn save_applies_private_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, store) = setup();
        let path = store.path_for("deep/nested/key").unwrap();

        store.save(&path, &b"secret"[..]).unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = fs::metadata(dir.path().join("deep/nested"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn interrupted_save_leaves_nothing_behind() {
        let (_dir, store) = setup();
        let path = store.path_for("go/broken").unwrap();

        let result = store.save(&path, FailingReader { sent: false });

        assert!(matches!(result, Err(SnipzError::Io(_))));
        assert!(!store.exists(&path).unwrap());
        assert!(matches!(
            store.read(&path),
            Err(SnipzError::ContentNotFound(_))
        ));
        assert!(leftovers(path.parent().unwrap()).is_empty());
    }

    #[test]
    fn interrupted_overwrite_keeps_previous_content() {
        let (_dir, store) = setup();
        let path = store.path_for("keep").unwrap();
        store.save(&path, &b"intact"[..]).unwrap();

        assert!(store.save(&path, FailingReader { sent: false }).is_err());

        assert_eq!(store.read(&path).unwrap(), b"intact");
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, store) = setup();
        let path = store.path_for("missing").unwrap();
        let err = store.read(&path).unwrap_err();
        assert!(matches!(err, SnipzError::ContentNotFound(p) if p == path));
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let (_dir, store) = setup();
        let path = store.path_for("gone").unwrap();
        store.save(&path, &b"x"[..]).unwrap();

        store.delete(&path).unwrap();

        assert!(!store.exists(&path).unwrap());
        assert!(matches!(
            store.delete(&path),
            Err(SnipzError::ContentNotFound(_))
        ));
    }

    #[test]
    fn directories_do_not_count_as_snippets() {
        let (dir, store) = setup();
        fs::create_dir_all(dir.path().join("go")).unwrap();
        let path = store.path_for("go").unwrap();
        assert!(!store.exists(&path).unwrap());
    }

    #[test]
    fn stat_changes_with_content() {
        let (_dir, store) = setup();
        let path = store.path_for("stamp").unwrap();
        store.save(&path, &b"one"[..]).unwrap();
        let before = store.stat(&path).unwrap();

        store.save(&path, &b"three"[..]).unwrap();
        let after = store.stat(&path).unwrap();

        assert_eq!(before.len, 3);
        assert_eq!(after.len, 5);
        assert_ne!(before, after);
    }
}
