//! # Auto Keys
//!
//! When a snippet is saved without a key, one is generated. Two strategies
//! exist and a deployment picks one through configuration:
//!
//! - **Timestamp** (default): `auto/<unix seconds>`, then `auto/<secs>-1`,
//!   `auto/<secs>-2`, ... until a candidate is free. Given the same clock and
//!   the same existing keys it always yields the same key, and it needs no
//!   shared state.
//! - **Counter**: numeric keys (`1`, `2`, ...) from a counter persisted in
//!   `<base>/.id`. Probing starts at the stored value and takes the lowest free
//!   id at or above it; the counter then moves to one past the id handed out.
//!
//! Both strategies probe through a caller-supplied existence predicate and
//! refuse to run without one.

use crate::error::{Result, SnipzError};
use crate::store::content::write_atomic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const AUTO_NAMESPACE: &str = "auto";
pub const COUNTER_FILENAME: &str = ".id";

/// Reports whether a candidate key is already taken.
pub type ExistsFn<'a> = dyn FnMut(&str) -> Result<bool> + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    #[default]
    Timestamp,
    Counter,
}

/// Generates `auto/<secs>` or the first free `auto/<secs>-N`.
pub fn generate_auto(now: DateTime<Utc>, exists: Option<&mut ExistsFn<'_>>) -> Result<String> {
    let exists = exists.ok_or_else(missing_predicate)?;

    let base = format!("{}/{}", AUTO_NAMESPACE, now.timestamp());
    let mut candidate = base.clone();
    let mut suffix: u64 = 1;

    loop {
        let taken = exists(&candidate).map_err(|err| probe_failed(&candidate, err))?;
        if !taken {
            log::debug!("auto key {candidate} is free");
            return Ok(candidate);
        }
        log::debug!("auto key {candidate} is taken");
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

/// Persisted "next id" counter for numeric keys.
#[derive(Debug, Clone)]
pub struct IdCounter {
    path: PathBuf,
}

impl IdCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(base_dir: &Path) -> Self {
        Self::new(base_dir.join(COUNTER_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current stored value; a missing file counts as `1`.
    pub fn current(&self) -> Result<u64> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                SnipzError::Config(format!(
                    "invalid id counter {:?} in {}",
                    raw.trim(),
                    self.path.display()
                ))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(1),
            Err(err) => Err(SnipzError::Io(err)),
        }
    }

    pub fn store(&self, value: u64) -> Result<()> {
        write_atomic(&self.path, format!("{value}\n").as_bytes())
    }

    /// Returns the lowest free id at or above the stored value and advances
    /// the counter past it.
    pub fn next_id(&self, exists: Option<&mut ExistsFn<'_>>) -> Result<u64> {
        let exists = exists.ok_or_else(missing_predicate)?;

        let mut candidate = self.current()?;
        loop {
            let key = candidate.to_string();
            if !exists(&key).map_err(|err| probe_failed(&key, err))? {
                break;
            }
            candidate = self.advance(candidate)?;
        }

        self.store(self.advance(candidate)?)?;
        log::debug!("counter key {candidate} is free");
        Ok(candidate)
    }

    fn advance(&self, id: u64) -> Result<u64> {
        id.checked_add(1).ok_or_else(|| {
            SnipzError::Config(format!("id counter exhausted in {}", self.path.display()))
        })
    }
}

/// The strategy chosen for a deployment, plus whatever state it needs.
#[derive(Debug, Clone)]
pub enum KeyGenerator {
    Timestamp,
    Counter(IdCounter),
}

impl KeyGenerator {
    pub fn for_strategy(strategy: KeyStrategy, base_dir: &Path) -> Self {
        match strategy {
            KeyStrategy::Timestamp => KeyGenerator::Timestamp,
            KeyStrategy::Counter => KeyGenerator::Counter(IdCounter::in_dir(base_dir)),
        }
    }

    pub fn strategy(&self) -> KeyStrategy {
        match self {
            KeyGenerator::Timestamp => KeyStrategy::Timestamp,
            KeyGenerator::Counter(_) => KeyStrategy::Counter,
        }
    }

    pub fn generate(&self, now: DateTime<Utc>, exists: Option<&mut ExistsFn<'_>>) -> Result<String> {
        match self {
            KeyGenerator::Timestamp => generate_auto(now, exists),
            KeyGenerator::Counter(counter) => counter.next_id(exists).map(|id| id.to_string()),
        }
    }
}

fn missing_predicate() -> SnipzError {
    SnipzError::Config("key generator requires an existence check".to_string())
}

fn probe_failed(candidate: &str, err: SnipzError) -> SnipzError {
    log::debug!("existence check for {candidate:?} failed: {err}");
    err
}
