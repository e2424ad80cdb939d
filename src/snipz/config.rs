//! Configuration discovery.
//!
//! Environment variables are read through an [`EnvLookup`] passed in by the
//! caller, so resolution can be tested without touching the process
//! environment. Blank values count as unset.

use crate::error::{Result, SnipzError};
use crate::keygen::KeyStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
const APP_DIR: &str = "snipz";
const HOME_DIR: &str = ".snipz";

const DEFAULT_EDITOR: &str = "nano";
const DEFAULT_PAGER: &str = "less";
#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// Looks up an environment variable by name.
pub type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Reads the real process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn lookup(env: &EnvLookup<'_>, name: &str) -> Option<String> {
    env(name).filter(|value| !value.trim().is_empty())
}

/// Optional settings stored in `<base>/config.json`. Every field may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnipzConfig {
    /// How keys are generated when none is given
    #[serde(default)]
    pub key_strategy: KeyStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opener: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<String>,
}

impl SnipzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: SnipzConfig = serde_json::from_str(&content)?;
        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Editor command: config, `SNIPZ_EDITOR`, `EDITOR`, `VISUAL`, then `nano`.
    pub fn editor_command(&self, env: &EnvLookup<'_>) -> String {
        first_set(
            self.editor.as_deref(),
            env,
            &["SNIPZ_EDITOR", "EDITOR", "VISUAL"],
            DEFAULT_EDITOR,
        )
    }

    /// Opener command: config, `SNIPZ_OPENER`, then the platform default.
    pub fn opener_command(&self, env: &EnvLookup<'_>) -> String {
        first_set(self.opener.as_deref(), env, &["SNIPZ_OPENER"], DEFAULT_OPENER)
    }

    /// Pager command: config, `SNIPZ_PAGER`, `PAGER`, then `less`.
    pub fn pager_command(&self, env: &EnvLookup<'_>) -> String {
        first_set(
            self.pager.as_deref(),
            env,
            &["SNIPZ_PAGER", "PAGER"],
            DEFAULT_PAGER,
        )
    }
}

fn first_set(configured: Option<&str>, env: &EnvLookup<'_>, vars: &[&str], fallback: &str) -> String {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| vars.iter().find_map(|var| lookup(env, var)))
        .unwrap_or_else(|| fallback.to_string())
}

/// Finds the base directory: `SNIPZ_HOME`, then `$XDG_DATA_HOME/snipz`,
/// then `<home>/.snipz`. A leading `~` is expanded and the result made absolute.
pub fn resolve_base_dir(env: &EnvLookup<'_>, home: Option<&Path>) -> Result<PathBuf> {
    let dir = if let Some(explicit) = lookup(env, "SNIPZ_HOME") {
        expand_tilde(explicit.trim(), home)?
    } else if let Some(data_home) = lookup(env, "XDG_DATA_HOME") {
        expand_tilde(data_home.trim(), home)?.join(APP_DIR)
    } else {
        home.map(|h| h.join(HOME_DIR))
            .ok_or_else(|| SnipzError::Config("could not determine home directory".to_string()))?
    };

    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

fn expand_tilde(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(raw)),
    };
    let home = home.ok_or_else(|| {
        SnipzError::Config(format!("cannot expand {raw:?}: no home directory"))
    })?;
    if rest.is_empty() {
        Ok(home.to_path_buf())
    } else {
        Ok(home.join(rest))
    }
}

/// The user's home directory, as reported by the platform.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
