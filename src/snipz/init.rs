use crate::api::SnipzApi;
use crate::clock::SystemClock;
use crate::config::{self, EnvLookup, SnipzConfig};
use crate::error::Result;
use crate::keygen::KeyGenerator;
use crate::launcher::CommandLauncher;
use crate::store::content::ContentStore;
use crate::store::sqlite::{SqliteStore, DB_FILENAME};
use std::fs;
use std::path::PathBuf;

pub struct SnipzContext {
    pub api: SnipzApi<SqliteStore>,
    pub config: SnipzConfig,
    pub base_dir: PathBuf,
}

/// Builds the production API from the environment: base directory, config
/// file, SQLite metadata and the external programs.
pub fn initialize(env: &EnvLookup<'_>) -> Result<SnipzContext> {
    let home = config::home_dir();
    let base_dir = config::resolve_base_dir(env, home.as_deref())?;
    initialize_at(base_dir, env)
}

/// Same as [`initialize`] with the base directory already chosen.
pub fn initialize_at(base_dir: PathBuf, env: &EnvLookup<'_>) -> Result<SnipzContext> {
    fs::create_dir_all(&base_dir)?;
    log::debug!("using base directory {}", base_dir.display());

    let config = SnipzConfig::load(&base_dir)?;
    let meta = SqliteStore::open(base_dir.join(DB_FILENAME))?;
    let keygen = KeyGenerator::for_strategy(config.key_strategy, &base_dir);

    let api = SnipzApi::new(meta, ContentStore::new(&base_dir), keygen)
        .with_clock(SystemClock)
        .with_editor(CommandLauncher::parse(&config.editor_command(env))?)
        .with_opener(CommandLauncher::parse(&config.opener_command(env))?)
        .with_pager(CommandLauncher::parse(&config.pager_command(env))?);

    Ok(SnipzContext {
        api,
        config,
        base_dir,
    })
}
