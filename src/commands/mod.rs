//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule. All of them operate on a
//! [`CliWorkspace`] opened from the project [`Config`].

pub mod answers;
pub mod flags;
pub mod generate;
pub mod history;
pub mod init;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use crate::compliance::FileFlags;
use crate::config::{Config, StoreBackend};
use crate::document::DirectoryCatalog;
use crate::storage::{FileStore, KeyValueStore};
use crate::workspace::Workspace;

pub use answers::{
    execute_answers, execute_questions, execute_status, AnswersSubcommand, QuestionsOptions,
};
pub use flags::{execute_flags, FlagsSubcommand};
pub use generate::{
    execute_edit, execute_generate, execute_show, EditOptions, GenerateOptions, ShowOptions,
};
pub use history::{
    execute_diff, execute_rollback, execute_versions, DiffOptions, RollbackOptions, VersionsOptions,
};
pub use init::{execute_init, InitOptions};

/// Workspace over the configured store, the content directory and the flag file
pub type CliWorkspace = Workspace<Box<dyn KeyValueStore>, DirectoryCatalog, FileFlags>;

/// Open the workspace described by `config`
pub fn open_workspace(config: &Config) -> Result<CliWorkspace> {
    let store = open_store(config)?;
    let workspace = Workspace::new(
        store,
        DirectoryCatalog::new(&config.content_dir),
        FileFlags::new(&config.compliance_file),
    )
    .with_site(config.site.clone())
    .with_author(config.author.clone())
    .with_diff_mode(config.diff_mode);
    Ok(workspace)
}

fn open_store(config: &Config) -> Result<Box<dyn KeyValueStore>> {
    match config.store_backend {
        StoreBackend::File => Ok(Box::new(FileStore::new(&config.store_dir))),
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            use anyhow::Context;
            let path = config.sqlite_path();
            let store = crate::storage::SqliteStore::open(&path)
                .with_context(|| format!("Failed to open SQLite store {}", path.display()))?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => Err(anyhow!(
            "storeBackend is 'sqlite' but this build lacks the 'sqlite' feature"
        )),
    }
}

/// Parse `key=value` pairs; values are read as JSON when possible
pub fn parse_assignments(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("Missing key in '{}'", pair));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}
