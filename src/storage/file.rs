//! @acp:module "File Store"
//! @acp:summary "Key-value store keeping one pretty-printed JSON file per key"
//! @acp:domain storage
//! @acp:layer io

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::{validate_key, KeyValueStore};
use crate::error::{PolicyError, Result};

/// `<root>/<key>.json`, e.g. `.policyforge/store/history/privacy_policy.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put(&mut self, key: &str, value: Value) -> Result<bool> {
        let path = self.path_for(key)?;
        let content = serde_json::to_string_pretty(&value)?;

        if let Ok(existing) = std::fs::read_to_string(&path) {
            if existing == content {
                return Ok(false);
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PolicyError::save(key, e))?;
        }
        // Write beside the target and rename so readers never see a partial file
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, content).map_err(|e| PolicyError::save(key, e))?;
        std::fs::rename(&staging, &path).map_err(|e| PolicyError::save(key, e))?;

        tracing::debug!("Wrote {:?}", path);
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}
