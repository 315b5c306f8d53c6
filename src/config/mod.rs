//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::document::SiteProfile;
use crate::error::PolicyError;
use crate::history::DiffMode;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".policyforge.json";

fn default_store_dir() -> PathBuf {
    PathBuf::from(".policyforge/store")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_compliance_file() -> PathBuf {
    PathBuf::from(".policyforge/compliance.json")
}

fn default_author() -> String {
    crate::workspace::DEFAULT_AUTHOR.to_string()
}

/// Persistence backend for answers, documents and history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::File => "file",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(PolicyError::validation(
                "parse store backend",
                format!("unknown store backend '{}'", s),
            )),
        }
    }
}

/// @acp:summary "Main project configuration"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where answers, documents and history are stored
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Holds `templates/<type>.html` and `sections/<id>.html`
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// JSON object of jurisdiction code to boolean
    #[serde(default = "default_compliance_file")]
    pub compliance_file: PathBuf,

    /// Author recorded on history entries
    #[serde(default = "default_author")]
    pub author: String,

    /// Fallbacks for the site name and URL tokens
    #[serde(default)]
    pub site: SiteProfile,

    #[serde(default)]
    pub diff_mode: DiffMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            store_backend: StoreBackend::default(),
            content_dir: default_content_dir(),
            compliance_file: default_compliance_file(),
            author: default_author(),
            site: SiteProfile::default(),
            diff_mode: DiffMode::default(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a .policyforge.json file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }

    /// SQLite database file used by the `sqlite` backend
    pub fn sqlite_path(&self) -> PathBuf {
        self.store_dir.join("policyforge.db")
    }
}
