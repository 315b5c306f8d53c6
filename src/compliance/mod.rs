//! @acp:module "Compliance Flags"
//! @acp:summary "Jurisdiction codes and the read-only compliance flag source"
//! @acp:domain compliance
//! @acp:layer model
//!
//! Compliance flags are toggled by an external settings collaborator. This
//! module only reads them: the composer polls a [`ComplianceFlagsProvider`]
//! on every composition and never caches the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PolicyError, Result};

/// Privacy frameworks a document can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Gdpr,
    Ccpa,
    Lgpd,
    Pipeda,
    Popia,
}

impl Jurisdiction {
    pub fn all() -> &'static [Jurisdiction] {
        &[
            Jurisdiction::Gdpr,
            Jurisdiction::Ccpa,
            Jurisdiction::Lgpd,
            Jurisdiction::Pipeda,
            Jurisdiction::Popia,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Gdpr => "GDPR",
            Jurisdiction::Ccpa => "CCPA",
            Jurisdiction::Lgpd => "LGPD",
            Jurisdiction::Pipeda => "PIPEDA",
            Jurisdiction::Popia => "POPIA",
        }
    }

    /// Value of the `target_regions` answer that selects this framework
    pub fn region(&self) -> &'static str {
        match self {
            Jurisdiction::Gdpr => "EU",
            Jurisdiction::Ccpa => "US-CA",
            Jurisdiction::Lgpd => "BR",
            Jurisdiction::Pipeda => "CA",
            Jurisdiction::Popia => "ZA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Jurisdiction::Gdpr => "EU General Data Protection Regulation",
            Jurisdiction::Ccpa => "California Consumer Privacy Act",
            Jurisdiction::Lgpd => "Lei Geral de Proteção de Dados",
            Jurisdiction::Pipeda => "Personal Information Protection and Electronic Documents Act",
            Jurisdiction::Popia => "Protection of Personal Information Act",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        Jurisdiction::all()
            .iter()
            .copied()
            .find(|j| j.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PolicyError::validation("parse jurisdiction", format!("unknown code '{}'", s))
            })
    }
}

/// Jurisdiction code to enabled flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplianceFlags(BTreeMap<Jurisdiction, bool>);

impl ComplianceFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, jurisdiction: Jurisdiction, enabled: bool) -> Self {
        self.set(jurisdiction, enabled);
        self
    }

    pub fn set(&mut self, jurisdiction: Jurisdiction, enabled: bool) {
        self.0.insert(jurisdiction, enabled);
    }

    /// Unset codes read as disabled
    pub fn is_enabled(&self, jurisdiction: Jurisdiction) -> bool {
        self.0.get(&jurisdiction).copied().unwrap_or(false)
    }

    /// True when at least one framework is switched on
    pub fn any_enabled(&self) -> bool {
        self.0.values().any(|enabled| *enabled)
    }

    pub fn enabled(&self) -> impl Iterator<Item = Jurisdiction> + '_ {
        self.0
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(j, _)| *j)
    }
}

/// Read-only source of compliance flags, polled at composition time
pub trait ComplianceFlagsProvider {
    fn flags(&self) -> ComplianceFlags;
}

impl ComplianceFlagsProvider for ComplianceFlags {
    fn flags(&self) -> ComplianceFlags {
        self.clone()
    }
}

/// Flags stored as a JSON object (`{"GDPR": true}`) in a settings file
#[derive(Debug, Clone)]
pub struct FileFlags {
    path: PathBuf,
}

impl FileFlags {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file is an empty flag set
    pub fn load(&self) -> Result<ComplianceFlags> {
        if !self.path.exists() {
            return Ok(ComplianceFlags::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, flags: &ComplianceFlags) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(flags)?)?;
        Ok(())
    }
}

impl ComplianceFlagsProvider for FileFlags {
    fn flags(&self) -> ComplianceFlags {
        match self.load() {
            Ok(flags) => flags,
            Err(e) => {
                tracing::warn!("Ignoring unreadable compliance flags {:?}: {}", self.path, e);
                ComplianceFlags::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jurisdiction_from_str() {
        assert_eq!("gdpr".parse::<Jurisdiction>().unwrap(), Jurisdiction::Gdpr);
        assert_eq!("CCPA".parse::<Jurisdiction>().unwrap(), Jurisdiction::Ccpa);
        assert!("HIPAA".parse::<Jurisdiction>().is_err());
    }

    #[test]
    fn test_flags_default_to_disabled() {
        let flags = ComplianceFlags::new().with(Jurisdiction::Gdpr, false);
        assert!(!flags.is_enabled(Jurisdiction::Gdpr));
        assert!(!flags.is_enabled(Jurisdiction::Ccpa));
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_flags_serialize_by_code() {
        let flags = ComplianceFlags::new().with(Jurisdiction::Lgpd, true);
        assert_eq!(serde_json::to_string(&flags).unwrap(), r#"{"LGPD":true}"#);
        let parsed: ComplianceFlags = serde_json::from_str(r#"{"GDPR":true,"CCPA":false}"#).unwrap();
        assert_eq!(parsed.enabled().collect::<Vec<_>>(), vec![Jurisdiction::Gdpr]);
    }

    #[test]
    fn test_file_flags_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileFlags::new(dir.path().join("nested/compliance.json"));
        assert_eq!(provider.flags(), ComplianceFlags::default());

        provider
            .save(&ComplianceFlags::new().with(Jurisdiction::Popia, true))
            .unwrap();
        assert!(provider.flags().is_enabled(Jurisdiction::Popia));
    }

    #[test]
    fn test_file_flags_unreadable_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compliance.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(!FileFlags::new(path).flags().any_enabled());
    }
}
