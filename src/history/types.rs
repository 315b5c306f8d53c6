//! @acp:module "History Types"
//! @acp:summary "Version records, listings and diff lines"
//! @acp:domain history
//! @acp:layer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// What superseded a snapshotted body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Regeneration,
    ManualEdit,
    PreRestoreSnapshot,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Regeneration => "regeneration",
            ChangeKind::ManualEdit => "manual_edit",
            ChangeKind::PreRestoreSnapshot => "pre_restore_snapshot",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of a superseded body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub change_kind: ChangeKind,
}

/// One row of a version listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub ordinal: usize,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_kind: Option<ChangeKind>,
    /// Body length in bytes
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Equal,
    Added,
    Removed,
}

/// A line of a version diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffLine {
    pub fn equal(text: impl Into<String>) -> Self {
        Self { kind: DiffKind::Equal, text: text.into() }
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self { kind: DiffKind::Added, text: text.into() }
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self { kind: DiffKind::Removed, text: text.into() }
    }
}

/// Line counts of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn of(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            match line.kind {
                DiffKind::Equal => acc.unchanged += 1,
                DiffKind::Added => acc.added += 1,
                DiffKind::Removed => acc.removed += 1,
            }
            acc
        })
    }

    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Diff algorithm used to compare versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Line-by-line by index; cheap but cascades after an insertion
    #[default]
    Positional,
    /// Longest-common-subsequence alignment
    Lcs,
}

impl FromStr for DiffMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(DiffMode::Positional),
            "lcs" | "myers" => Ok(DiffMode::Lcs),
            _ => Err(PolicyError::validation(
                "parse diff mode",
                format!("unknown diff mode '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::PreRestoreSnapshot).unwrap(),
            "\"pre_restore_snapshot\""
        );
    }

    #[test]
    fn test_diff_summary_counts() {
        let lines = vec![
            DiffLine::equal("a"),
            DiffLine::removed("b"),
            DiffLine::added("x"),
            DiffLine::equal("c"),
        ];
        let summary = DiffSummary::of(&lines);
        assert_eq!(summary, DiffSummary { added: 1, removed: 1, unchanged: 2 });
        assert!(!summary.is_identical());
    }

    #[test]
    fn test_diff_mode_parse() {
        assert_eq!("LCS".parse::<DiffMode>().unwrap(), DiffMode::Lcs);
        assert_eq!("positional".parse::<DiffMode>().unwrap(), DiffMode::Positional);
        assert!("word".parse::<DiffMode>().is_err());
    }
}
