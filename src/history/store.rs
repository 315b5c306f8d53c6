//! @acp:module "Version Store"
//! @acp:summary "Append-only history of superseded bodies for one document type"
//! @acp:domain history
//! @acp:layer service
//!
//! Ordinals run oldest to newest: `1..=N` address the `N` history records and
//! `N + 1` is the current body. Records are only ever appended.

use chrono::{DateTime, NaiveDate, Utc};

use crate::document::{DocumentType, GeneratedDocument};
use crate::error::{PolicyError, Result};

use super::diff::diff_bodies;
use super::types::{ChangeKind, DiffLine, DiffMode, VersionRecord, VersionSummary};

/// Lifecycle of a document's history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    NoHistory,
    HasCurrentOnly,
    HasCurrentAndHistory,
}

/// Current body plus history for one document type
#[derive(Debug, Clone)]
pub struct VersionStore {
    document_type: DocumentType,
    current: Option<GeneratedDocument>,
    history: Vec<VersionRecord>,
    /// Number of leading history records already persisted
    persisted: usize,
}

impl VersionStore {
    pub fn new(document_type: DocumentType) -> Self {
        Self::from_parts(document_type, None, Vec::new())
    }

    /// Rebuild from stored state; all given records count as persisted
    pub fn from_parts(
        document_type: DocumentType,
        current: Option<GeneratedDocument>,
        history: Vec<VersionRecord>,
    ) -> Self {
        let persisted = history.len();
        Self {
            document_type,
            current,
            history,
            persisted,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn current(&self) -> Option<&GeneratedDocument> {
        self.current.as_ref()
    }

    /// History records, oldest first
    pub fn history(&self) -> &[VersionRecord] {
        &self.history
    }

    pub fn state(&self) -> VersionState {
        match (&self.current, self.history.is_empty()) {
            (None, _) => VersionState::NoHistory,
            (Some(_), true) => VersionState::HasCurrentOnly,
            (Some(_), false) => VersionState::HasCurrentAndHistory,
        }
    }

    /// Ordinal of the current body
    pub fn current_ordinal(&self) -> usize {
        self.history.len() + 1
    }

    /// Records appended since load, to be written by the repository
    pub fn unpersisted(&self) -> &[VersionRecord] {
        &self.history[self.persisted..]
    }

    pub fn mark_persisted(&mut self) {
        self.persisted = self.history.len();
    }

    /// Snapshot `previous_body` unless it is empty or equal to `new_body`
    ///
    /// Returns whether a record was appended.
    pub fn record_if_changed(
        &mut self,
        previous_body: &str,
        new_body: &str,
        author: &str,
        change_kind: ChangeKind,
        now: DateTime<Utc>,
    ) -> bool {
        if previous_body.is_empty() || previous_body == new_body {
            return false;
        }
        self.history.push(VersionRecord {
            content: previous_body.to_string(),
            created_at: now,
            author_id: author.to_string(),
            change_kind,
        });
        true
    }

    /// Fail with `Conflict` when the caller's revision is stale
    pub fn check_revision(&self, expected: Option<u64>) -> Result<()> {
        let Some(expected) = expected else {
            return Ok(());
        };
        let actual = self.current.as_ref().map_or(0, |d| d.revision);
        if expected != actual {
            return Err(PolicyError::Conflict {
                document_type: self.document_type,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Replace the current body, snapshotting the old one first
    ///
    /// Identical bodies are a no-op and return `false`.
    pub fn replace_body(
        &mut self,
        new_body: String,
        author: &str,
        change_kind: ChangeKind,
        manually_edited: bool,
        now: DateTime<Utc>,
    ) -> bool {
        match self.current.take() {
            Some(doc) if doc.body == new_body => {
                self.current = Some(doc);
                false
            }
            Some(mut doc) => {
                self.record_if_changed(&doc.body, &new_body, author, change_kind, now);
                doc.body = new_body;
                doc.generated_at = now;
                doc.manually_edited = manually_edited;
                doc.revision += 1;
                self.current = Some(doc);
                true
            }
            None => {
                let mut doc = GeneratedDocument::new(self.document_type, new_body, now);
                doc.manually_edited = manually_edited;
                self.current = Some(doc);
                true
            }
        }
    }

    /// Current body first, then history newest to oldest
    pub fn list_versions(&self) -> Vec<VersionSummary> {
        let Some(current) = &self.current else {
            return Vec::new();
        };

        let mut versions = Vec::with_capacity(self.history.len() + 1);
        versions.push(VersionSummary {
            ordinal: self.current_ordinal(),
            is_current: true,
            created_at: current.generated_at,
            author_id: None,
            change_kind: None,
            size: current.body.len(),
        });
        versions.extend(self.history.iter().enumerate().rev().map(|(index, record)| {
            VersionSummary {
                ordinal: index + 1,
                is_current: false,
                created_at: record.created_at,
                author_id: Some(record.author_id.clone()),
                change_kind: Some(record.change_kind),
                size: record.content.len(),
            }
        }));
        versions
    }

    /// Keep `date` as the current body's fallback effective date unless one is set
    pub fn stamp_effective_date(&mut self, date: NaiveDate) {
        if let Some(doc) = self.current.as_mut() {
            doc.effective_date.get_or_insert(date);
        }
    }

    /// Body stored under `ordinal`
    pub fn get_version(&self, ordinal: usize) -> Result<&str> {
        if ordinal == 0 {
            return Err(PolicyError::validation(
                "get version",
                format!("version ordinal for {} must be positive", self.document_type),
            ));
        }
        if ordinal == self.current_ordinal() {
            if let Some(current) = &self.current {
                return Ok(&current.body);
            }
        }
        // Newest-first listing index `len - k` is history[k - 1] oldest-first
        self.history
            .get(ordinal - 1)
            .map(|record| record.content.as_str())
            .ok_or_else(|| {
                PolicyError::not_found(format!("version {} of {}", ordinal, self.document_type))
            })
    }

    /// Diff the bodies stored under two ordinals
    pub fn diff(&self, ordinal_a: usize, ordinal_b: usize, mode: DiffMode) -> Result<Vec<DiffLine>> {
        let a = self.get_version(ordinal_a)?;
        let b = self.get_version(ordinal_b)?;
        Ok(diff_bodies(a, b, mode))
    }

    /// Make the body of `ordinal` current again
    ///
    /// The body being replaced is snapshotted as `pre_restore_snapshot`.
    pub fn rollback(&mut self, ordinal: usize, author: &str, now: DateTime<Utc>) -> Result<()> {
        let target = self.get_version(ordinal)?.to_string();
        if target.is_empty() {
            return Err(PolicyError::not_found(format!(
                "content for version {} of {}",
                ordinal, self.document_type
            )));
        }
        self.replace_body(target, author, ChangeKind::PreRestoreSnapshot, true, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    /// Store with `bodies[0]` ... `bodies[n-1]` written in order
    fn store_with(bodies: &[&str]) -> VersionStore {
        let mut store = VersionStore::new(DocumentType::PrivacyPolicy);
        for (i, body) in bodies.iter().enumerate() {
            store.replace_body(body.to_string(), "admin", ChangeKind::Regeneration, false, at(i as u32));
        }
        store
    }

    #[test]
    fn test_state_transitions() {
        let mut store = VersionStore::new(DocumentType::PrivacyPolicy);
        assert_eq!(store.state(), VersionState::NoHistory);
        store.replace_body("v1".into(), "admin", ChangeKind::Regeneration, false, at(0));
        assert_eq!(store.state(), VersionState::HasCurrentOnly);
        store.replace_body("v2".into(), "admin", ChangeKind::ManualEdit, true, at(1));
        assert_eq!(store.state(), VersionState::HasCurrentAndHistory);
    }

    #[test]
    fn test_record_if_changed_skips_identical_and_empty() {
        let mut store = VersionStore::new(DocumentType::CookiePolicy);
        assert!(!store.record_if_changed("same", "same", "a", ChangeKind::ManualEdit, at(0)));
        assert!(!store.record_if_changed("", "new", "a", ChangeKind::ManualEdit, at(0)));
        assert!(store.record_if_changed("old", "new", "a", ChangeKind::ManualEdit, at(0)));
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].content, "old");
    }

    #[test]
    fn test_identical_resave_is_noop() {
        let mut store = store_with(&["v1"]);
        assert!(!store.replace_body("v1".into(), "admin", ChangeKind::Regeneration, false, at(5)));
        assert!(store.history().is_empty());
        assert_eq!(store.current().unwrap().revision, 1);
    }

    #[test]
    fn test_ordinal_mapping() {
        let store = store_with(&["v1", "v2", "v3", "v4"]);
        assert_eq!(store.history().len(), 3);
        assert_eq!(store.get_version(4).unwrap(), "v4");
        assert_eq!(store.get_version(1).unwrap(), "v1");
        assert_eq!(store.get_version(3).unwrap(), "v3");
        assert!(matches!(store.get_version(5), Err(PolicyError::NotFound { .. })));
        assert!(matches!(store.get_version(0), Err(PolicyError::Validation { .. })));
    }

    #[test]
    fn test_list_versions_current_first_then_newest() {
        let store = store_with(&["a", "bb", "ccc"]);
        let ordinals: Vec<_> = store.list_versions().iter().map(|v| v.ordinal).collect();
        assert_eq!(ordinals, vec![3, 2, 1]);

        let versions = store.list_versions();
        assert!(versions[0].is_current);
        assert_eq!(versions[0].size, 3);
        assert_eq!(versions[2].size, 1);
        assert_eq!(versions[1].created_at, at(2));
    }

    #[test]
    fn test_list_versions_empty_without_document() {
        assert!(VersionStore::new(DocumentType::PrivacyPolicy).list_versions().is_empty());
    }

    #[test]
    fn test_rollback_snapshots_current() {
        let mut store = store_with(&["v1", "v2", "v3", "v4"]);
        assert_eq!(store.history().len(), 3);

        store.rollback(2, "editor", at(10)).unwrap();
        assert_eq!(store.history().len(), 4);
        assert_eq!(store.current().unwrap().body, "v2");

        let snapshot = store.history().last().unwrap();
        assert_eq!(snapshot.content, "v4");
        assert_eq!(snapshot.change_kind, ChangeKind::PreRestoreSnapshot);
        assert_eq!(snapshot.author_id, "editor");
    }

    #[test]
    fn test_empty_current_body_is_readable_but_not_restorable() {
        let mut store = store_with(&["v1", ""]);
        assert_eq!(store.current_ordinal(), 2);
        assert_eq!(store.get_version(2).unwrap(), "");
        assert!(matches!(
            store.rollback(2, "admin", at(9)),
            Err(PolicyError::NotFound { .. })
        ));
        store.rollback(1, "admin", at(9)).unwrap();
        assert_eq!(store.current().unwrap().body, "v1");
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_rollback_unknown_ordinal() {
        let mut store = store_with(&["v1", "v2"]);
        assert!(matches!(store.rollback(9, "a", at(3)), Err(PolicyError::NotFound { .. })));
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_rollback_to_current_is_noop() {
        let mut store = store_with(&["v1", "v2"]);
        store.rollback(2, "a", at(3)).unwrap();
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_check_revision() {
        let store = store_with(&["v1", "v2"]);
        assert!(store.check_revision(None).is_ok());
        assert!(store.check_revision(Some(2)).is_ok());
        assert!(matches!(
            store.check_revision(Some(1)),
            Err(PolicyError::Conflict { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_unpersisted_tracks_appends() {
        let history = vec![VersionRecord {
            content: "old".into(),
            created_at: at(0),
            author_id: "admin".into(),
            change_kind: ChangeKind::Regeneration,
        }];
        let current = GeneratedDocument::new(DocumentType::PrivacyPolicy, "cur".into(), at(1));
        let mut store = VersionStore::from_parts(DocumentType::PrivacyPolicy, Some(current), history);
        assert!(store.unpersisted().is_empty());

        store.replace_body("next".into(), "admin", ChangeKind::ManualEdit, true, at(2));
        assert_eq!(store.unpersisted().len(), 1);
        assert_eq!(store.unpersisted()[0].content, "cur");
        store.mark_persisted();
        assert!(store.unpersisted().is_empty());
    }

    #[test]
    fn test_diff_between_ordinals() {
        let store = store_with(&["<p>A</p><p>B</p><p>C</p>", "<p>A</p><p>X</p><p>C</p>"]);
        let diff = store.diff(1, 2, DiffMode::Positional).unwrap();
        assert_eq!(diff.len(), 4);
        assert!(store.diff(1, 7, DiffMode::Positional).is_err());
    }
}
