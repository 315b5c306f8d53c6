//! Version history integration tests
//!
//! Ordinal mapping, diffs, rollback and revision checks through the
//! workspace, backed by an in-memory store.

use pretty_assertions::assert_eq;

use policyforge::{
    ChangeKind, ComplianceFlags, DiffKind, DiffLine, DiffMode, DocumentType, MemoryCatalog,
    MemoryStore, PolicyError, SaveOutcome, VersionState, Workspace,
};

type TestWorkspace = Workspace<MemoryStore, MemoryCatalog, ComplianceFlags>;

const DOC: DocumentType = DocumentType::PrivacyPolicy;

fn workspace() -> TestWorkspace {
    let catalog = MemoryCatalog::new().with_template(DOC, "<p>{{COMPANY_NAME}}</p>");
    Workspace::new(MemoryStore::new(), catalog, ComplianceFlags::new()).with_author("editor")
}

/// Workspace whose document went through `bodies` in order
fn edited(bodies: &[&str]) -> TestWorkspace {
    let mut ws = workspace();
    for body in bodies {
        ws.save_edit(DOC, body, None).unwrap();
    }
    ws
}

// =============================================================================
// Ordinals and listing
// =============================================================================

mod ordinal_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_current_and_oldest_ordinals() {
        let ws = edited(&["v1", "v2", "v3", "v4"]);
        let history_len = 3;

        assert_eq!(ws.get_version(DOC, history_len + 1).unwrap(), "v4");
        assert_eq!(ws.get_version(DOC, 1).unwrap(), "v1");
        assert_eq!(ws.get_version(DOC, 2).unwrap(), "v2");
    }

    #[test]
    fn test_listing_is_current_then_newest_first() {
        let ws = edited(&["v1", "v2", "v3"]);
        let versions = ws.list_versions(DOC).unwrap();

        let ordinals: Vec<usize> = versions.iter().map(|v| v.ordinal).collect();
        assert_eq!(ordinals, vec![3, 2, 1]);
        assert!(versions[0].is_current);
        assert!(versions[1..].iter().all(|v| !v.is_current));
        assert_eq!(versions[1].author_id.as_deref(), Some("editor"));
        assert_eq!(versions[1].change_kind, Some(ChangeKind::ManualEdit));
        assert_eq!(versions[0].size, 2);
    }

    #[test]
    fn test_no_document_lists_nothing() {
        let ws = workspace();
        assert!(ws.list_versions(DOC).unwrap().is_empty());
        assert_eq!(ws.versions(DOC).unwrap().state(), VersionState::NoHistory);
    }

    #[test]
    fn test_bad_ordinals() {
        let ws = edited(&["v1", "v2"]);
        assert!(matches!(
            ws.get_version(DOC, 0).unwrap_err(),
            PolicyError::Validation { .. }
        ));
        assert!(matches!(
            ws.get_version(DOC, 3).unwrap_err(),
            PolicyError::NotFound { .. }
        ));
    }

    #[test]
    fn test_identical_edit_adds_no_history() {
        let mut ws = edited(&["v1"]);
        assert_eq!(ws.save_edit(DOC, "v1", None).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(ws.versions(DOC).unwrap().state(), VersionState::HasCurrentOnly);
    }
}

// =============================================================================
// Diffs
// =============================================================================

mod diff_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_changed_middle_line_is_remove_then_add() {
        let ws = edited(&["<p>A</p><p>B</p><p>C</p>", "<p>A</p><p>X</p><p>C</p>"]);
        let diff = ws.diff(DOC, 1, 2).unwrap();
        assert_eq!(
            diff,
            vec![
                DiffLine::equal("A"),
                DiffLine::removed("B"),
                DiffLine::added("X"),
                DiffLine::equal("C"),
            ]
        );
        assert!(diff.iter().all(|l| matches!(
            l.kind,
            DiffKind::Equal | DiffKind::Added | DiffKind::Removed
        )));
    }

    #[test]
    fn test_positional_insert_cascades_but_lcs_aligns() {
        let ws = edited(&["<p>A</p><p>B</p><p>C</p>", "<p>Z</p><p>A</p><p>B</p><p>C</p>"]);

        let positional = ws.diff_summary(DOC, 1, 2).unwrap();
        assert_eq!(positional.unchanged, 0);
        assert_eq!(positional.added, 4);
        assert_eq!(positional.removed, 3);

        let lcs = ws.diff_with(DOC, 1, 2, DiffMode::Lcs).unwrap();
        assert_eq!(
            lcs,
            vec![
                DiffLine::added("Z"),
                DiffLine::equal("A"),
                DiffLine::equal("B"),
                DiffLine::equal("C"),
            ]
        );
    }

    #[test]
    fn test_diff_of_missing_version_fails() {
        let ws = edited(&["v1"]);
        assert!(matches!(
            ws.diff(DOC, 1, 5).unwrap_err(),
            PolicyError::NotFound { .. }
        ));
    }
}

// =============================================================================
// Rollback
// =============================================================================

mod rollback_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rollback_snapshots_current_and_restores_target() {
        let mut ws = edited(&["v1", "v2", "v3", "v4"]);
        assert_eq!(ws.versions(DOC).unwrap().history().len(), 3);
        let target = ws.get_version(DOC, 2).unwrap();

        assert_eq!(ws.rollback(DOC, 2, None).unwrap(), SaveOutcome::Saved);

        let versions = ws.versions(DOC).unwrap();
        assert_eq!(versions.history().len(), 4);
        let last = versions.history().last().unwrap();
        assert_eq!(last.change_kind, ChangeKind::PreRestoreSnapshot);
        assert_eq!(last.content, "v4");
        assert_eq!(ws.document(DOC).unwrap().body, target);
    }

    #[test]
    fn test_rollback_to_missing_ordinal_fails_without_writing() {
        let mut ws = edited(&["v1", "v2"]);
        let err = ws.rollback(DOC, 9, None).unwrap_err();
        assert!(matches!(err, PolicyError::NotFound { .. }));
        assert_eq!(ws.versions(DOC).unwrap().history().len(), 1);
    }

    #[test]
    fn test_regeneration_snapshots_manual_edit() {
        let mut ws = workspace();
        ws.save_answers(&serde_json::Map::new()).unwrap();
        ws.generate(DOC).unwrap();
        ws.save_edit(DOC, "<p>Custom</p>", None).unwrap();
        assert!(ws.document(DOC).unwrap().manually_edited);

        ws.generate(DOC).unwrap();
        let doc = ws.document(DOC).unwrap();
        assert!(!doc.manually_edited);

        let versions = ws.versions(DOC).unwrap();
        let last = versions.history().last().unwrap();
        assert_eq!(last.content, "<p>Custom</p>");
        assert_eq!(last.change_kind, ChangeKind::Regeneration);
    }
}

// =============================================================================
// Revision checks
// =============================================================================

mod revision_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stale_revision_is_conflict() {
        let mut ws = edited(&["v1", "v2"]);
        assert_eq!(ws.document(DOC).unwrap().revision, 2);

        let err = ws.save_edit(DOC, "v3", Some(1)).unwrap_err();
        match err {
            PolicyError::Conflict { expected, actual, document_type } => {
                assert_eq!((expected, actual, document_type), (1, 2, DOC));
            }
            other => panic!("expected conflict, got {}", other),
        }
        assert_eq!(ws.document(DOC).unwrap().body, "v2");
    }

    #[test]
    fn test_matching_revision_writes() {
        let mut ws = edited(&["v1", "v2"]);
        ws.save_edit(DOC, "v3", Some(2)).unwrap();
        assert_eq!(ws.document(DOC).unwrap().revision, 3);
        assert!(ws.rollback(DOC, 1, Some(2)).is_err());
        ws.rollback(DOC, 1, Some(3)).unwrap();
        assert_eq!(ws.document(DOC).unwrap().body, "v1");
    }
}
