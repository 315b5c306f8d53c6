//! @acp:module "Workspace"
//! @acp:summary "Request surface: questionnaire, generation, editing and version history"
//! @acp:domain core
//! @acp:layer service
//!
//! A [`Workspace`] wires the questionnaire, composer and version store to a
//! storage backend, a content catalog and a compliance-flag source. Each
//! operation loads what it needs, applies one change and persists it.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::compliance::ComplianceFlagsProvider;
use crate::document::{Composer, ContentCatalog, DocumentType, GeneratedDocument, SiteProfile};
use crate::error::{PolicyError, Result};
use crate::history::{ChangeKind, DiffLine, DiffMode, DiffSummary, VersionStore, VersionSummary};
use crate::questionnaire::{AnswerSet, Question, Questionnaire};
use crate::storage::{KeyValueStore, Repository, SaveOutcome};

pub const DEFAULT_AUTHOR: &str = "admin";

pub struct Workspace<S: KeyValueStore, C: ContentCatalog, F: ComplianceFlagsProvider> {
    repository: Repository<S>,
    questionnaire: Questionnaire,
    catalog: C,
    flags: F,
    site: SiteProfile,
    author: String,
    diff_mode: DiffMode,
    today: Option<NaiveDate>,
}

impl<S: KeyValueStore, C: ContentCatalog, F: ComplianceFlagsProvider> Workspace<S, C, F> {
    pub fn new(store: S, catalog: C, flags: F) -> Self {
        Self {
            repository: Repository::new(store),
            questionnaire: Questionnaire::default(),
            catalog,
            flags,
            site: SiteProfile::default(),
            author: DEFAULT_AUTHOR.to_string(),
            diff_mode: DiffMode::default(),
            today: None,
        }
    }

    pub fn with_questionnaire(mut self, questionnaire: Questionnaire) -> Self {
        self.questionnaire = questionnaire;
        self
    }

    pub fn with_site(mut self, site: SiteProfile) -> Self {
        self.site = site;
        self
    }

    /// Author recorded on history entries
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_diff_mode(mut self, mode: DiffMode) -> Self {
        self.diff_mode = mode;
        self
    }

    /// Fallback effective date for documents that do not have one yet
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    pub fn flags(&self) -> &F {
        &self.flags
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn diff_mode(&self) -> DiffMode {
        self.diff_mode
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    // ---------------------------------------------------------------
    // Questionnaire
    // ---------------------------------------------------------------

    pub fn answers(&self) -> Result<AnswerSet> {
        self.repository.load_answers()
    }

    /// Questions visible for the stored answers, in catalog order
    pub fn visible_questions(&self) -> Result<Vec<Question>> {
        let answers = self.answers()?;
        Ok(self.questionnaire.visible_questions(&answers).cloned().collect())
    }

    /// Sanitize `raw` and store it as the new answer set
    ///
    /// An identical answer set is `Unchanged`, which is still success.
    pub fn save_answers(&mut self, raw: &Map<String, Value>) -> Result<SaveOutcome> {
        let answers = self.questionnaire.sanitize(raw);
        let outcome = self.repository.save_answers(&answers)?;
        match outcome {
            SaveOutcome::Saved => tracing::info!("Saved {} answers", answers.len()),
            SaveOutcome::Unchanged => tracing::debug!("Answers unchanged; nothing written"),
        }
        Ok(outcome)
    }

    /// Merge `raw` over the stored answers and save the result
    pub fn update_answers(&mut self, raw: &Map<String, Value>) -> Result<SaveOutcome> {
        let current = serde_json::to_value(self.answers()?)?;
        let mut merged = match current {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (id, value) in raw {
            merged.insert(id.clone(), value.clone());
        }
        self.save_answers(&merged)
    }

    pub fn is_complete(&self) -> Result<bool> {
        Ok(self.questionnaire.is_complete(&self.answers()?))
    }

    pub fn completion_percentage(&self) -> Result<u8> {
        Ok(self.questionnaire.completion_percentage(&self.answers()?))
    }

    /// First required, visible question without an answer
    pub fn first_missing(&self) -> Result<Option<Question>> {
        let answers = self.answers()?;
        Ok(self.questionnaire.first_missing(&answers).cloned())
    }

    pub fn documents_affected_by<'a, I>(&self, question_ids: I) -> BTreeSet<DocumentType>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.questionnaire.documents_affected_by(question_ids)
    }

    // ---------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------

    /// Compose without persisting
    pub fn preview(&self, document_type: DocumentType) -> Result<String> {
        let versions = self.repository.load_versions(document_type)?;
        self.compose(document_type, self.fallback_date(&versions))
    }

    /// Compose and store `document_type`, snapshotting the previous body
    ///
    /// The fallback effective date is fixed by the first generation, so
    /// regenerating with unchanged answers and flags leaves the body as is.
    pub fn generate(&mut self, document_type: DocumentType) -> Result<SaveOutcome> {
        let mut versions = self.repository.load_versions(document_type)?;
        let date = self.fallback_date(&versions);
        let body = self.compose(document_type, date)?;
        let changed = versions.replace_body(
            body,
            &self.author,
            ChangeKind::Regeneration,
            false,
            self.now(),
        );
        if changed {
            versions.stamp_effective_date(date);
        }
        self.persist(document_type, &mut versions, changed, "generate")
    }

    /// Generate every document type in declaration order
    pub fn generate_all(&mut self) -> Result<Vec<(DocumentType, SaveOutcome)>> {
        DocumentType::all()
            .iter()
            .map(|&document_type| Ok((document_type, self.generate(document_type)?)))
            .collect()
    }

    /// Replace the body with hand-written content
    pub fn save_edit(
        &mut self,
        document_type: DocumentType,
        body: &str,
        expected_revision: Option<u64>,
    ) -> Result<SaveOutcome> {
        if body.trim().is_empty() {
            return Err(PolicyError::validation(
                "save edit",
                format!("body for {} must not be empty", document_type),
            ));
        }
        let mut versions = self.repository.load_versions(document_type)?;
        versions.check_revision(expected_revision)?;
        let changed = versions.replace_body(
            body.to_string(),
            &self.author,
            ChangeKind::ManualEdit,
            true,
            self.now(),
        );
        self.persist(document_type, &mut versions, changed, "save edit")
    }

    pub fn document(&self, document_type: DocumentType) -> Result<GeneratedDocument> {
        self.repository
            .load_document(document_type)?
            .ok_or_else(|| PolicyError::not_found(format!("document {}", document_type)))
    }

    // ---------------------------------------------------------------
    // History
    // ---------------------------------------------------------------

    pub fn versions(&self, document_type: DocumentType) -> Result<VersionStore> {
        self.repository.load_versions(document_type)
    }

    pub fn list_versions(&self, document_type: DocumentType) -> Result<Vec<VersionSummary>> {
        Ok(self.versions(document_type)?.list_versions())
    }

    pub fn get_version(&self, document_type: DocumentType, ordinal: usize) -> Result<String> {
        Ok(self.versions(document_type)?.get_version(ordinal)?.to_string())
    }

    /// Diff two versions with the workspace's diff mode
    pub fn diff(&self, document_type: DocumentType, ordinal_a: usize, ordinal_b: usize) -> Result<Vec<DiffLine>> {
        self.diff_with(document_type, ordinal_a, ordinal_b, self.diff_mode)
    }

    pub fn diff_with(
        &self,
        document_type: DocumentType,
        ordinal_a: usize,
        ordinal_b: usize,
        mode: DiffMode,
    ) -> Result<Vec<DiffLine>> {
        self.versions(document_type)?.diff(ordinal_a, ordinal_b, mode)
    }

    pub fn diff_summary(&self, document_type: DocumentType, ordinal_a: usize, ordinal_b: usize) -> Result<DiffSummary> {
        Ok(DiffSummary::of(&self.diff(document_type, ordinal_a, ordinal_b)?))
    }

    /// Restore the body stored under `ordinal`
    pub fn rollback(
        &mut self,
        document_type: DocumentType,
        ordinal: usize,
        expected_revision: Option<u64>,
    ) -> Result<SaveOutcome> {
        let mut versions = self.repository.load_versions(document_type)?;
        versions.check_revision(expected_revision)?;
        let before = versions.current().map(|d| d.revision);
        versions.rollback(ordinal, &self.author, self.now())?;
        let changed = versions.current().map(|d| d.revision) != before;
        self.persist(document_type, &mut versions, changed, "rollback")
    }

    fn compose(&self, document_type: DocumentType, date: NaiveDate) -> Result<String> {
        let answers = self.questionnaire.with_defaults(&self.answers()?);
        Ok(Composer::new(&self.catalog, &self.flags)
            .with_site(self.site.clone())
            .with_date(date)
            .compose(document_type, &answers))
    }

    fn fallback_date(&self, versions: &VersionStore) -> NaiveDate {
        versions
            .current()
            .and_then(|doc| doc.effective_date)
            .or(self.today)
            .unwrap_or_else(|| self.now().date_naive())
    }

    fn persist(
        &mut self,
        document_type: DocumentType,
        versions: &mut VersionStore,
        changed: bool,
        operation: &str,
    ) -> Result<SaveOutcome> {
        if !changed {
            tracing::debug!("{} {}: body unchanged", operation, document_type);
            return Ok(SaveOutcome::Unchanged);
        }
        self.repository.save_versions(versions)?;
        tracing::info!(
            "{} {}: now at version {}",
            operation,
            document_type,
            versions.current_ordinal()
        );
        Ok(SaveOutcome::Saved)
    }
}
