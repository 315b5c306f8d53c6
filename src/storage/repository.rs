//! @acp:module "Repository"
//! @acp:summary "Typed access to answers, documents and history over a key-value store"
//! @acp:domain storage
//! @acp:layer service

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{keys, KeyValueStore};
use crate::document::{DocumentType, GeneratedDocument};
use crate::error::Result;
use crate::history::{VersionRecord, VersionStore};
use crate::questionnaire::AnswerSet;

/// Result of a save that may have found nothing to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Unchanged,
}

impl SaveOutcome {
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            SaveOutcome::Saved
        } else {
            SaveOutcome::Unchanged
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

pub struct Repository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<SaveOutcome> {
        let value = serde_json::to_value(value)?;
        Ok(SaveOutcome::from_changed(self.store.put(key, value)?))
    }

    pub fn load_answers(&self) -> Result<AnswerSet> {
        Ok(self.read(keys::ANSWERS)?.unwrap_or_default())
    }

    pub fn save_answers(&mut self, answers: &AnswerSet) -> Result<SaveOutcome> {
        self.write(keys::ANSWERS, answers)
    }

    pub fn load_document(&self, document_type: DocumentType) -> Result<Option<GeneratedDocument>> {
        self.read(&keys::document(document_type))
    }

    /// History records, oldest first
    pub fn load_history(&self, document_type: DocumentType) -> Result<Vec<VersionRecord>> {
        Ok(self.read(&keys::history(document_type))?.unwrap_or_default())
    }

    pub fn load_versions(&self, document_type: DocumentType) -> Result<VersionStore> {
        let current = self.load_document(document_type)?;
        let history = self.load_history(document_type)?;
        Ok(VersionStore::from_parts(document_type, current, history))
    }

    /// Append new history records, then write the current document
    pub fn save_versions(&mut self, versions: &mut VersionStore) -> Result<SaveOutcome> {
        let document_type = versions.document_type();
        let history_key = keys::history(document_type);
        for record in versions.unpersisted() {
            self.store.append(&history_key, serde_json::to_value(record)?)?;
        }
        versions.mark_persisted();

        match versions.current() {
            Some(current) => self.write(&keys::document(document_type), current),
            None => Ok(SaveOutcome::Unchanged),
        }
    }
}
