//! @acp:module "Storage"
//! @acp:summary "Generic key-value persistence and typed repository"
//! @acp:domain storage
//! @acp:layer io
//!
//! Records are JSON values under namespaced keys:
//!
//! - `answers` holds the current [`AnswerSet`](crate::questionnaire::AnswerSet)
//! - `documents/<type>` holds the current [`GeneratedDocument`](crate::document::GeneratedDocument)
//! - `history/<type>` holds the append-only list of version records

mod file;
mod memory;
mod repository;
#[cfg(feature = "sqlite")]
mod sqlite;

use serde_json::Value;

use crate::error::{PolicyError, Result};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{Repository, SaveOutcome};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Storage keys
pub mod keys {
    use crate::document::DocumentType;

    pub const ANSWERS: &str = "answers";

    pub fn document(document_type: DocumentType) -> String {
        format!("documents/{}", document_type.as_str())
    }

    pub fn history(document_type: DocumentType) -> String {
        format!("history/{}", document_type.as_str())
    }
}

/// Minimal key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value`; returns `false` when nothing was written because the
    /// stored value is already identical
    fn put(&mut self, key: &str, value: Value) -> Result<bool>;

    /// Returns whether the key existed
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Append to the list stored under `key`, creating it if needed
    fn append(&mut self, key: &str, value: Value) -> Result<()> {
        let mut items = match self.get(key)? {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(PolicyError::save(key, "existing value is not a list")),
            None => Vec::new(),
        };
        items.push(value);
        self.put(key, Value::Array(items))?;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> Result<bool> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn append(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).append(key, value)
    }
}

/// Keys are lowercase identifiers separated by `/`
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.split('/').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        });
    if valid {
        Ok(())
    } else {
        Err(PolicyError::validation("storage key", format!("invalid key '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentType;

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(keys::document(DocumentType::CookiePolicy), "documents/cookie_policy");
        assert_eq!(keys::history(DocumentType::CookiePolicy), "history/cookie_policy");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("history/privacy_policy").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a//b").is_err());
        assert!(validate_key("").is_err());
    }
}
