//! @acp:module "Errors"
//! @acp:summary "Error types shared by the questionnaire, composer and version history"
//! @acp:domain core
//! @acp:layer model

use thiserror::Error;

use crate::document::DocumentType;

/// Errors returned by library operations
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Malformed or missing input to a public operation
    #[error("{operation}: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },

    /// Requested version or document does not exist
    #[error("{what} not found")]
    NotFound { what: String },

    /// Persistence write failed for a reason other than "value unchanged"
    #[error("failed to save '{key}': {reason}")]
    Save { key: String, reason: String },

    /// Template or section content unavailable
    #[error("content unavailable for {resource}: {reason}")]
    ContentLoad { resource: String, reason: String },

    /// Stored revision moved since the caller last read the document
    #[error("{document_type} was modified concurrently (expected revision {expected}, found {actual})")]
    Conflict {
        document_type: DocumentType,
        expected: u64,
        actual: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl PolicyError {
    pub fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        PolicyError::Validation {
            operation,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        PolicyError::NotFound { what: what.into() }
    }

    pub fn save(key: impl Into<String>, reason: impl ToString) -> Self {
        PolicyError::Save {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn content(resource: impl Into<String>, reason: impl ToString) -> Self {
        PolicyError::ContentLoad {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors a caller can fix by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PolicyError::Validation { .. } | PolicyError::NotFound { .. } | PolicyError::Conflict { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = PolicyError::not_found("version 7 of privacy_policy");
        assert_eq!(err.to_string(), "version 7 of privacy_policy not found");

        let err = PolicyError::Conflict {
            document_type: DocumentType::CookiePolicy,
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("cookie_policy"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_save_error_is_not_user_error() {
        let err = PolicyError::save("answers", "disk full");
        assert_eq!(err.to_string(), "failed to save 'answers': disk full");
        assert!(!err.is_user_error());
    }
}
