#![forbid(unsafe_code)]

//! @acp:module "policyforge Library"
//! @acp:summary "Questionnaire-driven legal document generation with version history"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # policyforge
//!
//! Generates website legal documents (privacy policy, terms of service,
//! cookie policy and related notices) from a conditional questionnaire.
//!
//! ## Features
//!
//! - **Conditional questionnaire**: questions appear only when their
//!   `show_if` conditions hold; completeness ignores hidden questions
//! - **Section resolution**: per-document section tables filtered by answers
//!   and jurisdiction compliance flags, with flags taking precedence
//! - **Template composition**: single-pass `{{TOKEN}}` substitution with
//!   leftover placeholders scrubbed
//! - **Version history**: every change snapshots the previous body;
//!   list, diff and roll back by ordinal
//!
//! ## Example
//!
//! ```rust,no_run
//! use policyforge::{ComplianceFlags, DocumentType, FileStore, MemoryCatalog, Workspace};
//!
//! fn main() -> anyhow::Result<()> {
//!     let catalog = MemoryCatalog::new()
//!         .with_template(DocumentType::PrivacyPolicy, "<h1>{{COMPANY_NAME}}</h1>{{INTRODUCTION}}");
//!     let mut workspace = Workspace::new(FileStore::new(".policyforge/store"), catalog, ComplianceFlags::new());
//!
//!     let answers = serde_json::json!({"company_name": "Acme", "has_ecommerce": "yes"});
//!     if let serde_json::Value::Object(raw) = answers {
//!         workspace.save_answers(&raw)?;
//!     }
//!     workspace.generate(DocumentType::PrivacyPolicy)?;
//!
//!     for version in workspace.list_versions(DocumentType::PrivacyPolicy)? {
//!         println!("v{} ({} bytes)", version.ordinal, version.size);
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod compliance;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod questionnaire;
pub mod storage;
pub mod workspace;

// Re-exports
pub use compliance::{ComplianceFlags, ComplianceFlagsProvider, FileFlags, Jurisdiction};
pub use config::{Config, StoreBackend};
pub use document::{
    Composer, ContentCatalog, DirectoryCatalog, DocumentType, GeneratedDocument, MemoryCatalog,
    SiteProfile,
};
pub use error::{PolicyError, Result};
pub use history::{
    ChangeKind, DiffKind, DiffLine, DiffMode, DiffSummary, VersionRecord, VersionState,
    VersionStore, VersionSummary,
};
pub use questionnaire::{AnswerSet, AnswerValue, Question, QuestionType, Questionnaire};
pub use storage::{FileStore, KeyValueStore, MemoryStore, Repository, SaveOutcome};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
pub use workspace::Workspace;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
