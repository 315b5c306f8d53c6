//! @acp:module "Generate Command"
//! @acp:summary "Generate, show and hand-edit documents"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use console::style;

use super::CliWorkspace;
use crate::document::DocumentType;
use crate::history::to_plain_text;
use crate::storage::SaveOutcome;

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Single document to generate
    pub document_type: Option<DocumentType>,
    /// Generate every document type
    pub all: bool,
}

/// Options for the show command
#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub document_type: DocumentType,
    /// Historical ordinal instead of the current body
    pub version: Option<usize>,
    /// Strip markup
    pub plain: bool,
}

/// Options for the edit command
#[derive(Debug, Clone)]
pub struct EditOptions {
    pub document_type: DocumentType,
    /// File holding the new body
    pub file: PathBuf,
    /// Fail if the document changed since this revision
    pub expected_revision: Option<u64>,
}

/// Execute the generate command
pub fn execute_generate(workspace: &mut CliWorkspace, options: GenerateOptions) -> Result<()> {
    if !workspace.is_complete()? {
        let missing = workspace
            .first_missing()?
            .map(|q| q.id)
            .unwrap_or_default();
        println!(
            "{} Questionnaire incomplete (next required: {}); generic defaults will be used",
            style("⚠").yellow(),
            style(missing).cyan()
        );
    }

    let results = match (options.document_type, options.all) {
        (Some(document_type), false) => vec![(document_type, workspace.generate(document_type)?)],
        (None, _) | (_, true) => workspace.generate_all()?,
    };

    for (document_type, outcome) in results {
        match outcome {
            SaveOutcome::Saved => {
                let revision = workspace.document(document_type)?.revision;
                println!(
                    "{} Generated {} (revision {})",
                    style("✓").green(),
                    document_type.title(),
                    revision
                );
            }
            SaveOutcome::Unchanged => {
                println!(
                    "{} {} unchanged",
                    style("✓").dim(),
                    document_type.title()
                );
            }
        }
    }
    Ok(())
}

/// Execute the show command
pub fn execute_show(workspace: &CliWorkspace, options: ShowOptions) -> Result<()> {
    let body = match options.version {
        Some(ordinal) => workspace.get_version(options.document_type, ordinal)?,
        None => workspace.document(options.document_type)?.body,
    };

    if options.plain {
        println!("{}", to_plain_text(&body));
    } else {
        println!("{}", body);
    }
    Ok(())
}

/// Execute the edit command
pub fn execute_edit(workspace: &mut CliWorkspace, options: EditOptions) -> Result<()> {
    let body = std::fs::read_to_string(&options.file)
        .with_context(|| format!("Failed to read {}", options.file.display()))?;
    if body.trim().is_empty() {
        return Err(anyhow!("{} is empty", options.file.display()));
    }

    match workspace.save_edit(options.document_type, &body, options.expected_revision)? {
        SaveOutcome::Saved => {
            let doc = workspace.document(options.document_type)?;
            println!(
                "{} Saved manual edit of {} (revision {})",
                style("✓").green(),
                options.document_type.title(),
                doc.revision
            );
        }
        SaveOutcome::Unchanged => {
            println!(
                "{} {} already has this content",
                style("✓").dim(),
                options.document_type.title()
            );
        }
    }
    Ok(())
}
