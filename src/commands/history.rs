//! @acp:module "History Commands"
//! @acp:summary "List, diff and restore document versions"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;
use console::style;

use super::CliWorkspace;
use crate::document::DocumentType;
use crate::history::{ChangeKind, DiffKind, DiffMode, DiffSummary};
use crate::storage::SaveOutcome;

/// Options for the versions command
#[derive(Debug, Clone)]
pub struct VersionsOptions {
    pub document_type: DocumentType,
    /// Output as JSON
    pub json: bool,
}

/// Options for the diff command
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub document_type: DocumentType,
    pub from: usize,
    pub to: usize,
    /// Overrides the configured diff mode
    pub mode: Option<DiffMode>,
    /// Output as JSON
    pub json: bool,
}

/// Options for the rollback command
#[derive(Debug, Clone)]
pub struct RollbackOptions {
    pub document_type: DocumentType,
    pub ordinal: usize,
    /// Fail if the document changed since this revision
    pub expected_revision: Option<u64>,
}

/// Execute the versions command
pub fn execute_versions(workspace: &CliWorkspace, options: VersionsOptions) -> Result<()> {
    let versions = workspace.list_versions(options.document_type)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }

    if versions.is_empty() {
        println!(
            "{} {} has not been generated",
            style("⚠").yellow(),
            options.document_type.title()
        );
        return Ok(());
    }

    println!("{}", style(format!("{} versions:", options.document_type.title())).bold());
    for v in &versions {
        let marker = if v.is_current {
            style("●").green()
        } else {
            match v.change_kind {
                Some(ChangeKind::PreRestoreSnapshot) => style("↩").yellow(),
                Some(ChangeKind::ManualEdit) => style("✎").cyan(),
                _ => style("○").dim(),
            }
        };
        let detail = match (&v.author_id, v.change_kind) {
            (Some(author), Some(kind)) => format!("superseded by {} ({})", author, kind),
            _ => "current".to_string(),
        };
        println!(
            "  {} v{:<4} {}  {:>7} bytes  {}",
            marker,
            v.ordinal,
            style(v.created_at.format("%Y-%m-%d %H:%M:%S")).dim(),
            v.size,
            detail
        );
    }
    Ok(())
}

/// Execute the diff command
pub fn execute_diff(workspace: &CliWorkspace, options: DiffOptions) -> Result<()> {
    let mode = options.mode.unwrap_or(workspace.diff_mode());
    let lines = workspace.diff_with(options.document_type, options.from, options.to, mode)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    for line in &lines {
        match line.kind {
            DiffKind::Equal => println!("  {}", line.text),
            DiffKind::Removed => println!("{}", style(format!("- {}", line.text)).red()),
            DiffKind::Added => println!("{}", style(format!("+ {}", line.text)).green()),
        }
    }

    let summary = DiffSummary::of(&lines);
    if summary.is_identical() {
        println!("{} Versions {} and {} are identical", style("✓").green(), options.from, options.to);
    } else {
        println!(
            "\n{} added, {} removed, {} unchanged",
            style(summary.added).green(),
            style(summary.removed).red(),
            summary.unchanged
        );
    }
    Ok(())
}

/// Execute the rollback command
pub fn execute_rollback(workspace: &mut CliWorkspace, options: RollbackOptions) -> Result<()> {
    let outcome = workspace.rollback(options.document_type, options.ordinal, options.expected_revision)?;
    match outcome {
        SaveOutcome::Saved => {
            let current = workspace.list_versions(options.document_type)?;
            let ordinal = current.first().map(|v| v.ordinal).unwrap_or_default();
            println!(
                "{} Restored {} to the content of version {} (now version {})",
                style("↩").yellow(),
                options.document_type.title(),
                options.ordinal,
                ordinal
            );
        }
        SaveOutcome::Unchanged => {
            println!(
                "{} Version {} already matches the current {}",
                style("✓").dim(),
                options.ordinal,
                options.document_type.title()
            );
        }
    }
    Ok(())
}
