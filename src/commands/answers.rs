//! @acp:module "Answers Command"
//! @acp:summary "Questionnaire listing, answer entry and completion status"
//! @acp:domain cli
//! @acp:layer handler

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde_json::{Map, Value};

use super::{parse_assignments, CliWorkspace};
use crate::document::DocumentType;
use crate::questionnaire::{AnswerSet, AnswerValue, Question, QuestionType};
use crate::storage::SaveOutcome;

/// Options for the questions command
#[derive(Debug, Clone, Default)]
pub struct QuestionsOptions {
    /// Include questions hidden by their conditions
    pub all: bool,
    /// Output as JSON
    pub json: bool,
}

/// Subcommand types for the answers command
#[derive(Debug, Clone)]
pub enum AnswersSubcommand {
    Show { json: bool },
    Import { file: PathBuf, merge: bool },
    Set { assignments: Vec<String> },
    Interactive,
}

/// Execute the questions command
pub fn execute_questions(workspace: &CliWorkspace, options: QuestionsOptions) -> Result<()> {
    let answers = workspace.answers()?;
    let questions: Vec<&Question> = if options.all {
        workspace.questionnaire().questions().iter().collect()
    } else {
        workspace.questionnaire().visible_questions(&answers).collect()
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    let mut section = "";
    for q in questions {
        if q.section != section {
            section = &q.section;
            println!("\n{}", style(section).bold());
        }
        let marker = if q.is_answered(&answers) {
            style("✓").green()
        } else if q.required {
            style("●").red()
        } else {
            style("○").dim()
        };
        println!("  {} {} {}", marker, style(&q.id).cyan(), q.label);
        if let Some(value) = answers.get(&q.id) {
            println!("      {}", style(value).dim());
        }
    }
    Ok(())
}

/// Execute the answers command
pub fn execute_answers(workspace: &mut CliWorkspace, subcommand: AnswersSubcommand) -> Result<()> {
    match subcommand {
        AnswersSubcommand::Show { json } => {
            let answers = workspace.answers()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answers)?);
            } else if answers.is_empty() {
                println!("{} No answers saved yet", style("⚠").yellow());
            } else {
                for (id, value) in answers.iter() {
                    println!("  {} = {}", style(id).cyan(), value);
                }
            }
        }

        AnswersSubcommand::Import { file, merge } => {
            let raw = read_answer_file(&file)?;
            let before = workspace.answers()?;
            let outcome = if merge {
                workspace.update_answers(&raw)?
            } else {
                workspace.save_answers(&raw)?
            };
            report_save(workspace, &before, outcome)?;
        }

        AnswersSubcommand::Set { assignments } => {
            let raw = parse_assignments(&assignments)?;
            let before = workspace.answers()?;
            let outcome = workspace.update_answers(&raw)?;
            report_save(workspace, &before, outcome)?;
        }

        AnswersSubcommand::Interactive => run_interactive(workspace)?,
    }
    Ok(())
}

/// Execute the status command
pub fn execute_status(workspace: &CliWorkspace) -> Result<()> {
    let percentage = workspace.completion_percentage()?;
    let complete = workspace.is_complete()?;

    println!("{}", style("Questionnaire:").bold());
    if complete {
        println!("  {} Complete ({}% of all questions answered)", style("✓").green(), percentage);
    } else {
        println!("  {} Incomplete ({}% answered)", style("✗").red(), percentage);
        if let Some(q) = workspace.first_missing()? {
            println!("    Next required: {} ({})", style(&q.id).cyan(), q.label);
        }
    }

    println!("\n{}", style("Documents:").bold());
    for &document_type in DocumentType::all() {
        let versions = workspace.versions(document_type)?;
        match versions.current() {
            Some(doc) => {
                let edited = if doc.manually_edited {
                    style(" (edited)").yellow().to_string()
                } else {
                    String::new()
                };
                println!(
                    "  {} {} v{} rev {} {}{}",
                    style("●").green(),
                    document_type.title(),
                    versions.current_ordinal(),
                    doc.revision,
                    style(doc.generated_at.format("%Y-%m-%d %H:%M")).dim(),
                    edited
                );
            }
            None => println!("  {} {} not generated", style("○").dim(), document_type.title()),
        }
    }
    Ok(())
}

fn read_answer_file(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("{} must contain an object of answers", path.display())),
    }
}

fn report_save(workspace: &CliWorkspace, before: &AnswerSet, outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Unchanged => {
            println!("{} Answers unchanged", style("✓").green());
        }
        SaveOutcome::Saved => {
            let after = workspace.answers()?;
            println!("{} Saved {} answers", style("✓").green(), after.len());
            let changed = crate::questionnaire::Questionnaire::changed_ids(before, &after);
            let affected = workspace.documents_affected_by(changed.iter().map(String::as_str));
            print_affected(&affected);
        }
    }

    let invalid = workspace.questionnaire().invalid_options(&workspace.answers()?);
    for (id, value) in invalid {
        println!(
            "  {} {} has unknown option '{}'",
            style("⚠").yellow(),
            style(id).cyan(),
            value
        );
    }
    Ok(())
}

fn print_affected(affected: &BTreeSet<DocumentType>) {
    if affected.is_empty() {
        return;
    }
    let names: Vec<&str> = affected.iter().map(|d| d.as_str()).collect();
    println!(
        "  {} Regenerate to apply: {}",
        style("→").cyan(),
        names.join(", ")
    );
}

/// Walk visible questions in order, re-checking visibility after each answer
fn run_interactive(workspace: &mut CliWorkspace) -> Result<()> {
    let theme = ColorfulTheme::default();
    let before = workspace.answers()?;
    let mut asked: BTreeSet<String> = BTreeSet::new();
    let mut last_outcome = SaveOutcome::Unchanged;

    loop {
        let answers = workspace.answers()?;
        let next = workspace
            .questionnaire()
            .visible_questions(&answers)
            .find(|q| !asked.contains(&q.id))
            .cloned();
        let Some(question) = next else {
            break;
        };
        asked.insert(question.id.clone());

        let current = answers.get(&question.id).or(question.default.as_ref());
        if let Some(value) = prompt(&theme, &question, current)? {
            let mut raw = Map::new();
            raw.insert(question.id.clone(), value);
            if workspace.update_answers(&raw)?.is_saved() {
                last_outcome = SaveOutcome::Saved;
            }
        }
    }

    report_save(workspace, &before, last_outcome)?;
    if workspace.is_complete()? {
        println!("{} Questionnaire complete", style("✓").green());
    }
    Ok(())
}

fn prompt(
    theme: &ColorfulTheme,
    question: &Question,
    current: Option<&AnswerValue>,
) -> Result<Option<Value>> {
    let label = if question.required {
        format!("{} *", question.label)
    } else {
        question.label.clone()
    };

    let value = match question.kind {
        QuestionType::Boolean => {
            let default = current.and_then(AnswerValue::as_bool).unwrap_or(false);
            let answer = Confirm::with_theme(theme)
                .with_prompt(label)
                .default(default)
                .interact()?;
            Some(Value::Bool(answer))
        }
        QuestionType::Select if !question.options.is_empty() => {
            let default = current
                .and_then(AnswerValue::as_str)
                .and_then(|s| question.options.iter().position(|o| o == s))
                .unwrap_or(0);
            let choice = Select::with_theme(theme)
                .with_prompt(label)
                .items(&question.options)
                .default(default)
                .interact()?;
            Some(Value::String(question.options[choice].clone()))
        }
        QuestionType::Multiselect if !question.options.is_empty() => {
            let defaults: Vec<bool> = question
                .options
                .iter()
                .map(|o| current.is_some_and(|v| v.contains(o)))
                .collect();
            let chosen = MultiSelect::with_theme(theme)
                .with_prompt(label)
                .items(&question.options)
                .defaults(&defaults)
                .interact()?;
            Some(Value::Array(
                chosen
                    .into_iter()
                    .map(|i| Value::String(question.options[i].clone()))
                    .collect(),
            ))
        }
        _ => {
            let initial = current.map(|v| v.to_string()).unwrap_or_default();
            let is_number = question.kind == QuestionType::Number;
            let text: String = Input::with_theme(theme)
                .with_prompt(label)
                .with_initial_text(initial)
                .allow_empty(!question.required)
                .validate_with(move |input: &String| -> std::result::Result<(), String> {
                    if is_number && !input.trim().is_empty() && input.trim().parse::<f64>().is_err() {
                        Err("Enter a number".to_string())
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            (!text.trim().is_empty()).then(|| Value::String(text))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_yaml_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.yaml");
        std::fs::write(&path, "company_name: Acme\nhas_ecommerce: false\ntarget_regions:\n  - EU\n").unwrap();
        let map = read_answer_file(&path).unwrap();
        assert_eq!(map["company_name"], Value::String("Acme".into()));
        assert_eq!(map["has_ecommerce"], Value::Bool(false));
        assert_eq!(map["target_regions"], serde_json::json!(["EU"]));
    }

    #[test]
    fn test_read_answers_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(read_answer_file(&path).is_err());
    }
}
