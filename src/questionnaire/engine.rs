//! @acp:module "Questionnaire Engine"
//! @acp:summary "Visibility filtering, completeness and progress over the question catalog"
//! @acp:domain questionnaire
//! @acp:layer service

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::catalog::default_questions;
use super::condition::is_visible;
use super::sanitize::sanitize_answers;
use super::types::{AnswerSet, AnswerValue, Question};
use crate::document::DocumentType;

/// Owns the immutable question catalog
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new(default_questions())
    }
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Full catalog in declaration order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions whose `show_if` is satisfied, in declaration order
    pub fn visible_questions<'a>(&'a self, answers: &'a AnswerSet) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |q| is_visible(q.show_if.as_ref(), answers))
    }

    /// Sanitize a raw submission against this catalog
    pub fn sanitize(&self, raw: &Map<String, Value>) -> AnswerSet {
        sanitize_answers(raw, &self.questions)
    }

    /// First required, visible, unanswered question
    pub fn first_missing<'a>(&'a self, answers: &'a AnswerSet) -> Option<&'a Question> {
        self.visible_questions(answers)
            .find(|q| q.required && !q.is_answered(answers))
    }

    /// True when every required and currently visible question is answered
    pub fn is_complete(&self, answers: &AnswerSet) -> bool {
        self.first_missing(answers).is_none()
    }

    /// Share of the whole catalog holding a non-empty answer, floored
    ///
    /// The denominator is the full catalog, hidden questions included, and an
    /// explicit `false` is not counted, so this can stay below 100 while
    /// [`Questionnaire::is_complete`] is true.
    pub fn completion_percentage(&self, answers: &AnswerSet) -> u8 {
        let total = self.questions.len();
        if total == 0 {
            return 0;
        }
        let answered = self
            .questions
            .iter()
            .filter(|q| answers.get(&q.id).is_some_and(AnswerValue::is_filled))
            .count();
        ((answered * 100) / total) as u8
    }

    /// Answers with catalog defaults filled in for unset questions
    pub fn with_defaults(&self, answers: &AnswerSet) -> AnswerSet {
        let mut merged = answers.clone();
        for q in &self.questions {
            if let (None, Some(default)) = (answers.get(&q.id), &q.default) {
                merged.insert(q.id.clone(), default.clone());
            }
        }
        merged
    }

    /// Questions that influence the given document
    pub fn questions_for(&self, document_type: DocumentType) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.affects.contains(&document_type))
    }

    /// Documents whose content depends on any of the changed answers
    pub fn documents_affected_by<'a, I>(&self, changed: I) -> BTreeSet<DocumentType>
    where
        I: IntoIterator<Item = &'a str>,
    {
        changed
            .into_iter()
            .filter_map(|id| self.question(id))
            .flat_map(|q| q.affects.iter().copied())
            .collect()
    }

    /// Question ids whose stored value differs between two answer sets
    pub fn changed_ids(before: &AnswerSet, after: &AnswerSet) -> Vec<String> {
        let mut ids: BTreeSet<&String> = before.iter().map(|(k, _)| k).collect();
        ids.extend(after.iter().map(|(k, _)| k));
        ids.into_iter()
            .filter(|id| before.get(id) != after.get(id))
            .cloned()
            .collect()
    }

    /// Validate that a select/multiselect answer only uses declared options
    pub fn invalid_options(&self, answers: &AnswerSet) -> Vec<(String, String)> {
        let mut invalid = Vec::new();
        for q in self.questions.iter().filter(|q| !q.options.is_empty()) {
            let values: Vec<&str> = match answers.get(&q.id) {
                Some(AnswerValue::List(items)) => items.iter().map(String::as_str).collect(),
                Some(AnswerValue::Text(s)) => vec![s.as_str()],
                _ => continue,
            };
            for v in values {
                if !q.options.iter().any(|o| o == v) {
                    invalid.push((q.id.clone(), v.to_string()));
                }
            }
        }
        invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::QuestionType;

    fn small() -> Questionnaire {
        Questionnaire::new(vec![
            Question::new("has_ecommerce", "commerce", "Shop?", QuestionType::Boolean).required(),
            Question::new("collect_payment_info", "commerce", "Cards?", QuestionType::Boolean)
                .required()
                .show_if("has_ecommerce", true),
            Question::new("company_name", "company", "Name", QuestionType::Text).required(),
            Question::new("notes", "company", "Notes", QuestionType::Textarea),
        ])
    }

    fn ids<'a>(questions: impl Iterator<Item = &'a Question>) -> Vec<&'a str> {
        questions.map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_hidden_question_not_visible() {
        let q = small();
        let answers = AnswerSet::new().with("has_ecommerce", false);
        assert_eq!(
            ids(q.visible_questions(&answers)),
            vec!["has_ecommerce", "company_name", "notes"]
        );
    }

    #[test]
    fn test_visible_when_condition_met() {
        let q = small();
        let answers = AnswerSet::new().with("has_ecommerce", true);
        assert!(ids(q.visible_questions(&answers)).contains(&"collect_payment_info"));
    }

    #[test]
    fn test_hidden_required_question_skipped_by_completeness() {
        let q = small();
        let answers = AnswerSet::new()
            .with("has_ecommerce", false)
            .with("company_name", "Acme");
        assert!(q.is_complete(&answers));
    }

    #[test]
    fn test_visible_required_question_blocks_completeness() {
        let q = small();
        let answers = AnswerSet::new()
            .with("has_ecommerce", true)
            .with("company_name", "Acme");
        assert!(!q.is_complete(&answers));
        assert_eq!(q.first_missing(&answers).unwrap().id, "collect_payment_info");

        let answers = answers.with("collect_payment_info", false);
        assert!(q.is_complete(&answers));
    }

    #[test]
    fn test_completion_percentage_uses_full_catalog() {
        let q = small();
        let answers = AnswerSet::new()
            .with("has_ecommerce", false)
            .with("company_name", "Acme");
        assert!(q.is_complete(&answers));
        assert_eq!(q.completion_percentage(&answers), 25);
    }

    #[test]
    fn test_false_boolean_counts_for_completeness_not_progress() {
        let q = Questionnaire::new(vec![
            Question::new("a", "s", "", QuestionType::Boolean).required(),
            Question::new("b", "s", "", QuestionType::Text),
        ]);
        let answers = AnswerSet::new().with("a", false);
        assert!(q.is_complete(&answers));
        assert_eq!(q.completion_percentage(&answers), 0);

        let answers = answers.with("a", true);
        assert_eq!(q.completion_percentage(&answers), 50);
    }

    #[test]
    fn test_completion_percentage_floors() {
        let q = Questionnaire::new(vec![
            Question::new("a", "s", "", QuestionType::Text),
            Question::new("b", "s", "", QuestionType::Text),
            Question::new("c", "s", "", QuestionType::Text),
        ]);
        assert_eq!(q.completion_percentage(&AnswerSet::new().with("a", "x")), 33);
        assert_eq!(Questionnaire::new(vec![]).completion_percentage(&AnswerSet::new()), 0);
    }

    #[test]
    fn test_visible_questions_restartable() {
        let q = small();
        let answers = AnswerSet::new();
        assert_eq!(q.visible_questions(&answers).count(), q.visible_questions(&answers).count());
    }

    #[test]
    fn test_documents_affected_by() {
        let q = Questionnaire::default();
        let docs = q.documents_affected_by(["has_ecommerce"]);
        assert!(docs.contains(&DocumentType::TermsOfService));
        assert!(!docs.contains(&DocumentType::CookieCategories));
    }

    #[test]
    fn test_changed_ids() {
        let before = AnswerSet::new().with("a", "x").with("b", true);
        let after = AnswerSet::new().with("a", "y").with("b", true).with("c", 1.0);
        assert_eq!(Questionnaire::changed_ids(&before, &after), vec!["a", "c"]);
    }

    #[test]
    fn test_invalid_options() {
        let q = Questionnaire::default();
        let answers = AnswerSet::new().with("target_regions", AnswerValue::list(["EU", "MARS"]));
        assert_eq!(
            q.invalid_options(&answers),
            vec![("target_regions".to_string(), "MARS".to_string())]
        );
    }
}
