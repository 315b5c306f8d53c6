//! @acp:module "Questionnaire Types"
//! @acp:summary "Question catalog entries and answer values"
//! @acp:domain questionnaire
//! @acp:layer types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::document::DocumentType;

/// Input widget / value kind of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Email,
    Textarea,
    Boolean,
    Number,
    Select,
    Multiselect,
}

/// A single stored answer
///
/// Equality is strict: `Bool(true)` never equals `Text("true")` or `Number(1.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        AnswerValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Empty strings (after trimming) and empty lists carry no answer
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::List(items) => items.is_empty(),
            AnswerValue::Bool(_) | AnswerValue::Number(_) => false,
        }
    }

    /// Non-blank and not an explicit `false`
    pub fn is_filled(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            other => !other.is_blank(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// List membership; a scalar text answer counts as a one-element list
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            AnswerValue::List(items) => items.iter().any(|i| i == needle),
            AnswerValue::Text(s) => s == needle,
            _ => false,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(true) => f.write_str("yes"),
            AnswerValue::Bool(false) => f.write_str("no"),
            AnswerValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

/// Question id to expected value; all entries must match
pub type ShowIf = BTreeMap<String, AnswerValue>;

/// Sanitized answers keyed by question id, saved and loaded wholesale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.0.get(id)
    }

    /// Only an explicit `true` answer counts
    pub fn is_true(&self, id: &str) -> bool {
        matches!(self.0.get(id), Some(AnswerValue::Bool(true)))
    }

    /// Trimmed text answer, `None` when unset or blank
    pub fn text(&self, id: &str) -> Option<&str> {
        self.0
            .get(id)
            .and_then(AnswerValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn contains(&self, id: &str, needle: &str) -> bool {
        self.0.get(id).map(|v| v.contains(needle)).unwrap_or(false)
    }

    pub fn has_value(&self, id: &str) -> bool {
        self.0.get(id).map(|v| !v.is_blank()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        AnswerSet(iter.into_iter().collect())
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub section: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AnswerValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    #[serde(default)]
    pub affects: BTreeSet<DocumentType>,
}

impl Question {
    pub fn new(id: &str, section: &str, label: &str, kind: QuestionType) -> Self {
        Self {
            id: id.to_string(),
            section: section.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            default: None,
            options: Vec::new(),
            show_if: None,
            affects: BTreeSet::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<AnswerValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn show_if(mut self, id: &str, expected: impl Into<AnswerValue>) -> Self {
        self.show_if
            .get_or_insert_with(ShowIf::new)
            .insert(id.to_string(), expected.into());
        self
    }

    pub fn affects(mut self, documents: &[DocumentType]) -> Self {
        self.affects.extend(documents.iter().copied());
        self
    }

    /// Type-specific "answered" check used by completeness
    ///
    /// Booleans are answered once set, even to `false`; everything else also
    /// needs a non-blank value.
    pub fn is_answered(&self, answers: &AnswerSet) -> bool {
        match answers.get(&self.id) {
            None => false,
            Some(_) if self.kind == QuestionType::Boolean => true,
            Some(value) => !value.is_blank(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_value_untagged_serde() {
        let set: AnswerSet =
            serde_json::from_str(r#"{"a":true,"b":3,"c":"x","d":["EU","BR"]}"#).unwrap();
        assert_eq!(set.get("a"), Some(&AnswerValue::Bool(true)));
        assert_eq!(set.get("b"), Some(&AnswerValue::Number(3.0)));
        assert_eq!(set.get("c"), Some(&AnswerValue::text("x")));
        assert_eq!(set.get("d"), Some(&AnswerValue::list(["EU", "BR"])));
    }

    #[test]
    fn test_strict_equality() {
        assert_ne!(AnswerValue::Bool(true), AnswerValue::text("true"));
        assert_ne!(AnswerValue::Bool(true), AnswerValue::Number(1.0));
    }

    #[test]
    fn test_boolean_false_is_answered() {
        let q = Question::new("has_ecommerce", "commerce", "Shop?", QuestionType::Boolean);
        let answers = AnswerSet::new().with("has_ecommerce", false);
        assert!(q.is_answered(&answers));
    }

    #[test]
    fn test_blank_text_is_not_answered() {
        let q = Question::new("company_name", "company", "Name", QuestionType::Text);
        assert!(!q.is_answered(&AnswerSet::new().with("company_name", "   ")));
        assert!(!q.is_answered(&AnswerSet::new()));
        assert!(q.is_answered(&AnswerSet::new().with("company_name", "Acme")));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(AnswerValue::Number(30.0).to_string(), "30");
        assert_eq!(AnswerValue::Number(2.5).to_string(), "2.5");
    }
}
