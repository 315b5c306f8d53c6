//! @acp:module "Answer Sanitizer"
//! @acp:summary "Coerce raw submitted values into typed answers"
//! @acp:domain questionnaire
//! @acp:layer logic
//!
//! Known question ids are coerced by their declared [`QuestionType`], so a
//! number question keeps `"1"` as a number and a text question keeps `"yes"`
//! as text. Ids not in the catalog fall back to inferring the type from the
//! raw value shape, where `1`/`0` and `"1"`/`"0"` are booleans.

use serde_json::{Map, Value};

use super::types::{AnswerSet, AnswerValue, Question, QuestionType};

/// Sanitize a raw submission into an [`AnswerSet`]; nulls are dropped
pub fn sanitize_answers(raw: &Map<String, Value>, questions: &[Question]) -> AnswerSet {
    raw.iter()
        .filter_map(|(key, value)| {
            let key = key.trim();
            let kind = questions.iter().find(|q| q.id == key).map(|q| q.kind);
            let sanitized = match kind {
                Some(kind) => sanitize_typed(value, kind),
                None => infer(value),
            }?;
            Some((key.to_string(), sanitized))
        })
        .collect()
}

/// Infer a value's type from its shape
pub fn infer(value: &Value) -> Option<AnswerValue> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(to_list(items)),
        Value::Bool(b) => Some(AnswerValue::Bool(*b)),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(AnswerValue::Bool(false)),
            Some(1) => Some(AnswerValue::Bool(true)),
            _ => n.as_f64().map(AnswerValue::Number),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if let Some(b) = parse_bool_word(trimmed).or_else(|| parse_bool_digit(trimmed)) {
                Some(AnswerValue::Bool(b))
            } else if let Some(n) = parse_number(trimmed) {
                Some(AnswerValue::Number(n))
            } else {
                Some(AnswerValue::Text(trimmed.to_string()))
            }
        }
        Value::Object(_) => Some(AnswerValue::Text(value.to_string())),
    }
}

fn sanitize_typed(value: &Value, kind: QuestionType) -> Option<AnswerValue> {
    if value.is_null() {
        return None;
    }
    match kind {
        QuestionType::Boolean => Some(AnswerValue::Bool(to_bool(value))),
        QuestionType::Number => match value {
            Value::Number(n) => n.as_f64().map(AnswerValue::Number),
            Value::String(s) => Some(
                parse_number(s.trim())
                    .map(AnswerValue::Number)
                    .unwrap_or_else(|| AnswerValue::Text(s.trim().to_string())),
            ),
            other => infer(other),
        },
        QuestionType::Multiselect => match value {
            Value::Array(items) => Some(to_list(items)),
            Value::String(s) => Some(AnswerValue::List(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            other => Some(AnswerValue::List(vec![scalar_text(other)])),
        },
        QuestionType::Text | QuestionType::Email | QuestionType::Textarea | QuestionType::Select => {
            match value {
                Value::Array(items) => Some(to_list(items)),
                other => Some(AnswerValue::Text(scalar_text(other))),
            }
        }
    }
}

fn to_list(items: &[Value]) -> AnswerValue {
    AnswerValue::List(
        items
            .iter()
            .filter(|v| !v.is_null())
            .map(scalar_text)
            .collect(),
    )
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Boolean-like strings and integers
fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            parse_bool_word(s)
                .or_else(|| parse_number(s).map(|n| n != 0.0))
                .unwrap_or(false)
        }
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn parse_bool_word(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_digit(s: &str) -> Option<bool> {
    match s {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
