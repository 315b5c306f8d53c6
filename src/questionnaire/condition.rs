//! @acp:module "Questionnaire Condition Evaluator"
//! @acp:summary "Evaluate show_if dependency predicates against an answer set"
//! @acp:domain questionnaire
//! @acp:layer logic

use super::types::{AnswerSet, ShowIf};

/// Evaluate a `show_if` conjunction against answers
///
/// Every key must be present in `answers` with a strictly equal value. An
/// empty map is always satisfied; an unset dependency never is.
pub fn evaluate(show_if: &ShowIf, answers: &AnswerSet) -> bool {
    show_if
        .iter()
        .all(|(id, expected)| answers.get(id) == Some(expected))
}

/// Visibility of an optional condition; no condition means always visible
pub fn is_visible(show_if: Option<&ShowIf>, answers: &AnswerSet) -> bool {
    show_if.map_or(true, |condition| evaluate(condition, answers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::AnswerValue;

    fn show_if(pairs: &[(&str, AnswerValue)]) -> ShowIf {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_condition_always_true() {
        assert!(evaluate(&ShowIf::new(), &AnswerSet::new()));
        assert!(evaluate(&ShowIf::new(), &AnswerSet::new().with("x", false)));
        assert!(is_visible(None, &AnswerSet::new()));
    }

    #[test]
    fn test_matching_value() {
        let cond = show_if(&[("x", true.into())]);
        assert!(evaluate(&cond, &AnswerSet::new().with("x", true)));
    }

    #[test]
    fn test_mismatched_value() {
        let cond = show_if(&[("x", true.into())]);
        assert!(!evaluate(&cond, &AnswerSet::new().with("x", false)));
    }

    #[test]
    fn test_missing_dependency() {
        let cond = show_if(&[("x", true.into())]);
        assert!(!evaluate(&cond, &AnswerSet::new()));
    }

    #[test]
    fn test_strict_not_truthy() {
        let cond = show_if(&[("x", true.into())]);
        assert!(!evaluate(&cond, &AnswerSet::new().with("x", "true")));
        assert!(!evaluate(&cond, &AnswerSet::new().with("x", 1.0)));
    }

    #[test]
    fn test_conjunction_requires_all() {
        let cond = show_if(&[("a", true.into()), ("b", "eu".into())]);
        assert!(evaluate(&cond, &AnswerSet::new().with("a", true).with("b", "eu")));
        assert!(!evaluate(&cond, &AnswerSet::new().with("a", true)));
    }
}
