//! @acp:module "Section Resolver"
//! @acp:summary "Select the ordered sections to render for a document"
//! @acp:domain documents
//! @acp:layer logic

use crate::compliance::ComplianceFlags;
use crate::questionnaire::AnswerSet;

use super::sections::{sections_for, SectionBasis, SectionRule};
use super::types::DocumentType;

/// Answer key holding questionnaire-selected regions
pub const REGION_ANSWER: &str = "target_regions";

/// A section selected for rendering
#[derive(Debug, Clone)]
pub struct ResolvedSection {
    pub rule: SectionRule,
}

impl ResolvedSection {
    pub fn id(&self) -> &'static str {
        self.rule.id
    }
}

/// Resolve the sections of `document_type`, in table order
///
/// When any compliance flag is on, flags are the only source of jurisdiction
/// content: region-answer sections are dropped and the region answer is hidden
/// from every other predicate.
pub fn resolve(
    document_type: DocumentType,
    answers: &AnswerSet,
    flags: &ComplianceFlags,
) -> Vec<ResolvedSection> {
    let flags_authoritative = flags.any_enabled();
    let effective = if flags_authoritative {
        without_regions(answers)
    } else {
        answers.clone()
    };

    let resolved: Vec<ResolvedSection> = sections_for(document_type)
        .into_iter()
        .filter(|rule| !(flags_authoritative && rule.basis == SectionBasis::RegionAnswer))
        .filter(|rule| rule.condition.evaluate(&effective, flags))
        .map(|rule| ResolvedSection { rule })
        .collect();

    tracing::debug!(
        "Resolved {} sections for {} (flags authoritative: {})",
        resolved.len(),
        document_type,
        flags_authoritative
    );
    resolved
}

/// Section ids only, in render order
pub fn resolve_ids(
    document_type: DocumentType,
    answers: &AnswerSet,
    flags: &ComplianceFlags,
) -> Vec<&'static str> {
    resolve(document_type, answers, flags)
        .iter()
        .map(ResolvedSection::id)
        .collect()
}

fn without_regions(answers: &AnswerSet) -> AnswerSet {
    answers
        .iter()
        .filter(|(id, _)| id.as_str() != REGION_ANSWER)
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::Jurisdiction;
    use crate::questionnaire::AnswerValue;

    fn eu_answers() -> AnswerSet {
        AnswerSet::new().with(REGION_ANSWER, AnswerValue::list(["EU"]))
    }

    #[test]
    fn test_region_answer_selects_region_section_without_flags() {
        let ids = resolve_ids(DocumentType::PrivacyPolicy, &eu_answers(), &ComplianceFlags::new());
        assert!(ids.contains(&"pp_eu_region_rights"));
        assert!(!ids.contains(&"pp_gdpr_rights"));
    }

    #[test]
    fn test_gdpr_flag_takes_precedence_over_region_answer() {
        let flags = ComplianceFlags::new().with(Jurisdiction::Gdpr, true);
        let ids = resolve_ids(DocumentType::PrivacyPolicy, &eu_answers(), &flags);
        assert!(ids.contains(&"pp_gdpr_rights"));
        assert!(!ids.contains(&"pp_eu_region_rights"));
    }

    #[test]
    fn test_any_flag_suppresses_all_region_sections() {
        let flags = ComplianceFlags::new().with(Jurisdiction::Ccpa, true);
        let ids = resolve_ids(DocumentType::PrivacyPolicy, &eu_answers(), &flags);
        assert!(ids.contains(&"pp_ccpa_rights"));
        assert!(!ids.contains(&"pp_eu_region_rights"));
        assert!(!ids.contains(&"pp_gdpr_rights"));
        // Transfers were only justified by the EU region answer
        assert!(!ids.contains(&"pp_international_transfers"));
    }

    #[test]
    fn test_disabled_flags_are_not_authoritative() {
        let flags = ComplianceFlags::new().with(Jurisdiction::Gdpr, false);
        let ids = resolve_ids(DocumentType::PrivacyPolicy, &eu_answers(), &flags);
        assert!(ids.contains(&"pp_eu_region_rights"));
    }

    #[test]
    fn test_order_is_table_order() {
        let answers = AnswerSet::new()
            .with("has_ecommerce", true)
            .with("uses_analytics", true)
            .with("third_party_services", AnswerValue::list(["stripe", "google_analytics"]));
        let ids = resolve_ids(DocumentType::PrivacyPolicy, &answers, &ComplianceFlags::new());
        let table: Vec<_> = sections_for(DocumentType::PrivacyPolicy)
            .iter()
            .map(|r| r.id)
            .filter(|id| ids.contains(id))
            .collect();
        assert_eq!(ids, table);

        let ga = ids.iter().position(|id| *id == "service_google_analytics").unwrap();
        let stripe = ids.iter().position(|id| *id == "service_stripe").unwrap();
        assert!(ga < stripe);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let answers = eu_answers().with("has_user_accounts", true);
        let flags = ComplianceFlags::new();
        assert_eq!(
            resolve_ids(DocumentType::UserRightsNotice, &answers, &flags),
            resolve_ids(DocumentType::UserRightsNotice, &answers, &flags)
        );
    }
}
