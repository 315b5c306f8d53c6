//! @acp:module "Section Eligibility"
//! @acp:summary "Static per-document section tables and inclusion predicates"
//! @acp:domain documents
//! @acp:layer config
//!
//! Each document type maps to an ordered list of [`SectionRule`]s. The order
//! in the table is the render order; resolution only includes or excludes.

use crate::compliance::{ComplianceFlags, Jurisdiction};
use crate::questionnaire::AnswerSet;

use super::types::DocumentType;

/// Inclusion condition over answers and compliance flags
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Always,
    /// Answer is exactly boolean `true`
    IsTrue(&'static str),
    /// Answer is exactly the given text
    Equals(&'static str, &'static str),
    /// List answer contains the value
    Contains(&'static str, &'static str),
    /// Answer is set and not blank
    Answered(&'static str),
    /// Compliance flag is switched on
    Flag(Jurisdiction),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, answers: &AnswerSet, flags: &ComplianceFlags) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::IsTrue(id) => answers.is_true(id),
            Predicate::Equals(id, expected) => answers.text(id) == Some(*expected),
            Predicate::Contains(id, needle) => answers.contains(id, needle),
            Predicate::Answered(id) => answers.has_value(id),
            Predicate::Flag(j) => flags.is_enabled(*j),
            Predicate::All(ps) => ps.iter().all(|p| p.evaluate(answers, flags)),
            Predicate::Any(ps) => ps.iter().any(|p| p.evaluate(answers, flags)),
            Predicate::Not(p) => !p.evaluate(answers, flags),
        }
    }

    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

/// Placeholder a section renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Introduction,
    DataCollection,
    DataUsage,
    Cookies,
    CookieCategories,
    ThirdParties,
    Payments,
    Retention,
    Security,
    Transfers,
    Rights,
    Children,
    Consent,
    Accounts,
    Disputes,
    Contact,
}

impl Slot {
    /// Template token, without braces
    pub fn token(&self) -> &'static str {
        match self {
            Slot::Introduction => "INTRODUCTION",
            Slot::DataCollection => "DATA_COLLECTION",
            Slot::DataUsage => "DATA_USAGE",
            Slot::Cookies => "COOKIES",
            Slot::CookieCategories => "COOKIE_CATEGORIES",
            Slot::ThirdParties => "THIRD_PARTY_SERVICES",
            Slot::Payments => "PAYMENTS",
            Slot::Retention => "DATA_RETENTION",
            Slot::Security => "SECURITY",
            Slot::Transfers => "INTERNATIONAL_TRANSFERS",
            Slot::Rights => "USER_RIGHTS",
            Slot::Children => "CHILDREN",
            Slot::Consent => "CONSENT",
            Slot::Accounts => "ACCOUNTS",
            Slot::Disputes => "DISPUTES",
            Slot::Contact => "CONTACT",
        }
    }

    /// Neutral sentence for optional slots that end up empty
    pub fn fallback(&self) -> Option<&'static str> {
        match self {
            Slot::ThirdParties => Some("<p>We do not currently use any third-party services.</p>"),
            Slot::Cookies => Some("<p>This website does not use cookies.</p>"),
            Slot::CookieCategories => Some("<p>No optional cookie categories are in use.</p>"),
            Slot::Payments => Some("<p>We do not process payments on this website.</p>"),
            Slot::Rights => Some(
                "<p>You may contact us at any time to ask what personal information we hold about you.</p>",
            ),
            Slot::Transfers => Some("<p>We do not transfer personal information across borders.</p>"),
            _ => None,
        }
    }
}

/// Where a section's justification comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBasis {
    /// Ordinary answer-driven content
    General,
    /// Jurisdiction content justified by a compliance flag
    ComplianceFlag,
    /// Jurisdiction content justified by the `target_regions` answer
    RegionAnswer,
}

/// A conditionally-included content fragment
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub id: &'static str,
    pub slot: Slot,
    pub basis: SectionBasis,
    pub condition: Predicate,
}

impl SectionRule {
    fn new(id: &'static str, slot: Slot, condition: Predicate) -> Self {
        Self {
            id,
            slot,
            basis: SectionBasis::General,
            condition,
        }
    }

    fn always(id: &'static str, slot: Slot) -> Self {
        Self::new(id, slot, Predicate::Always)
    }

    fn flagged(id: &'static str, slot: Slot, jurisdiction: Jurisdiction) -> Self {
        Self {
            id,
            slot,
            basis: SectionBasis::ComplianceFlag,
            condition: Predicate::Flag(jurisdiction),
        }
    }

    fn regional(id: &'static str, slot: Slot, jurisdiction: Jurisdiction) -> Self {
        Self {
            id,
            slot,
            basis: SectionBasis::RegionAnswer,
            condition: Predicate::Contains(REGIONS, jurisdiction.region()),
        }
    }
}

const REGIONS: &str = "target_regions";
const SERVICES: &str = "third_party_services";

/// Flag-driven and region-driven rights sections for every jurisdiction
fn rights_sections(prefix: &'static str) -> Vec<SectionRule> {
    use Jurisdiction::*;
    let ids: [(Jurisdiction, &'static str, &'static str); 5] = match prefix {
        "pp" => [
            (Gdpr, "pp_gdpr_rights", "pp_eu_region_rights"),
            (Ccpa, "pp_ccpa_rights", "pp_california_region_rights"),
            (Lgpd, "pp_lgpd_rights", "pp_brazil_region_rights"),
            (Pipeda, "pp_pipeda_rights", "pp_canada_region_rights"),
            (Popia, "pp_popia_rights", "pp_south_africa_region_rights"),
        ],
        _ => [
            (Gdpr, "urn_gdpr_rights", "urn_eu_region_rights"),
            (Ccpa, "urn_ccpa_rights", "urn_california_region_rights"),
            (Lgpd, "urn_lgpd_rights", "urn_brazil_region_rights"),
            (Pipeda, "urn_pipeda_rights", "urn_canada_region_rights"),
            (Popia, "urn_popia_rights", "urn_south_africa_region_rights"),
        ],
    };
    ids.into_iter()
        .flat_map(|(j, flag_id, region_id)| {
            [
                SectionRule::flagged(flag_id, Slot::Rights, j),
                SectionRule::regional(region_id, Slot::Rights, j),
            ]
        })
        .collect()
}

/// One section per embeddable third-party service
fn service_sections(slot: Slot) -> Vec<SectionRule> {
    [
        ("service_google_analytics", "google_analytics"),
        ("service_google_ads", "google_ads"),
        ("service_facebook_pixel", "facebook_pixel"),
        ("service_hotjar", "hotjar"),
        ("service_stripe", "stripe"),
        ("service_paypal", "paypal"),
        ("service_mailchimp", "mailchimp"),
        ("service_youtube", "youtube"),
    ]
    .into_iter()
    .map(|(id, service)| SectionRule::new(id, slot, Predicate::Contains(SERVICES, service)))
    .collect()
}

fn cookie_category_sections() -> Vec<SectionRule> {
    let uses_cookies = || Predicate::IsTrue("uses_cookies");
    vec![
        SectionRule::new("cookies_necessary", Slot::CookieCategories, uses_cookies()),
        SectionRule::new(
            "cookies_preferences",
            Slot::CookieCategories,
            Predicate::All(vec![uses_cookies(), Predicate::Contains("cookie_categories", "preferences")]),
        ),
        SectionRule::new(
            "cookies_analytics",
            Slot::CookieCategories,
            Predicate::All(vec![
                uses_cookies(),
                Predicate::Any(vec![
                    Predicate::Contains("cookie_categories", "analytics"),
                    Predicate::IsTrue("uses_analytics"),
                ]),
            ]),
        ),
        SectionRule::new(
            "cookies_marketing",
            Slot::CookieCategories,
            Predicate::All(vec![uses_cookies(), Predicate::Contains("cookie_categories", "marketing")]),
        ),
    ]
}

fn any_transfer_basis() -> Predicate {
    Predicate::Any(vec![
        Predicate::Flag(Jurisdiction::Gdpr),
        Predicate::Flag(Jurisdiction::Lgpd),
        Predicate::Contains(REGIONS, "EU"),
        Predicate::Contains(REGIONS, "UK"),
    ])
}

/// Ordered section table for a document type
pub fn sections_for(document_type: DocumentType) -> Vec<SectionRule> {
    use DocumentType::*;
    use Predicate::*;

    match document_type {
        PrivacyPolicy => {
            let mut rules = vec![
                SectionRule::always("pp_introduction", Slot::Introduction),
                SectionRule::always("pp_collection_basic", Slot::DataCollection),
                SectionRule::new("pp_collection_accounts", Slot::DataCollection, IsTrue("has_user_accounts")),
                SectionRule::new("pp_collection_location", Slot::DataCollection, Contains("data_types", "location")),
                SectionRule::always("pp_usage_service", Slot::DataUsage),
                SectionRule::new("pp_usage_analytics", Slot::DataUsage, IsTrue("uses_analytics")),
                SectionRule::new("pp_usage_marketing", Slot::DataUsage, IsTrue("sends_marketing_emails")),
                SectionRule::new("pp_cookies_summary", Slot::Cookies, IsTrue("uses_cookies")),
            ];
            rules.extend(service_sections(Slot::ThirdParties));
            rules.extend([
                SectionRule::new("pp_payments", Slot::Payments, IsTrue("has_ecommerce")),
                SectionRule::new(
                    "pp_payments_card_data",
                    Slot::Payments,
                    All(vec![IsTrue("has_ecommerce"), IsTrue("collect_payment_info")]),
                ),
                SectionRule::new("pp_retention_period", Slot::Retention, Answered("data_retention_days")),
                SectionRule::new(
                    "pp_retention_default",
                    Slot::Retention,
                    Answered("data_retention_days").not(),
                ),
                SectionRule::always("pp_security", Slot::Security),
                SectionRule::new("pp_international_transfers", Slot::Transfers, any_transfer_basis()),
            ]);
            rules.extend(rights_sections("pp"));
            rules.extend([
                SectionRule::new("pp_children", Slot::Children, IsTrue("collects_children_data")),
                SectionRule::new("pp_dpo_contact", Slot::Contact, IsTrue("has_dpo")),
                SectionRule::always("pp_contact", Slot::Contact),
            ]);
            rules
        }
        TermsOfService => vec![
            SectionRule::always("tos_introduction", Slot::Introduction),
            SectionRule::new("tos_accounts", Slot::Accounts, IsTrue("has_user_accounts")),
            SectionRule::new("tos_purchases", Slot::Payments, IsTrue("has_ecommerce")),
            SectionRule::new(
                "tos_subscriptions",
                Slot::Payments,
                All(vec![IsTrue("has_ecommerce"), IsTrue("offers_subscriptions")]),
            ),
            SectionRule::new(
                "tos_refunds",
                Slot::Payments,
                All(vec![IsTrue("has_ecommerce"), Answered("refund_policy")]),
            ),
            SectionRule::new("tos_minimum_age", Slot::Children, IsTrue("collects_children_data").not()),
            SectionRule::new("tos_parental_consent", Slot::Children, IsTrue("collects_children_data")),
            SectionRule::always("tos_governing_law", Slot::Disputes),
            SectionRule::new(
                "tos_eu_consumer_disputes",
                Slot::Disputes,
                Any(vec![Flag(Jurisdiction::Gdpr), Contains(REGIONS, "EU")]),
            ),
            SectionRule::always("tos_contact", Slot::Contact),
        ],
        CookiePolicy => {
            let mut rules = vec![
                SectionRule::always("cp_introduction", Slot::Introduction),
                SectionRule::new("cp_what_are_cookies", Slot::Cookies, IsTrue("uses_cookies")),
            ];
            rules.extend(cookie_category_sections());
            rules.extend(service_sections(Slot::ThirdParties));
            rules.extend([
                SectionRule::flagged("cp_gdpr_consent", Slot::Consent, Jurisdiction::Gdpr),
                SectionRule::regional("cp_eu_region_consent", Slot::Consent, Jurisdiction::Gdpr),
                SectionRule::flagged("cp_ccpa_opt_out", Slot::Consent, Jurisdiction::Ccpa),
                SectionRule::regional("cp_california_region_opt_out", Slot::Consent, Jurisdiction::Ccpa),
                SectionRule::always("cp_manage_cookies", Slot::Consent),
                SectionRule::always("cp_contact", Slot::Contact),
            ]);
            rules
        }
        DataProtection => vec![
            SectionRule::always("dp_introduction", Slot::Introduction),
            SectionRule::always("dp_controller", Slot::DataCollection),
            SectionRule::flagged("dp_gdpr_lawful_basis", Slot::DataUsage, Jurisdiction::Gdpr),
            SectionRule::regional("dp_eu_region_lawful_basis", Slot::DataUsage, Jurisdiction::Gdpr),
            SectionRule::flagged("dp_lgpd_legal_basis", Slot::DataUsage, Jurisdiction::Lgpd),
            SectionRule::regional("dp_brazil_region_legal_basis", Slot::DataUsage, Jurisdiction::Lgpd),
            SectionRule::new("dp_retention", Slot::Retention, Answered("data_retention_days")),
            SectionRule::always("dp_security_measures", Slot::Security),
            SectionRule::new("dp_transfers", Slot::Transfers, any_transfer_basis()),
            SectionRule::new("dp_children", Slot::Children, IsTrue("collects_children_data")),
            SectionRule::new("dp_officer", Slot::Contact, IsTrue("has_dpo")),
            SectionRule::always("dp_contact", Slot::Contact),
        ],
        ConsentManagement => vec![
            SectionRule::always("cm_introduction", Slot::Introduction),
            SectionRule::new("cm_cookie_consent", Slot::Cookies, IsTrue("uses_cookies")),
            SectionRule::new("cm_marketing_consent", Slot::Consent, IsTrue("sends_marketing_emails")),
            SectionRule::flagged("cm_gdpr_withdrawal", Slot::Consent, Jurisdiction::Gdpr),
            SectionRule::regional("cm_eu_region_withdrawal", Slot::Consent, Jurisdiction::Gdpr),
            SectionRule::flagged("cm_ccpa_do_not_sell", Slot::Consent, Jurisdiction::Ccpa),
            SectionRule::regional("cm_california_region_do_not_sell", Slot::Consent, Jurisdiction::Ccpa),
            SectionRule::always("cm_records", Slot::Consent),
            SectionRule::always("cm_contact", Slot::Contact),
        ],
        UserRightsNotice => {
            let mut rules = vec![
                SectionRule::always("urn_introduction", Slot::Introduction),
                SectionRule::new("urn_account_access", Slot::Accounts, IsTrue("has_user_accounts")),
            ];
            rules.extend(rights_sections("urn"));
            rules.extend([
                SectionRule::always("urn_how_to_exercise", Slot::Contact),
            ]);
            rules
        }
        ThirdPartyServices => {
            let mut rules = vec![SectionRule::always("tps_introduction", Slot::Introduction)];
            rules.extend(service_sections(Slot::ThirdParties));
            rules.push(SectionRule::always("tps_contact", Slot::Contact));
            rules
        }
        CookieCategories => {
            let mut rules = vec![SectionRule::always("cc_introduction", Slot::Introduction)];
            rules.extend(cookie_category_sections());
            rules
        }
    }
}

/// Slots used by a document type, in first-appearance order
pub fn slots_for(document_type: DocumentType) -> Vec<Slot> {
    let mut slots = Vec::new();
    for rule in sections_for(document_type) {
        if !slots.contains(&rule.slot) {
            slots.push(rule.slot);
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_section_ids_unique_per_document() {
        for doc in DocumentType::all() {
            let rules = sections_for(*doc);
            let ids: HashSet<_> = rules.iter().map(|r| r.id).collect();
            assert_eq!(ids.len(), rules.len(), "duplicate section id in {}", doc);
        }
    }

    #[test]
    fn test_every_document_has_sections() {
        for doc in DocumentType::all() {
            assert!(!sections_for(*doc).is_empty());
        }
    }

    #[test]
    fn test_predicate_combinators() {
        let answers = AnswerSet::new()
            .with("has_ecommerce", true)
            .with("target_regions", crate::questionnaire::AnswerValue::list(["EU"]));
        let flags = ComplianceFlags::new().with(Jurisdiction::Ccpa, true);

        assert!(Predicate::All(vec![
            Predicate::IsTrue("has_ecommerce"),
            Predicate::Contains("target_regions", "EU"),
        ])
        .evaluate(&answers, &flags));
        assert!(Predicate::Any(vec![Predicate::Flag(Jurisdiction::Gdpr), Predicate::Flag(Jurisdiction::Ccpa)])
            .evaluate(&answers, &flags));
        assert!(Predicate::IsTrue("uses_analytics").not().evaluate(&answers, &flags));
        assert!(!Predicate::Answered("company_name").evaluate(&answers, &flags));
    }

    #[test]
    fn test_regional_rules_point_at_regions_answer() {
        let rule = SectionRule::regional("x", Slot::Rights, Jurisdiction::Ccpa);
        assert_eq!(rule.basis, SectionBasis::RegionAnswer);
        assert_eq!(rule.condition, Predicate::Contains("target_regions", "US-CA"));
    }

    #[test]
    fn test_slots_for_privacy_policy() {
        let slots = slots_for(DocumentType::PrivacyPolicy);
        assert_eq!(slots.first(), Some(&Slot::Introduction));
        assert!(slots.contains(&Slot::Rights));
        assert!(!slots.contains(&Slot::Disputes));
    }
}
