//! @acp:module "Question Catalog"
//! @acp:summary "Built-in questionnaire, in display order"
//! @acp:domain questionnaire
//! @acp:layer config

use super::types::{Question, QuestionType};
use crate::document::DocumentType as D;

/// Regions offered by the `target_regions` question
pub const TARGET_REGIONS: &[&str] = &["EU", "UK", "US-CA", "BR", "CA", "ZA", "OTHER"];

/// Services offered by the `third_party_services` question
pub const THIRD_PARTY_SERVICES: &[&str] = &[
    "google_analytics",
    "google_ads",
    "facebook_pixel",
    "hotjar",
    "stripe",
    "paypal",
    "mailchimp",
    "youtube",
];

/// Cookie categories offered by the `cookie_categories` question
pub const COOKIE_CATEGORIES: &[&str] = &["necessary", "preferences", "analytics", "marketing"];

/// The default question catalog
pub fn default_questions() -> Vec<Question> {
    use QuestionType::*;

    vec![
        // Company
        Question::new("company_name", "company", "Legal name of your company", Text)
            .required()
            .affects(D::all()),
        Question::new("contact_email", "company", "Contact email for privacy requests", Email)
            .required()
            .affects(D::all()),
        Question::new("company_address", "company", "Registered postal address", Textarea)
            .affects(&[D::PrivacyPolicy, D::TermsOfService, D::DataProtection]),
        Question::new("company_phone", "company", "Contact phone number", Text)
            .affects(&[D::PrivacyPolicy, D::TermsOfService]),
        Question::new("effective_date", "company", "Effective date (YYYY-MM-DD)", Text)
            .affects(D::all()),
        // Website
        Question::new("site_name", "website", "Website name", Text).affects(D::all()),
        Question::new("site_url", "website", "Website URL", Text).affects(D::all()),
        Question::new("has_user_accounts", "website", "Can visitors create accounts?", Boolean)
            .required()
            .default_value(false)
            .affects(&[D::PrivacyPolicy, D::TermsOfService, D::UserRightsNotice]),
        Question::new(
            "collects_children_data",
            "website",
            "Is the site directed at children under 16?",
            Boolean,
        )
        .default_value(false)
        .affects(&[D::PrivacyPolicy, D::TermsOfService, D::DataProtection]),
        // Data
        Question::new("data_types", "data", "Personal data you collect", Multiselect)
            .options(&["name", "email", "phone", "address", "payment", "location", "usage"])
            .affects(&[D::PrivacyPolicy, D::DataProtection]),
        Question::new("uses_analytics", "data", "Do you use analytics?", Boolean)
            .required()
            .default_value(false)
            .affects(&[D::PrivacyPolicy, D::CookiePolicy, D::CookieCategories]),
        Question::new(
            "sends_marketing_emails",
            "data",
            "Do you send marketing emails?",
            Boolean,
        )
        .default_value(false)
        .affects(&[D::PrivacyPolicy, D::ConsentManagement]),
        Question::new("uses_cookies", "data", "Does the site set cookies?", Boolean)
            .required()
            .default_value(true)
            .affects(&[D::CookiePolicy, D::CookieCategories, D::ConsentManagement]),
        Question::new("cookie_categories", "data", "Cookie categories in use", Multiselect)
            .required()
            .options(COOKIE_CATEGORIES)
            .show_if("uses_cookies", true)
            .affects(&[D::CookiePolicy, D::CookieCategories, D::ConsentManagement]),
        Question::new("data_retention_days", "data", "Retention period in days", Number)
            .affects(&[D::PrivacyPolicy, D::DataProtection]),
        // Commerce
        Question::new("has_ecommerce", "commerce", "Do you sell products or services online?", Boolean)
            .required()
            .default_value(false)
            .affects(&[D::PrivacyPolicy, D::TermsOfService]),
        Question::new(
            "collect_payment_info",
            "commerce",
            "Do you process payment card details yourself?",
            Boolean,
        )
        .required()
        .show_if("has_ecommerce", true)
        .affects(&[D::PrivacyPolicy, D::TermsOfService]),
        Question::new("offers_subscriptions", "commerce", "Do you offer subscriptions?", Boolean)
            .show_if("has_ecommerce", true)
            .affects(&[D::TermsOfService]),
        Question::new("refund_policy", "commerce", "Summary of your refund policy", Textarea)
            .required()
            .show_if("has_ecommerce", true)
            .affects(&[D::TermsOfService]),
        // Services
        Question::new(
            "third_party_services",
            "services",
            "Third-party services embedded in the site",
            Multiselect,
        )
        .options(THIRD_PARTY_SERVICES)
        .affects(&[D::PrivacyPolicy, D::CookiePolicy, D::ThirdPartyServices]),
        // Jurisdictions
        Question::new("target_regions", "jurisdictions", "Regions you serve", Multiselect)
            .required()
            .options(TARGET_REGIONS)
            .affects(&[D::PrivacyPolicy, D::DataProtection, D::UserRightsNotice]),
        Question::new("governing_law", "jurisdictions", "Governing law (country/state)", Text)
            .required()
            .affects(&[D::TermsOfService]),
        Question::new("has_dpo", "jurisdictions", "Have you appointed a Data Protection Officer?", Boolean)
            .default_value(false)
            .affects(&[D::PrivacyPolicy, D::DataProtection]),
        Question::new("dpo_email", "jurisdictions", "Data Protection Officer email", Email)
            .required()
            .show_if("has_dpo", true)
            .affects(&[D::PrivacyPolicy, D::DataProtection]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_question_ids_unique() {
        let questions = default_questions();
        let ids: HashSet<_> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), questions.len());
    }

    #[test]
    fn test_show_if_references_known_questions() {
        let questions = default_questions();
        let ids: HashSet<_> = questions.iter().map(|q| q.id.clone()).collect();
        for q in &questions {
            for dep in q.show_if.iter().flat_map(|s| s.keys()) {
                assert!(ids.contains(dep), "{} depends on unknown {}", q.id, dep);
            }
        }
    }

    #[test]
    fn test_every_question_affects_a_document() {
        assert!(default_questions().iter().all(|q| !q.affects.is_empty()));
    }
}
