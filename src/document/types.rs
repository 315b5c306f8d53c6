//! @acp:module "Document Types"
//! @acp:summary "Closed set of generated document kinds and the stored document record"
//! @acp:domain documents
//! @acp:layer model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PolicyError, Result};

/// Every document the generator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PrivacyPolicy,
    TermsOfService,
    CookiePolicy,
    DataProtection,
    ConsentManagement,
    UserRightsNotice,
    ThirdPartyServices,
    CookieCategories,
}

impl DocumentType {
    /// All document types in declaration order
    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::PrivacyPolicy,
            DocumentType::TermsOfService,
            DocumentType::CookiePolicy,
            DocumentType::DataProtection,
            DocumentType::ConsentManagement,
            DocumentType::UserRightsNotice,
            DocumentType::ThirdPartyServices,
            DocumentType::CookieCategories,
        ]
    }

    /// Identifier used in storage keys and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PrivacyPolicy => "privacy_policy",
            DocumentType::TermsOfService => "terms_of_service",
            DocumentType::CookiePolicy => "cookie_policy",
            DocumentType::DataProtection => "data_protection",
            DocumentType::ConsentManagement => "consent_management",
            DocumentType::UserRightsNotice => "user_rights_notice",
            DocumentType::ThirdPartyServices => "third_party_services",
            DocumentType::CookieCategories => "cookie_categories",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::PrivacyPolicy => "Privacy Policy",
            DocumentType::TermsOfService => "Terms of Service",
            DocumentType::CookiePolicy => "Cookie Policy",
            DocumentType::DataProtection => "Data Protection Notice",
            DocumentType::ConsentManagement => "Consent Management Notice",
            DocumentType::UserRightsNotice => "Your Privacy Rights",
            DocumentType::ThirdPartyServices => "Third-Party Services",
            DocumentType::CookieCategories => "Cookie Categories",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        DocumentType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                PolicyError::validation("parse document type", format!("invalid document type '{}'", s))
            })
    }
}

/// The current body of one document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub document_type: DocumentType,
    pub body: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub manually_edited: bool,
    /// Bumped on every body change; used for compare-and-swap writes
    #[serde(default)]
    pub revision: u64,
    /// Stamped by the first generation when no effective date was answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
}

impl GeneratedDocument {
    pub fn new(document_type: DocumentType, body: String, generated_at: DateTime<Utc>) -> Self {
        Self {
            document_type,
            body,
            generated_at,
            manually_edited: false,
            revision: 1,
            effective_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parse() {
        assert_eq!(
            "privacy_policy".parse::<DocumentType>().unwrap(),
            DocumentType::PrivacyPolicy
        );
        assert_eq!(
            "Terms-Of-Service".parse::<DocumentType>().unwrap(),
            DocumentType::TermsOfService
        );
        assert!("eula".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_type_serializes_as_identifier() {
        for doc in DocumentType::all() {
            let json = serde_json::to_string(doc).unwrap();
            assert_eq!(json, format!("\"{}\"", doc.as_str()));
        }
    }
}
