//! @acp:module "Document Composer"
//! @acp:summary "Assemble a document from its base template and resolved sections"
//! @acp:domain documents
//! @acp:layer logic
//!
//! Composition never fails. A missing template yields an empty document and
//! a missing section fragment renders as nothing; both are logged.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::compliance::{ComplianceFlags, ComplianceFlagsProvider};
use crate::questionnaire::AnswerSet;

use super::content::ContentCatalog;
use super::resolver::{resolve, ResolvedSection};
use super::sections::{slots_for, Slot};
use super::types::DocumentType;

/// `{{TOKEN}}` placeholder, tolerant of inner whitespace
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z][A-Z0-9_]*)\s*\}\}").unwrap());

/// Anything still shaped like a placeholder after substitution
static LEFTOVER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").unwrap());

/// Site-level defaults injected by the caller instead of read from global settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Scalar metadata tokens: (token, answer id, fallback)
const METADATA_TOKENS: &[(&str, &str, &str)] = &[
    ("COMPANY_NAME", "company_name", "the website operator"),
    ("CONTACT_EMAIL", "contact_email", "the contact address published on this website"),
    ("COMPANY_ADDRESS", "company_address", "the address published on this website"),
    ("COMPANY_PHONE", "company_phone", "the telephone number published on this website"),
    ("GOVERNING_LAW", "governing_law", "the laws of the operator's country of establishment"),
    ("DPO_EMAIL", "dpo_email", "our privacy contact"),
    ("REFUND_POLICY", "refund_policy", "Refunds are handled case by case."),
];

/// Builds documents for one site
pub struct Composer<'a, C: ContentCatalog, F: ComplianceFlagsProvider> {
    catalog: &'a C,
    flags: &'a F,
    site: SiteProfile,
    today: NaiveDate,
}

impl<'a, C: ContentCatalog, F: ComplianceFlagsProvider> Composer<'a, C, F> {
    pub fn new(catalog: &'a C, flags: &'a F) -> Self {
        Self {
            catalog,
            flags,
            site: SiteProfile::default(),
            today: chrono::Utc::now().date_naive(),
        }
    }

    pub fn with_site(mut self, site: SiteProfile) -> Self {
        self.site = site;
        self
    }

    /// Date used when no effective date was answered
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Compose `document_type` from `answers`
    pub fn compose(&self, document_type: DocumentType, answers: &AnswerSet) -> String {
        let template = match self.catalog.template(document_type) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Composing {} as empty document: {}", document_type, e);
                return String::new();
            }
        };

        let flags = self.flags.flags();
        let sections = resolve(document_type, answers, &flags);
        let tokens = self.build_tokens(document_type, answers, &flags, &sections);

        scrub_placeholders(&substitute(&template, &tokens))
    }

    /// Token map for a document: metadata plus one entry per slot
    pub fn build_tokens(
        &self,
        document_type: DocumentType,
        answers: &AnswerSet,
        flags: &ComplianceFlags,
        sections: &[ResolvedSection],
    ) -> BTreeMap<String, String> {
        let mut tokens = self.metadata_tokens(document_type, answers, flags);

        for slot in slots_for(document_type) {
            let rendered = self.render_slot(slot, sections, &tokens);
            tokens.insert(slot.token().to_string(), rendered);
        }

        tokens
    }

    fn metadata_tokens(
        &self,
        document_type: DocumentType,
        answers: &AnswerSet,
        flags: &ComplianceFlags,
    ) -> BTreeMap<String, String> {
        let mut tokens: BTreeMap<String, String> = METADATA_TOKENS
            .iter()
            .map(|(token, id, fallback)| {
                let value = answers.text(id).unwrap_or(fallback);
                (token.to_string(), value.to_string())
            })
            .collect();

        let site_name = answers
            .text("site_name")
            .or(self.site.name.as_deref())
            .unwrap_or("this website");
        let site_url = answers
            .text("site_url")
            .or(self.site.url.as_deref())
            .unwrap_or("");
        let effective_date = answers
            .text("effective_date")
            .map(str::to_string)
            .unwrap_or_else(|| self.today.format("%B %-d, %Y").to_string());
        let retention = answers
            .get("data_retention_days")
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "as long as necessary for the purposes described".to_string());
        let frameworks: Vec<&str> = flags.enabled().map(|j| j.name()).collect();

        tokens.insert("SITE_NAME".into(), site_name.to_string());
        tokens.insert("SITE_URL".into(), site_url.to_string());
        tokens.insert("EFFECTIVE_DATE".into(), effective_date);
        tokens.insert("RETENTION_DAYS".into(), retention);
        tokens.insert("DOCUMENT_TITLE".into(), document_type.title().to_string());
        tokens.insert("COMPLIANCE_FRAMEWORKS".into(), frameworks.join(", "));
        tokens
    }

    /// Concatenate the fragments of every section in `slot`, or its fallback
    fn render_slot(
        &self,
        slot: Slot,
        sections: &[ResolvedSection],
        metadata: &BTreeMap<String, String>,
    ) -> String {
        let fragments: Vec<String> = sections
            .iter()
            .filter(|s| s.rule.slot == slot)
            .filter_map(|s| match self.catalog.section(s.id()) {
                Ok(body) => Some(substitute(body.trim(), metadata)),
                Err(e) => {
                    tracing::warn!("Skipping section {}: {}", s.id(), e);
                    None
                }
            })
            .filter(|body| !body.is_empty())
            .collect();

        if fragments.is_empty() {
            slot.fallback().unwrap_or_default().to_string()
        } else {
            fragments.join("\n")
        }
    }
}

/// Single pass of `{{TOKEN}}` substitution; unknown tokens are left in place
pub fn substitute(template: &str, tokens: &BTreeMap<String, String>) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures| match tokens.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Remove any placeholder that survived substitution
pub fn scrub_placeholders(text: &str) -> String {
    LEFTOVER_PATTERN.replace_all(text, "").into_owned()
}
