//! @acp:module "Content Catalog"
//! @acp:summary "Lookup of base templates and section fragments"
//! @acp:domain documents
//! @acp:layer io
//!
//! Legal prose lives outside the crate. A catalog maps a document type to its
//! base template and a section id to its HTML fragment. Layout of a
//! [`DirectoryCatalog`]:
//!
//! ```text
//! content/
//!   templates/privacy_policy.html
//!   sections/pp_gdpr_rights.html
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PolicyError, Result};

use super::types::DocumentType;

/// Source of templates and section fragments
pub trait ContentCatalog {
    /// Base template with `{{TOKEN}}` placeholders
    fn template(&self, document_type: DocumentType) -> Result<String>;

    /// Rendered HTML fragment for a section
    fn section(&self, section_id: &str) -> Result<String>;
}

impl<C: ContentCatalog + ?Sized> ContentCatalog for &C {
    fn template(&self, document_type: DocumentType) -> Result<String> {
        (**self).template(document_type)
    }

    fn section(&self, section_id: &str) -> Result<String> {
        (**self).section(section_id)
    }
}

/// Filesystem catalog rooted at a content directory
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: PathBuf, resource: String) -> Result<String> {
        std::fs::read_to_string(&path)
            .map_err(|e| PolicyError::content(resource, format!("{}: {}", path.display(), e)))
    }
}

impl ContentCatalog for DirectoryCatalog {
    fn template(&self, document_type: DocumentType) -> Result<String> {
        let path = self
            .root
            .join("templates")
            .join(format!("{}.html", document_type.as_str()));
        self.read(path, format!("template '{}'", document_type))
    }

    fn section(&self, section_id: &str) -> Result<String> {
        if section_id.is_empty()
            || !section_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(PolicyError::content(
                format!("section '{}'", section_id),
                "invalid section id",
            ));
        }
        let path = self.root.join("sections").join(format!("{}.html", section_id));
        self.read(path, format!("section '{}'", section_id))
    }
}

/// In-memory catalog, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    templates: HashMap<DocumentType, String>,
    sections: HashMap<String, String>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, document_type: DocumentType, template: impl Into<String>) -> Self {
        self.templates.insert(document_type, template.into());
        self
    }

    pub fn with_section(mut self, id: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.insert(id.into(), body.into());
        self
    }
}

impl ContentCatalog for MemoryCatalog {
    fn template(&self, document_type: DocumentType) -> Result<String> {
        self.templates
            .get(&document_type)
            .cloned()
            .ok_or_else(|| PolicyError::content(format!("template '{}'", document_type), "not in catalog"))
    }

    fn section(&self, section_id: &str) -> Result<String> {
        self.sections
            .get(section_id)
            .cloned()
            .ok_or_else(|| PolicyError::content(format!("section '{}'", section_id), "not in catalog"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_catalog_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("templates")).unwrap();
        std::fs::create_dir_all(dir.path().join("sections")).unwrap();
        std::fs::write(dir.path().join("templates/cookie_policy.html"), "<h1>{{SITE_NAME}}</h1>").unwrap();
        std::fs::write(dir.path().join("sections/cp_contact.html"), "<p>Contact</p>").unwrap();

        let catalog = DirectoryCatalog::new(dir.path());
        assert_eq!(
            catalog.template(DocumentType::CookiePolicy).unwrap(),
            "<h1>{{SITE_NAME}}</h1>"
        );
        assert_eq!(catalog.section("cp_contact").unwrap(), "<p>Contact</p>");
    }

    #[test]
    fn test_directory_catalog_missing_is_content_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::new(dir.path());
        assert!(matches!(
            catalog.template(DocumentType::PrivacyPolicy),
            Err(PolicyError::ContentLoad { .. })
        ));
    }

    #[test]
    fn test_directory_catalog_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryCatalog::new(dir.path()).section("../secret").is_err());
    }
}
