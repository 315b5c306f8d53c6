//! @acp:module "Documents"
//! @acp:summary "Section resolution and template composition for generated documents"
//! @acp:domain documents
//! @acp:layer feature

pub mod composer;
pub mod content;
pub mod resolver;
pub mod sections;
pub mod types;

pub use composer::{scrub_placeholders, substitute, Composer, SiteProfile};
pub use content::{ContentCatalog, DirectoryCatalog, MemoryCatalog};
pub use resolver::{resolve, resolve_ids, ResolvedSection};
pub use sections::{sections_for, slots_for, Predicate, SectionBasis, SectionRule, Slot};
pub use types::{DocumentType, GeneratedDocument};
