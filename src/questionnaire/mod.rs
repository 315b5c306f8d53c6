//! @acp:module "Questionnaire"
//! @acp:summary "Conditional questionnaire: catalog, visibility, sanitizing and completeness"
//! @acp:domain questionnaire
//! @acp:layer feature

pub mod catalog;
pub mod condition;
pub mod engine;
pub mod sanitize;
pub mod types;

pub use catalog::default_questions;
pub use condition::{evaluate, is_visible};
pub use engine::Questionnaire;
pub use sanitize::sanitize_answers;
pub use types::*;
