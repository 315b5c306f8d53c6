//! @acp:module "Version History"
//! @acp:summary "Snapshots, diffs and rollback of generated documents"
//! @acp:domain history
//! @acp:layer feature

pub mod diff;
pub mod store;
pub mod types;

pub use diff::{diff_bodies, lcs_diff, positional_diff, strip_markup, to_plain_text};
pub use store::{VersionState, VersionStore};
pub use types::*;
