//! Domain models for JiraTodo.
//!
//! ## Submodules
//!
//! - [`issue`] - Issue records and keys
//! - [`snapshot`] - Published poll state (snapshot, poll record, trigger)

mod issue;
mod snapshot;

pub use issue::{site_base_url, IssueKey, IssueRecord, CLOUD_DOMAIN};
pub use snapshot::{IssueSnapshot, PollOutcome, PollRecord, RefreshTrigger};
#[cfg(test)]
mod serde_tests;
