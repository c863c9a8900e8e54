//! Seams between the polling loop and the outside world.
//!
//! The orchestrator only talks to these traits, so tests can swap in stubs
//! for the token file and the Jira API.

use async_trait::async_trait;
use jiratodo_core::IssueRecord;

use crate::credentials::Credential;
use crate::error::FetchError;

/// Something that can produce an API token.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Resolves the token, or `None` if none is available.
    ///
    /// Failures are reported once per call; implementations do not retry.
    async fn resolve(&self) -> Option<Credential>;
}

/// Something that can list the open issues assigned to the account.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches the current issue list.
    ///
    /// Decoding is all-or-nothing: either every issue in the response is
    /// returned or the call fails.
    async fn fetch(&self, credential: &Credential) -> Result<Vec<IssueRecord>, FetchError>;
}
