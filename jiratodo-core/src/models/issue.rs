//! Issue types.
//!
//! - [`IssueRecord`] - One open issue assigned to the current account
//! - [`IssueKey`] - Validated issue identifier (e.g. `PROJ-123`)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Issue Key
// ============================================================================

/// A validated issue key.
///
/// Keys end up as the last path segment of `https://<host>/browse/<key>`, so
/// they must be non-empty and free of separators and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    /// Parses and validates a key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(CoreError::InvalidIssueKey(raw));
        }

        let bad_char = raw
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'));
        if bad_char || raw == "." || raw == ".." {
            return Err(CoreError::InvalidIssueKey(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl TryFrom<String> for IssueKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> Self {
        key.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Issue Record
// ============================================================================

/// An open issue as returned by the tracker.
///
/// Identity is the [`key`](Self::key): two records with the same key are the
/// same issue even when summary or status differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Stable issue identifier.
    pub key: IssueKey,
    /// Issue title.
    pub summary: String,
    /// Workflow status name (e.g. "In Progress").
    pub status: String,
}

impl IssueRecord {
    /// Creates a record from raw parts, validating the key.
    pub fn new(
        key: impl Into<String>,
        summary: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            key: IssueKey::parse(key)?,
            summary: summary.into(),
            status: status.into(),
        })
    }

    /// Returns the browser link for this issue on the given tracker host.
    ///
    /// `host` is resolved with [`site_base_url`].
    pub fn browse_url(&self, host: &str) -> String {
        format!("{}/browse/{}", site_base_url(host), self.key)
    }
}

// ============================================================================
// Site Host
// ============================================================================

/// Domain appended to bare Jira Cloud site names.
pub const CLOUD_DOMAIN: &str = "atlassian.net";

/// Resolves a configured host into a base URL without a trailing slash.
///
/// - `acme` becomes `https://acme.atlassian.net`
/// - `jira.acme.io` becomes `https://jira.acme.io`
/// - an explicit `http://` or `https://` base is kept as is
pub fn site_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        return host.to_string();
    }
    if host.is_empty() || host.contains('.') || host.contains(':') {
        format!("https://{host}")
    } else {
        format!("https://{host}.{CLOUD_DOMAIN}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for raw in ["PROJ-123", "JIRA-29139", "A-1"] {
            assert!(IssueKey::parse(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_invalid_keys() {
        for raw in ["", "PROJ 1", "a/b", "x?y", "x#y", "..", "PROJ-1\n"] {
            assert!(IssueKey::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }


    #[test]
    fn test_browse_url() {
        let issue = IssueRecord::new("PROJ-7", "Fix login", "To Do").unwrap();
        assert_eq!(
            issue.browse_url("acme.atlassian.net"),
            "https://acme.atlassian.net/browse/PROJ-7"
        );
        assert_eq!(
            issue.browse_url("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/browse/PROJ-7"
        );
    }

    #[test]
    fn test_bare_site_name_gets_cloud_domain() {
        let issue = IssueRecord::new("JIRA-29139", "Fix login", "To Do").unwrap();
        assert_eq!(
            issue.browse_url("ksa-motory"),
            "https://ksa-motory.atlassian.net/browse/JIRA-29139"
        );
        assert_eq!(site_base_url("ksa-motory/"), "https://ksa-motory.atlassian.net");
        assert_eq!(site_base_url("localhost:8080"), "https://localhost:8080");
        assert_eq!(site_base_url("jira.acme.io"), "https://jira.acme.io");
    }

    #[test]
    fn test_key_deserialize_rejects_invalid() {
        let result: Result<IssueKey, _> = serde_json::from_str(r#""has space""#);
        assert!(result.is_err());
    }
}
