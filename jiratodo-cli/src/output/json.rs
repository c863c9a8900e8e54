//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use jiratodo_core::{IssueRecord, IssueSnapshot, PollOutcome};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// A single issue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueOutput {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub url: String,
}

/// The issue list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesOutput {
    pub host: String,
    pub count: usize,
    pub issues: Vec<IssueOutput>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_poll: Option<PollOutput>,
}

/// Last poll summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOutput {
    pub trigger: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_datetime")]
    pub finished_at: DateTime<Utc>,
}

/// Check command report.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub configured: bool,
    pub host: String,
    pub account: String,
    pub token_found: bool,
    pub token_source: String,
    pub notifications: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a freshly fetched issue list.
    pub fn format_issues(
        &self,
        issues: &[IssueRecord],
        host: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<String> {
        let output = IssuesOutput {
            updated_at: Some(fetched_at),
            ..issues_output(issues, host)
        };
        self.format(&output)
    }

    /// Formats a published snapshot.
    pub fn format_snapshot(&self, snapshot: &IssueSnapshot, host: &str) -> Result<String> {
        self.format(&snapshot_output(snapshot, host))
    }
}

fn issues_output(issues: &[IssueRecord], host: &str) -> IssuesOutput {
    IssuesOutput {
        host: host.to_string(),
        count: issues.len(),
        issues: issues
            .iter()
            .map(|issue| IssueOutput {
                key: issue.key.to_string(),
                summary: issue.summary.clone(),
                status: issue.status.clone(),
                url: issue.browse_url(host),
            })
            .collect(),
        updated_at: None,
        last_poll: None,
    }
}

/// Converts a snapshot to output.
pub fn snapshot_output(snapshot: &IssueSnapshot, host: &str) -> IssuesOutput {
    let last_poll = snapshot.last_poll.as_ref().map(|poll| {
        let (outcome, error) = match &poll.outcome {
            PollOutcome::Updated { changed: true } => ("changed", None),
            PollOutcome::Updated { changed: false } => ("unchanged", None),
            PollOutcome::NoCredential => ("no_credential", None),
            PollOutcome::Failed { message } => ("failed", Some(message.clone())),
        };
        PollOutput {
            trigger: poll.trigger.to_string(),
            outcome: outcome.to_string(),
            error,
            finished_at: poll.finished_at,
        }
    });

    IssuesOutput {
        updated_at: snapshot.updated_at,
        last_poll,
        ..issues_output(&snapshot.issues, host)
    }
}
