//! Published poll state.
//!
//! - [`IssueSnapshot`] - Immutable view of the issue list and loading flag
//! - [`PollRecord`] - What happened during the most recent poll
//! - [`RefreshTrigger`] - Why a poll was started

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::issue::IssueRecord;

// ============================================================================
// Refresh Trigger
// ============================================================================

/// Source of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    /// First poll after the agent starts.
    Startup,
    /// Fixed-interval timer tick.
    Interval,
    /// Host reported that the application became active.
    Foreground,
    /// User asked for a refresh.
    Manual,
}

impl RefreshTrigger {
    /// Returns a short label for logs and output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Interval => "interval",
            Self::Foreground => "foreground",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Poll Record
// ============================================================================

/// Result of a finished poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PollOutcome {
    /// Issues were fetched and the list was replaced.
    Updated {
        /// Whether the set of issue keys changed.
        changed: bool,
    },
    /// No credential was available; nothing was fetched.
    NoCredential,
    /// The fetch failed; the list was left untouched.
    Failed {
        /// Error description.
        message: String,
    },
}

/// Bookkeeping for one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRecord {
    /// What started the poll.
    pub trigger: RefreshTrigger,
    /// When the poll started.
    pub started_at: DateTime<Utc>,
    /// When the poll finished.
    pub finished_at: DateTime<Utc>,
    /// How it ended.
    pub outcome: PollOutcome,
}

// ============================================================================
// Issue Snapshot
// ============================================================================

/// Immutable snapshot of the agent's published state.
///
/// Readers always see a consistent issue list: it is replaced as a whole
/// when a poll succeeds and never modified in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Issues from the last successful poll, in server order.
    pub issues: Vec<IssueRecord>,
    /// True while a fetch is in flight.
    pub loading: bool,
    /// When `issues` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
    /// The most recent finished poll.
    pub last_poll: Option<PollRecord>,
    /// Number of finished polls, whatever their outcome.
    #[serde(default)]
    pub poll_count: u64,
}

impl IssueSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of open issues.
    pub fn open_count(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if at least one poll has succeeded.
    pub fn has_data(&self) -> bool {
        self.updated_at.is_some()
    }
}
