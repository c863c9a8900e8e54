//! Change detection between consecutive polls.
//!
//! Only membership counts: an issue whose summary or status changed is still
//! the same issue. Ordering is ignored.

use std::collections::BTreeSet;

use crate::models::{IssueKey, IssueRecord};

/// Returns true iff the key sets of `previous` and `current` differ.
pub fn has_changed(previous: &[IssueRecord], current: &[IssueRecord]) -> bool {
    key_set(previous) != key_set(current)
}

fn key_set(issues: &[IssueRecord]) -> BTreeSet<&IssueKey> {
    issues.iter().map(|issue| &issue.key).collect()
}

/// Keys added and removed between two polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDiff {
    /// Keys present now but not before, sorted.
    pub added: Vec<IssueKey>,
    /// Keys present before but not now, sorted.
    pub removed: Vec<IssueKey>,
}

impl IssueDiff {
    /// Computes the membership difference.
    pub fn between(previous: &[IssueRecord], current: &[IssueRecord]) -> Self {
        let before = key_set(previous);
        let after = key_set(current);

        Self {
            added: after.difference(&before).map(|k| (*k).clone()).collect(),
            removed: before.difference(&after).map(|k| (*k).clone()).collect(),
        }
    }

    /// Returns true if membership did not change.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
