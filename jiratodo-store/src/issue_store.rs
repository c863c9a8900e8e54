//! Observable issue state.
//!
//! [`IssueStore`] is the single writer; the poll loop owns it. Any number of
//! [`IssueStoreReader`]s observe the published [`IssueSnapshot`] through a
//! watch channel and always see a complete list.

use chrono::Utc;
use jiratodo_core::{IssueRecord, IssueSnapshot, PollRecord};
use tokio::sync::watch;
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Issue Store
// ============================================================================

/// Writer side of the published issue state.
pub struct IssueStore {
    tx: watch::Sender<IssueSnapshot>,
}

impl Default for IssueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueStore {
    /// Creates a store holding an empty, idle snapshot.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(IssueSnapshot::new());
        Self { tx }
    }

    /// Returns a new reader.
    pub fn reader(&self) -> IssueStoreReader {
        IssueStoreReader {
            rx: self.tx.subscribe(),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> IssueSnapshot {
        self.tx.borrow().clone()
    }

    /// Returns a copy of the current issue list.
    pub fn issues(&self) -> Vec<IssueRecord> {
        self.tx.borrow().issues.clone()
    }

    /// Marks a poll as started.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RefreshInProgress`] if a poll is already running.
    pub fn begin_poll(&self) -> Result<(), StoreError> {
        let mut started = false;
        self.tx.send_if_modified(|snapshot| {
            if snapshot.loading {
                return false;
            }
            snapshot.loading = true;
            started = true;
            true
        });

        if started {
            debug!("Poll started");
            Ok(())
        } else {
            Err(StoreError::RefreshInProgress)
        }
    }

    /// Marks the running poll as finished and publishes the result.
    ///
    /// `issues` replaces the whole list when present; `None` keeps the
    /// previous list untouched.
    pub fn finish_poll(&self, record: PollRecord, issues: Option<Vec<IssueRecord>>) {
        self.tx.send_modify(|snapshot| {
            if let Some(issues) = issues {
                snapshot.issues = issues;
                snapshot.updated_at = Some(Utc::now());
            }
            snapshot.loading = false;
            snapshot.last_poll = Some(record);
            snapshot.poll_count += 1;
        });
        debug!("Poll finished");
    }
}

// ============================================================================
// Issue Store Reader
// ============================================================================

/// Read-only handle to the published issue state.
#[derive(Debug, Clone)]
pub struct IssueStoreReader {
    rx: watch::Receiver<IssueSnapshot>,
}

impl IssueStoreReader {
    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> IssueSnapshot {
        self.rx.borrow().clone()
    }

    /// Returns true while a poll is in flight.
    pub fn is_loading(&self) -> bool {
        self.rx.borrow().loading
    }

    /// Waits for the next published change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] once the writer is dropped.
    pub async fn changed(&mut self) -> Result<IssueSnapshot, StoreError> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Waits until a snapshot satisfies `predicate`, checking the current one first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] once the writer is dropped.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Result<IssueSnapshot, StoreError>
    where
        F: FnMut(&IssueSnapshot) -> bool,
    {
        let snapshot = self
            .rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(snapshot.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
