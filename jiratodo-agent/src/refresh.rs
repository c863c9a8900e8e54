//! Background polling.
//!
//! One task consumes [`RefreshTrigger`]s from a bounded channel and runs
//! at most one poll at a time. A second task feeds it interval ticks.
//! Triggers that arrive while a poll is in flight are discarded.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jiratodo_core::{IssueDiff, PollOutcome, PollRecord, RefreshTrigger};
use jiratodo_fetch::{CredentialSource, IssueSource};
use jiratodo_store::{IssueStore, IssueStoreReader, Settings, DEFAULT_POLL_INTERVAL_SECS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::notifications::Notifier;

/// Pending triggers kept while idle; extra triggers are dropped.
pub const DEFAULT_TRIGGER_CAPACITY: usize = 16;

// ============================================================================
// Agent Config
// ============================================================================

/// Polling configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Time between timer-driven polls.
    pub poll_interval: Duration,
    /// Trigger channel capacity.
    pub trigger_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            trigger_capacity: DEFAULT_TRIGGER_CAPACITY,
        }
    }
}

impl AgentConfig {
    /// Builds the config from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            ..Self::default()
        }
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ============================================================================
// Polling Agent
// ============================================================================

/// Polls the issue source and publishes results to an [`IssueStore`].
pub struct PollingAgent {
    config: AgentConfig,
    credentials: Arc<dyn CredentialSource>,
    source: Arc<dyn IssueSource>,
    notifier: Arc<dyn Notifier>,
    store: IssueStore,
}

impl PollingAgent {
    /// Creates an agent with an empty issue list.
    pub fn new(
        config: AgentConfig,
        credentials: Arc<dyn CredentialSource>,
        source: Arc<dyn IssueSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            credentials,
            source,
            notifier,
            store: IssueStore::new(),
        }
    }

    /// Starts polling and returns the control handle.
    ///
    /// Requests notification permission, queues the startup poll and starts
    /// the interval timer, whose first tick is one interval from now.
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> AgentHandle {
        let (trigger_tx, trigger_rx) = mpsc::channel(self.config.trigger_capacity.max(1));
        let reader = self.store.reader();
        let period = self.config.poll_interval;

        if !self.notifier.request_permission() {
            debug!("Notifications unavailable; polling continues without alerts");
        }

        // Fresh channel; cannot be full.
        let _ = trigger_tx.try_send(RefreshTrigger::Startup);

        let timer_task = tokio::spawn(run_timer(trigger_tx.clone(), period));
        let poll_task = tokio::spawn(self.run(trigger_rx));

        info!(interval_secs = period.as_secs(), "Polling agent started");

        AgentHandle {
            trigger_tx,
            reader,
            poll_task,
            timer_task,
        }
    }

    async fn run(self, mut triggers: mpsc::Receiver<RefreshTrigger>) {
        while let Some(trigger) = triggers.recv().await {
            self.poll(trigger, &mut triggers).await;
        }
        debug!("Trigger channel closed; polling stopped");
    }

    /// Runs one poll cycle.
    async fn poll(&self, trigger: RefreshTrigger, triggers: &mut mpsc::Receiver<RefreshTrigger>) {
        if self.store.begin_poll().is_err() {
            debug!(%trigger, "Poll already running; trigger ignored");
            return;
        }

        let started_at = Utc::now();
        debug!(%trigger, "Polling");

        let (outcome, issues) = match self.credentials.resolve().await {
            None => {
                debug!("No API token available; skipping poll");
                (PollOutcome::NoCredential, None)
            }
            Some(credential) => match self.source.fetch(&credential).await {
                Ok(issues) => {
                    let diff = IssueDiff::between(&self.store.issues(), &issues);
                    let changed = !diff.is_empty();
                    if changed {
                        info!(
                            count = issues.len(),
                            added = ?diff.added,
                            removed = ?diff.removed,
                            "Assigned issues changed"
                        );
                        self.notifier.notify(issues.len());
                    } else {
                        debug!(count = issues.len(), "Assigned issues unchanged");
                    }
                    (PollOutcome::Updated { changed }, Some(issues))
                }
                Err(e) => {
                    warn!(error = %e, transient = e.is_transient(), "Failed to fetch issues");
                    (
                        PollOutcome::Failed {
                            message: e.to_string(),
                        },
                        None,
                    )
                }
            },
        };

        let mut ignored = 0usize;
        while let Ok(late) = triggers.try_recv() {
            debug!(trigger = %late, "Trigger arrived during poll; ignored");
            ignored += 1;
        }
        if ignored > 0 {
            debug!(ignored, "Discarded triggers received while fetching");
        }

        let record = PollRecord {
            trigger,
            started_at,
            finished_at: Utc::now(),
            outcome,
        };
        self.store.finish_poll(record, issues);
    }
}

async fn run_timer(triggers: mpsc::Sender<RefreshTrigger>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match triggers.try_send(RefreshTrigger::Interval) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Trigger queue full; interval tick dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => break,
        }
    }
}

// ============================================================================
// Agent Handle
// ============================================================================

/// Control handle for a running [`PollingAgent`].
///
/// Dropping the handle stops the agent.
pub struct AgentHandle {
    trigger_tx: mpsc::Sender<RefreshTrigger>,
    reader: IssueStoreReader,
    poll_task: JoinHandle<()>,
    timer_task: JoinHandle<()>,
}

impl AgentHandle {
    /// Requests a poll. Returns false if the trigger was dropped.
    pub fn trigger(&self, trigger: RefreshTrigger) -> bool {
        match self.trigger_tx.try_send(trigger) {
            Ok(()) => true,
            Err(e) => {
                debug!(%trigger, error = %e, "Trigger dropped");
                false
            }
        }
    }

    /// Requests a manual refresh.
    pub fn refresh(&self) -> bool {
        self.trigger(RefreshTrigger::Manual)
    }

    /// Reports that the application became active.
    pub fn became_active(&self) -> bool {
        self.trigger(RefreshTrigger::Foreground)
    }

    /// Returns a reader for the published issue state.
    pub fn reader(&self) -> IssueStoreReader {
        self.reader.clone()
    }

    /// Stops the timer and the poll task. An in-flight fetch is abandoned.
    pub fn shutdown(self) {
        info!("Stopping polling agent");
        drop(self);
    }
}

impl Drop for AgentHandle {
    fn drop(&mut self) {
        self.timer_task.abort();
        self.poll_task.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            poll_interval_secs: 2,
            ..Settings::default()
        };
        let config = AgentConfig::from_settings(&settings);
        assert_eq!(config.poll_interval, settings.poll_interval());
        assert_eq!(config.trigger_capacity, DEFAULT_TRIGGER_CAPACITY);
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(AgentConfig::default().poll_interval, Duration::from_secs(300));
    }
}
