//! User preferences store.
//!
//! Manages settings with persistence and change notification.

use jiratodo_fetch::{default_token_file, JiraClientConfig, TokenStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Shortest poll interval accepted.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Jira host (`acme.atlassian.net`) or base URL.
    pub jira_host: String,

    /// Account e-mail used for basic auth.
    pub account_email: String,

    /// Token file; `~/.jira_token` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    /// Token used instead of the token file when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_override: Option<String>,

    /// Seconds between timer-driven polls.
    pub poll_interval_secs: u64,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Show a desktop notification when the issue set changes.
    pub notifications_enabled: bool,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jira_host: String::new(),
            account_email: String::new(),
            token_file: None,
            token_override: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            notifications_enabled: true,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Returns true if host and account are set.
    pub fn is_configured(&self) -> bool {
        !self.jira_host.trim().is_empty() && !self.account_email.trim().is_empty()
    }

    /// Returns the poll interval, never shorter than [`MIN_POLL_INTERVAL_SECS`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Returns the token file path.
    pub fn token_file_path(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(default_token_file)
    }

    /// Builds the token store; `JIRATODO_API_TOKEN` beats the settings override.
    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(self.token_override.clone(), self.token_file_path()).with_env_override()
    }

    /// Builds the Jira client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if host or account is missing.
    pub fn client_config(&self) -> Result<JiraClientConfig, StoreError> {
        if !self.is_configured() {
            return Err(StoreError::Config(
                "jira_host and account_email must be set (see `jiratodo config`)".to_string(),
            ));
        }

        Ok(
            JiraClientConfig::new(self.jira_host.trim(), self.account_email.trim())
                .with_timeout(self.request_timeout()),
        )
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    Warn,
    /// Info level logging.
    #[default]
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Loads settings from a path, falling back to defaults.
    ///
    /// A missing file yields defaults; an unreadable or malformed file is
    /// logged and also yields defaults.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for callers that `?` it.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory; call [`save`](Self::save) to persist.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Sets the Jira host.
    pub async fn set_jira_host(&self, host: impl Into<String>) {
        let host = host.into();
        self.update(|s| s.jira_host = host).await;
    }

    /// Sets the account e-mail.
    pub async fn set_account_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.update(|s| s.account_email = email).await;
    }

    /// Sets the poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for intervals below the minimum.
    pub async fn set_poll_interval_secs(&self, secs: u64) -> Result<(), StoreError> {
        if secs < MIN_POLL_INTERVAL_SECS {
            return Err(StoreError::Config(format!(
                "poll interval must be at least {MIN_POLL_INTERVAL_SECS} seconds"
            )));
        }
        self.update(|s| s.poll_interval_secs = secs).await;
        Ok(())
    }

    /// Enables or disables desktop notifications.
    pub async fn set_notifications_enabled(&self, enabled: bool) {
        self.update(|s| s.notifications_enabled = enabled).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
