//! Jira API token lookup.
//!
//! Tokens come from exactly one place, checked in this order:
//!
//! 1. **Override** - a configured value (settings file or `JIRATODO_API_TOKEN`)
//! 2. **Token file** - the trimmed contents of `~/.jira_token` by default

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::source::CredentialSource;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable that overrides the configured token.
pub const TOKEN_ENV: &str = "JIRATODO_API_TOKEN";

/// Default token file name in the home directory.
const TOKEN_FILE_NAME: &str = ".jira_token";

/// Returns the default token file path (`~/.jira_token`).
pub fn default_token_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(TOKEN_FILE_NAME)
}

// ============================================================================
// Credential
// ============================================================================

/// An API token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ============================================================================
// Token Store
// ============================================================================

/// Resolves the Jira API token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    token_override: Option<String>,
    token_file: PathBuf,
}

impl TokenStore {
    /// Creates a store that reads `token_file` unless `token_override` is set.
    pub fn new(token_override: Option<String>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            token_override,
            token_file: token_file.into(),
        }
    }

    /// Creates a store with no override reading the default token file.
    pub fn from_default_file() -> Self {
        Self::new(None, default_token_file())
    }

    /// Replaces the override with `JIRATODO_API_TOKEN` when that is set and non-empty.
    pub fn with_env_override(mut self) -> Self {
        if let Some(token) = Self::load_from_env() {
            self.token_override = Some(token);
        }
        self
    }

    /// Loads the token from the environment.
    pub fn load_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty())
    }

    /// Resolves the token.
    ///
    /// Returns `None` when no override is configured and the file is missing,
    /// unreadable or blank.
    #[instrument(skip(self), fields(file = %self.token_file.display()))]
    pub async fn load(&self) -> Option<Credential> {
        if let Some(token) = self.token_override.as_deref().filter(|t| !t.is_empty()) {
            debug!(source = "override", "Resolved Jira token");
            return Some(Credential::new(token));
        }

        match tokio::fs::read_to_string(&self.token_file).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    debug!("Token file is empty");
                    None
                } else {
                    debug!(source = "file", "Resolved Jira token");
                    Some(Credential::new(token))
                }
            }
            Err(e) => {
                debug!(error = %e, "Token file not readable");
                None
            }
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::from_default_file()
    }
}

#[async_trait]
impl CredentialSource for TokenStore {
    async fn resolve(&self) -> Option<Credential> {
        self.load().await
    }
}

// ============================================================================
// Tests
// ============================================================================
