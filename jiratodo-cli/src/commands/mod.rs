//! CLI command implementations.

pub mod check;
pub mod config;
pub mod issues;
pub mod watch;

use jiratodo_fetch::TokenStore;
use jiratodo_store::{Settings, SettingsStore};

use crate::Cli;

/// Returns the stored settings with per-invocation flags applied.
pub async fn effective_settings(cli: &Cli, store: &SettingsStore) -> Settings {
    apply_overrides(store.get().await, cli)
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(host) = &cli.host {
        settings.jira_host.clone_from(host);
    }
    if let Some(email) = &cli.email {
        settings.account_email.clone_from(email);
    }
    if let Some(file) = &cli.token_file {
        settings.token_file = Some(file.clone());
    }
    settings
}

/// Describes where the API token will be read from.
pub fn token_origin(settings: &Settings) -> String {
    if TokenStore::load_from_env().is_some() {
        format!("${}", jiratodo_fetch::TOKEN_ENV)
    } else if settings
        .token_override
        .as_deref()
        .is_some_and(|t| !t.is_empty())
    {
        "settings file".to_string()
    } else {
        settings.token_file_path().display().to_string()
    }
}
