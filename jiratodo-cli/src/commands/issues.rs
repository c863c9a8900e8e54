//! Issues command - fetch and print the list once.

use anyhow::{Context, Result};
use chrono::Utc;
use jiratodo_fetch::JiraClient;
use jiratodo_store::SettingsStore;
use tracing::info;

use crate::commands::{effective_settings, token_origin};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the issues command.
pub async fn run(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = effective_settings(cli, store).await;
    let client = JiraClient::new(settings.client_config()?)?;

    let credential = settings.token_store().load().await.with_context(|| {
        format!(
            "No API token found (looked in {}); set ${} or write the token to that file",
            token_origin(&settings),
            jiratodo_fetch::TOKEN_ENV
        )
    })?;

    info!(host = %settings.jira_host, "Fetching assigned issues");
    let issues = client
        .search_assigned(&credential)
        .await
        .context("Failed to fetch issues")?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_issues(&issues, &settings.jira_host));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_issues(&issues, &settings.jira_host, Utc::now())?
            );
        }
    }

    Ok(())
}
