//! Check command - verify configuration, token and connectivity.

use anyhow::{bail, Result};
use jiratodo_agent::{Notifier, SystemNotifier};
use jiratodo_fetch::JiraClient;
use jiratodo_store::SettingsStore;

use crate::commands::{effective_settings, token_origin};
use crate::output::{CheckOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = effective_settings(cli, store).await;

    let mut report = CheckOutput {
        configured: settings.is_configured(),
        host: settings.jira_host.clone(),
        account: settings.account_email.clone(),
        token_source: token_origin(&settings),
        notifications: SystemNotifier::new(settings.notifications_enabled).request_permission(),
        ..CheckOutput::default()
    };

    let credential = settings.token_store().load().await;
    report.token_found = credential.is_some();

    if let (Some(credential), Ok(config)) = (credential, settings.client_config()) {
        let result = match JiraClient::new(config) {
            Ok(client) => client.search_assigned(&credential).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(issues) => {
                report.search_ok = Some(true);
                report.open_issues = Some(issues.len());
            }
            Err(e) => {
                report.search_ok = Some(false);
                report.error = Some(e.to_string());
            }
        }
    }

    match cli.format {
        OutputFormat::Text => print_text(&report, cli),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&report)?);
        }
    }

    if report.search_ok != Some(true) {
        bail!("check failed");
    }
    Ok(())
}

fn print_text(report: &CheckOutput, cli: &Cli) {
    let formatter = TextFormatter::new(!cli.no_color);

    let target = if report.configured {
        format!("{} as {}", report.host, report.account)
    } else {
        "set with `jiratodo config set-host` and `set-email`".to_string()
    };
    println!("{}", formatter.format_check("Jira account", report.configured, &target));

    let token = if report.token_found {
        report.token_source.clone()
    } else {
        format!("not found in {}", report.token_source)
    };
    println!("{}", formatter.format_check("API token", report.token_found, &token));

    let search = match (report.search_ok, report.open_issues, &report.error) {
        (Some(true), Some(count), _) => format!("ok, {count} open"),
        (Some(false), _, Some(error)) => error.clone(),
        _ => "skipped".to_string(),
    };
    println!(
        "{}",
        formatter.format_check("Search", report.search_ok == Some(true), &search)
    );

    let notify = if report.notifications {
        "available"
    } else {
        "unavailable or disabled"
    };
    println!("{}", formatter.format_check("Notifications", report.notifications, notify));
}
