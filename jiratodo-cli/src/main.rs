// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! JiraTodo CLI - open Jira issues assigned to you, from the terminal.
//!
//! # Examples
//!
//! ```bash
//! # One-time setup
//! jiratodo config set-host acme.atlassian.net
//! jiratodo config set-email me@acme.io
//! echo "<api token>" > ~/.jira_token
//!
//! # Keep polling and notify on changes (default)
//! jiratodo
//!
//! # Print the current list once
//! jiratodo issues --format json --pretty
//!
//! # Verify host, account and token
//! jiratodo check
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use jiratodo_store::{default_settings_path, LogLevel, SettingsStore, StoreError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, config, issues, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// JiraTodo CLI - open Jira issues assigned to you.
#[derive(Parser)]
#[command(name = "jiratodo")]
#[command(about = "Watch the open Jira issues assigned to you")]
#[command(long_about = r#"
JiraTodo polls Jira Cloud for unresolved issues assigned to your account
and shows a desktop notification when that set changes.

The API token is read from JIRATODO_API_TOKEN, the settings file, or
~/.jira_token (in that order).

Examples:
  jiratodo                          # Watch (default)
  jiratodo issues                   # Print the list once
  jiratodo issues --format json     # JSON output
  jiratodo check                    # Verify configuration
  jiratodo config set-host acme.atlassian.net
"#)]
#[command(version)]
#[command(author = "JiraTodo Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'watch' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Jira host for this run (overrides settings).
    #[arg(long, global = true, env = "JIRATODO_HOST")]
    pub host: Option<String>,

    /// Account e-mail for this run (overrides settings).
    #[arg(long, global = true, env = "JIRATODO_EMAIL")]
    pub email: Option<String>,

    /// Token file for this run (overrides settings).
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Settings file to use instead of the default.
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Returns the settings file path in effect.
    pub fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_path)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Poll continuously and notify on changes (default).
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Fetch and print the assigned open issues once.
    #[command(visible_alias = "i")]
    Issues,

    /// Check configuration, token and connectivity.
    Check,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Host or account not configured.
    NotConfigured = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, default_level: &str) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("jiratodo=debug,info")
        } else {
            EnvFilter::new(format!("jiratodo={default_level}"))
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Default log level for a command: the configured level while watching,
/// warnings only for one-shot commands.
fn default_level(command: Option<&Commands>, configured: LogLevel) -> String {
    match command {
        None | Some(Commands::Watch(_)) => configured.to_string(),
        Some(_) => LogLevel::Warn.to_string(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = SettingsStore::load(cli.settings_path()).await?;
    let configured_level = store.get().await.log_level;
    setup_logging(
        cli.verbose,
        cli.quiet,
        &default_level(cli.command.as_ref(), configured_level),
    );

    let result = match &cli.command {
        Some(Commands::Watch(args)) => watch::run(args, &cli, &store).await,
        Some(Commands::Issues) => issues::run(&cli, &store).await,
        Some(Commands::Check) => check::run(&cli, &store).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
        None => {
            // Default to watch command
            watch::run(&watch::WatchArgs::default(), &cli, &store).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        let code = match e.downcast_ref::<StoreError>() {
            Some(StoreError::Config(_)) => ExitCode::NotConfigured,
            _ => ExitCode::Error,
        };
        std::process::exit(code as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_watch() {
        let cli = Cli::try_parse_from(["jiratodo"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(default_level(cli.command.as_ref(), LogLevel::Info), "info");
    }

    #[test]
    fn test_one_shot_commands_log_warnings() {
        let cli = Cli::try_parse_from(["jiratodo", "issues", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Issues)));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(default_level(cli.command.as_ref(), LogLevel::Debug), "warn");
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "jiratodo",
            "check",
            "--host",
            "acme.atlassian.net",
            "--token-file",
            "/tmp/tok",
        ])
        .unwrap();
        assert_eq!(cli.host.as_deref(), Some("acme.atlassian.net"));
        assert_eq!(cli.token_file, Some(PathBuf::from("/tmp/tok")));
    }
}
