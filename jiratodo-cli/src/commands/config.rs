//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use jiratodo_store::{default_config_dir, SettingsStore};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the Jira host (e.g. acme.atlassian.net).
    SetHost {
        /// Host name or base URL.
        host: String,
    },

    /// Set the account e-mail.
    SetEmail {
        /// Account e-mail.
        email: String,
    },

    /// Set the poll interval in seconds.
    SetInterval {
        /// Seconds between polls (minimum 10).
        seconds: u64,
    },

    /// Turn desktop notifications on or off.
    Notifications {
        /// on or off.
        state: Toggle,
    },

    /// Reset to defaults.
    Reset,
}

/// On/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await,
        ConfigAction::Path => show_paths(cli, store),
        ConfigAction::SetHost { host } => {
            store.set_jira_host(host.trim()).await;
            save(store, "Jira host", host).await
        }
        ConfigAction::SetEmail { email } => {
            store.set_account_email(email.trim()).await;
            save(store, "Account", email).await
        }
        ConfigAction::SetInterval { seconds } => {
            store.set_poll_interval_secs(*seconds).await?;
            save(store, "Poll interval", &format!("{seconds}s")).await
        }
        ConfigAction::Notifications { state } => {
            let enabled = *state == Toggle::On;
            store.set_notifications_enabled(enabled).await;
            save(store, "Notifications", if enabled { "on" } else { "off" }).await
        }
        ConfigAction::Reset => reset_config(store).await,
    }
}

async fn save(store: &SettingsStore, label: &str, value: &str) -> Result<()> {
    store.save().await?;
    info!(setting = label, value, "Setting updated");
    println!("{label} set to: {value}");
    Ok(())
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let mut settings = store.get().await;
    if settings.token_override.is_some() {
        settings.token_override = Some("********".to_string());
    }

    match cli.format {
        OutputFormat::Text => {
            let or_unset = |s: &str| {
                if s.is_empty() {
                    "(not set)".to_string()
                } else {
                    s.to_string()
                }
            };

            println!("JiraTodo Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Jira host:     {}", or_unset(&settings.jira_host));
            println!("Account:       {}", or_unset(&settings.account_email));
            println!("Token file:    {}", settings.token_file_path().display());
            if settings.token_override.is_some() {
                println!("Token:         set in settings file");
            }
            println!("Poll interval: {}s", settings.poll_interval().as_secs());
            println!("Timeout:       {}s", settings.request_timeout().as_secs());
            println!("Notifications: {}", settings.notifications_enabled);
            println!("Log level:     {}", settings.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["jiratodo", "config", "set-interval", "120"]).unwrap();
        match cli.command {
            Some(crate::Commands::Config(ConfigArgs {
                action: ConfigAction::SetInterval { seconds },
            })) => assert_eq!(seconds, 120),
            _ => panic!("expected set-interval"),
        }

        let cli = Cli::try_parse_from(["jiratodo", "config", "notifications", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(crate::Commands::Config(ConfigArgs {
                action: ConfigAction::Notifications { state: Toggle::Off },
            }))
        ));
    }

    #[tokio::test]
    async fn test_set_host_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let cli = Cli::try_parse_from(["jiratodo", "config", "set-host", "acme.atlassian.net"]).unwrap();
        let store = SettingsStore::load(path.clone()).await.unwrap();

        let Some(crate::Commands::Config(args)) = &cli.command else {
            panic!("expected config command");
        };
        run(args, &cli, &store).await.unwrap();

        let reloaded = SettingsStore::load(path).await.unwrap();
        assert_eq!(reloaded.get().await.jira_host, "acme.atlassian.net");
    }

    #[tokio::test]
    async fn test_interval_below_minimum_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["jiratodo", "config", "set-interval", "3"]).unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();

        let Some(crate::Commands::Config(args)) = &cli.command else {
            panic!("expected config command");
        };
        assert!(run(args, &cli, &store).await.is_err());
        assert!(!dir.path().join("settings.json").exists());
    }
}
