//! Watch command - poll continuously and notify on changes.

use std::io::{stdout, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use jiratodo_agent::{AgentConfig, PollingAgent, SystemNotifier};
use jiratodo_core::IssueSnapshot;
use jiratodo_fetch::JiraClient;
use jiratodo_store::{Settings, SettingsStore};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::commands::effective_settings;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args, Default)]
pub struct WatchArgs {
    /// Refresh interval in seconds (overrides settings).
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Do not show desktop notifications.
    #[arg(long)]
    pub no_notify: bool,

    /// Do not clear the screen between updates.
    #[arg(long)]
    pub no_clear: bool,
}

impl WatchArgs {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(secs) = self.interval {
            settings.poll_interval_secs = secs;
        }
        if self.no_notify {
            settings.notifications_enabled = false;
        }
        settings
    }
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = args.apply(effective_settings(cli, store).await);
    let client = JiraClient::new(settings.client_config()?)?;
    let interval_secs = settings.poll_interval().as_secs();

    info!(
        host = %settings.jira_host,
        interval = interval_secs,
        "Starting watch mode"
    );

    let agent = PollingAgent::new(
        AgentConfig::from_settings(&settings),
        Arc::new(settings.token_store()),
        Arc::new(client),
        Arc::new(SystemNotifier::new(settings.notifications_enabled)),
    );
    let handle = agent.spawn();
    let mut reader = handle.reader();

    let mut renderer = Renderer {
        text: TextFormatter::new(!cli.no_color),
        json: JsonFormatter::new(cli.pretty),
        format: cli.format,
        clear: !args.no_clear && cli.format == OutputFormat::Text,
        host: settings.jira_host.clone(),
        interval_secs,
        last_poll_emitted: 0,
    };
    renderer.render(&reader.snapshot())?;

    let mut enter = spawn_stdin_reader();
    let mut stdin_open = true;
    let mut foreground = ForegroundSignal::new()?;

    loop {
        tokio::select! {
            changed = reader.changed() => {
                let Ok(snapshot) = changed else { break };
                renderer.render(&snapshot)?;
            }
            line = enter.recv(), if stdin_open => {
                if line.is_some() {
                    debug!("Manual refresh requested");
                    handle.refresh();
                } else {
                    // stdin closed (e.g. running under a service manager)
                    stdin_open = false;
                }
            }
            () = foreground.recv() => {
                debug!("Foreground signal received");
                handle.became_active();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown();
    Ok(())
}

/// Forwards each line on stdin as a refresh request.
///
/// Uses a plain thread: a blocking stdin read cannot be cancelled and would
/// otherwise hold up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

// ============================================================================
// Rendering
// ============================================================================

struct Renderer {
    text: TextFormatter,
    json: JsonFormatter,
    format: OutputFormat,
    clear: bool,
    host: String,
    interval_secs: u64,
    last_poll_emitted: u64,
}

impl Renderer {
    /// Returns true once for each newly finished poll seen by the reader.
    ///
    /// The snapshot channel keeps only the latest value, so polls finishing
    /// back to back may surface as a single document.
    fn take_new_poll(&mut self, snapshot: &IssueSnapshot) -> bool {
        if snapshot.poll_count > self.last_poll_emitted {
            self.last_poll_emitted = snapshot.poll_count;
            true
        } else {
            false
        }
    }

    fn render(&mut self, snapshot: &IssueSnapshot) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.clear {
                    // Clear screen
                    print!("\x1b[2J\x1b[H");
                }
                println!(
                    "{}",
                    self.text.format_watch(snapshot, &self.host, self.interval_secs)
                );
            }
            OutputFormat::Json => {
                if !self.take_new_poll(snapshot) {
                    return Ok(());
                }
                println!("{}", self.json.format_snapshot(snapshot, &self.host)?);
            }
        }
        stdout().flush()?;
        Ok(())
    }
}

// ============================================================================
// Foreground Signal
// ============================================================================

/// `SIGUSR1` reports that the application became active.
#[cfg(unix)]
struct ForegroundSignal(tokio::signal::unix::Signal);

#[cfg(unix)]
impl ForegroundSignal {
    fn new() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self(signal(SignalKind::user_defined1())?))
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct ForegroundSignal;

#[cfg(not(unix))]
impl ForegroundSignal {
    #[allow(clippy::unnecessary_wraps)]
    fn new() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
