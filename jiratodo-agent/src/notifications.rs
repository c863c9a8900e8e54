//! New-activity notifications.
//!
//! Alerts the user when the set of assigned open issues changes.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{debug, info, warn};

/// Notification title.
pub const NOTIFICATION_TITLE: &str = "New activity";

// ============================================================================
// Notifier Port
// ============================================================================

/// Delivers user-facing alerts.
///
/// Implementations must not block: `notify` is fire-and-forget.
pub trait Notifier: Send + Sync {
    /// Asks the host for permission to show alerts.
    ///
    /// Called once when the agent starts. Returns whether alerts can be
    /// delivered; a denial is not an error.
    fn request_permission(&self) -> bool;

    /// Alerts the user that there are `count` open issues.
    fn notify(&self, count: usize);
}

// ============================================================================
// Notification Content
// ============================================================================

/// Title and body of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
}

impl NotificationContent {
    /// Builds the alert for `count` open issues.
    pub fn for_open_count(count: usize) -> Self {
        let body = if count == 1 {
            "You have 1 open task.".to_string()
        } else {
            format!("You have {count} open tasks.")
        };

        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body,
        }
    }
}

// ============================================================================
// System Notifier
// ============================================================================

#[cfg(target_os = "macos")]
const DELIVERY_TOOL: &str = "osascript";

#[cfg(not(target_os = "macos"))]
const DELIVERY_TOOL: &str = "notify-send";

/// Escapes a string for an AppleScript string literal.
fn escape_applescript(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

/// Returns the program arguments that display `content`.
pub fn delivery_args(content: &NotificationContent) -> Vec<String> {
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(&content.body),
            escape_applescript(&content.title)
        );
        vec!["-e".to_string(), script]
    } else {
        vec![
            "--app-name=jiratodo".to_string(),
            content.title.clone(),
            content.body.clone(),
        ]
    }
}

/// Desktop notifier backed by `osascript` (macOS) or `notify-send`.
///
/// Also rings the terminal bell to request attention.
#[derive(Debug)]
pub struct SystemNotifier {
    enabled: bool,
    tool: OnceLock<Option<PathBuf>>,
}

impl SystemNotifier {
    /// Creates a notifier; a disabled notifier does nothing.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            tool: OnceLock::new(),
        }
    }

    fn tool(&self) -> Option<&PathBuf> {
        self.tool
            .get_or_init(|| which::which(DELIVERY_TOOL).ok())
            .as_ref()
    }

    fn request_attention() {
        use std::io::{IsTerminal, Write};

        let mut stderr = std::io::stderr();
        if stderr.is_terminal() {
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }

    fn deliver(tool: &PathBuf, content: &NotificationContent) {
        let spawned = std::process::Command::new(tool)
            .args(delivery_args(content))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                // Reap in the background so the child does not linger.
                std::thread::spawn(move || {
                    if let Err(e) = child.wait() {
                        debug!(error = %e, "Notification process wait failed");
                    }
                });
            }
            Err(e) => {
                warn!(tool = %tool.display(), error = %e, "Failed to deliver notification");
            }
        }
    }
}

impl Default for SystemNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for SystemNotifier {
    fn request_permission(&self) -> bool {
        if !self.enabled {
            debug!("Notifications disabled");
            return false;
        }

        match self.tool() {
            Some(path) => {
                debug!(tool = %path.display(), "Notification tool found");
                true
            }
            None => {
                info!(tool = DELIVERY_TOOL, "Notification tool not found; alerts disabled");
                false
            }
        }
    }

    fn notify(&self, count: usize) {
        if !self.enabled {
            return;
        }

        Self::request_attention();

        let content = NotificationContent::for_open_count(count);
        info!(count, body = %content.body, "Sending notification");

        if let Some(tool) = self.tool() {
            Self::deliver(tool, &content);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_singular() {
        let content = NotificationContent::for_open_count(1);
        assert_eq!(content.title, "New activity");
        assert_eq!(content.body, "You have 1 open task.");
    }

    #[test]
    fn test_content_plural() {
        assert_eq!(
            NotificationContent::for_open_count(3).body,
            "You have 3 open tasks."
        );
        assert_eq!(
            NotificationContent::for_open_count(0).body,
            "You have 0 open tasks."
        );
    }

    #[test]
    fn test_escape_applescript() {
        assert_eq!(escape_applescript(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_applescript("a\nb"), "a b");
        assert_eq!(escape_applescript(r"c:\x"), r"c:\\x");
    }

    #[test]
    fn test_delivery_args_carry_content() {
        let content = NotificationContent::for_open_count(2);
        let args = delivery_args(&content);
        let joined = args.join(" ");
        assert!(joined.contains("New activity"));
        assert!(joined.contains("You have 2 open tasks."));
    }

    #[test]
    fn test_disabled_notifier_denies_permission() {
        let notifier = SystemNotifier::new(false);
        assert!(!notifier.request_permission());
        notifier.notify(5);
    }
}
