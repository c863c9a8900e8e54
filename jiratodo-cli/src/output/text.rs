//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use jiratodo_core::{IssueRecord, IssueSnapshot, PollOutcome};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Formats one issue, with its browse link on the next line.
    pub fn format_issue(&self, issue: &IssueRecord, host: &str) -> String {
        format!(
            "{:<12} {} {}\n{:<12} {}",
            self.bold(issue.key.as_str()),
            self.format_status(&issue.status),
            issue.summary,
            "",
            self.dim(&issue.browse_url(host))
        )
    }

    /// Formats a list of issues in server order.
    pub fn format_issues(&self, issues: &[IssueRecord], host: &str) -> String {
        if issues.is_empty() {
            return self.green("No open issues assigned to you.");
        }

        let mut lines = vec![self.bold(&open_count_label(issues.len()))];
        lines.push(String::new());
        lines.extend(issues.iter().map(|i| self.format_issue(i, host)));
        lines.join("\n")
    }

    /// Formats a workflow status as a bracketed, colored badge.
    fn format_status(&self, status: &str) -> String {
        let badge = format!("[{status}]");
        let lower = status.to_lowercase();

        if lower.contains("progress") || lower.contains("review") {
            self.yellow(&badge)
        } else if lower.contains("block") {
            self.red(&badge)
        } else {
            self.cyan(&badge)
        }
    }

    // ========================================================================
    // Watch
    // ========================================================================

    /// Formats the last poll result as a one-line status.
    pub fn format_poll_status(&self, snapshot: &IssueSnapshot) -> String {
        if snapshot.loading {
            return self.dim("Refreshing...");
        }

        let Some(poll) = &snapshot.last_poll else {
            return self.dim("Waiting for first refresh");
        };

        let at = format_local_time(poll.finished_at);
        match &poll.outcome {
            PollOutcome::Updated { changed: true } => {
                format!("{} at {}", self.green("Updated"), at)
            }
            PollOutcome::Updated { changed: false } => {
                format!("{} at {}", self.dim("No changes"), at)
            }
            PollOutcome::NoCredential => {
                format!("{} at {}", self.yellow("No API token found"), at)
            }
            PollOutcome::Failed { message } => {
                format!("{} at {}: {}", self.red("Refresh failed"), at, message)
            }
        }
    }

    /// Formats a full watch screen.
    pub fn format_watch(&self, snapshot: &IssueSnapshot, host: &str, interval_secs: u64) -> String {
        let mut lines = vec![
            format!(
                "JiraTodo - {} (refresh: {}s)",
                self.bold(host),
                interval_secs
            ),
            "─".repeat(50),
            String::new(),
        ];

        if snapshot.has_data() {
            lines.push(self.format_issues(&snapshot.issues, host));
        } else {
            lines.push(self.dim("No issues loaded yet."));
        }

        lines.push(String::new());
        lines.push(self.format_poll_status(snapshot));
        lines.push(self.dim("Press Enter to refresh, Ctrl+C to exit"));
        lines.join("\n")
    }

    // ========================================================================
    // Check
    // ========================================================================

    /// Formats one check result line.
    pub fn format_check(&self, label: &str, ok: bool, detail: &str) -> String {
        let mark = if ok { self.green("✓") } else { self.red("✗") };
        format!("{mark} {label:<14} {detail}")
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// "1 open issue" / "N open issues".
pub fn open_count_label(count: usize) -> String {
    if count == 1 {
        "1 open issue".to_string()
    } else {
        format!("{count} open issues")
    }
}

fn format_local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
