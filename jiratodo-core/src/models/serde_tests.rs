//! Serde tests for core types.
//!
//! The snapshot is handed to JSON front ends, so its wire shape matters.

use chrono::Utc;

use crate::{IssueRecord, IssueSnapshot, PollOutcome, PollRecord, RefreshTrigger};

#[test]
fn test_issue_record_wire_shape() {
    let issue = IssueRecord::new("PROJ-1", "Write docs", "In Progress").unwrap();
    let value = serde_json::to_value(&issue).unwrap();

    assert_eq!(value["key"], "PROJ-1");
    assert_eq!(value["summary"], "Write docs");
    assert_eq!(value["status"], "In Progress");
}

#[test]
fn test_refresh_trigger_snake_case() {
    let json = serde_json::to_string(&RefreshTrigger::Foreground).unwrap();
    assert_eq!(json, r#""foreground""#);

    let parsed: RefreshTrigger = serde_json::from_str(r#""manual""#).unwrap();
    assert_eq!(parsed, RefreshTrigger::Manual);
}

#[test]
fn test_poll_outcome_tagged() {
    let value = serde_json::to_value(PollOutcome::Updated { changed: true }).unwrap();
    assert_eq!(value["kind"], "updated");
    assert_eq!(value["changed"], true);

    let value = serde_json::to_value(PollOutcome::NoCredential).unwrap();
    assert_eq!(value["kind"], "no_credential");
}

#[test]
fn test_snapshot_json() {
    let now = Utc::now();
    let snapshot = IssueSnapshot {
        issues: vec![IssueRecord::new("PROJ-2", "Review", "Lead Review").unwrap()],
        loading: false,
        updated_at: Some(now),
        last_poll: Some(PollRecord {
            trigger: RefreshTrigger::Interval,
            started_at: now,
            finished_at: now,
            outcome: PollOutcome::Failed {
                message: "timed out".to_string(),
            },
        }),
        poll_count: 4,
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: IssueSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.open_count(), 1);
    assert!(parsed.has_data());
    assert_eq!(parsed.poll_count, 4);
    assert!(matches!(
        parsed.last_poll.unwrap().outcome,
        PollOutcome::Failed { .. }
    ));
}
