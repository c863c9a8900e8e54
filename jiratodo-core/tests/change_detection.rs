//! Integration tests for membership-based change detection.

use jiratodo_core::{has_changed, IssueDiff, IssueRecord};

fn issue(key: &str, summary: &str, status: &str) -> IssueRecord {
    IssueRecord::new(key, summary, status).unwrap()
}

fn keys(keys: &[&str]) -> Vec<IssueRecord> {
    keys.iter().map(|k| issue(k, "Summary", "To Do")).collect()
}

#[test]
fn test_summary_and_status_edits_are_not_changes() {
    let before = vec![
        issue("PROJ-1", "Old title", "To Do"),
        issue("PROJ-2", "Another", "In Progress"),
    ];
    let after = vec![
        issue("PROJ-1", "New title", "In Progress"),
        issue("PROJ-2", "Another, reworded", "Lead Review"),
    ];

    assert!(!has_changed(&before, &after));
    assert!(IssueDiff::between(&before, &after).is_empty());
}

#[test]
fn test_added_key_is_a_change() {
    assert!(has_changed(&keys(&["A", "B"]), &keys(&["A", "B", "C"])));
}

#[test]
fn test_removed_key_is_a_change() {
    assert!(has_changed(&keys(&["A", "B", "C"]), &keys(&["A", "B"])));
}

#[test]
fn test_reordering_is_not_a_change() {
    assert!(!has_changed(&keys(&["A", "B"]), &keys(&["B", "A"])));
}

#[test]
fn test_swap_with_same_count_is_a_change() {
    let diff = IssueDiff::between(&keys(&["A", "B"]), &keys(&["A", "C"]));
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.removed.len(), 1);
    assert!(has_changed(&keys(&["A", "B"]), &keys(&["A", "C"])));
}
