//! Jira search response parser.

use jiratodo_core::IssueRecord;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    key: String,
    fields: RawFields,
}

#[derive(Debug, Deserialize)]
struct RawFields {
    summary: String,
    status: RawStatus,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    name: String,
}

/// Parses a `/rest/api/3/search` body into issue records.
///
/// Every item must carry `key`, `fields.summary` and `fields.status.name`,
/// and every key must be a valid issue key; otherwise the whole response is
/// rejected.
pub fn parse_search_response(body: &str) -> Result<Vec<IssueRecord>, FetchError> {
    debug!(len = body.len(), "Parsing Jira search response");

    let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to parse search response");
        FetchError::Decode(format!("JSON error: {e}"))
    })?;

    response
        .issues
        .into_iter()
        .map(|raw| {
            IssueRecord::new(raw.key, raw.fields.summary, raw.fields.status.name)
                .map_err(|e| FetchError::Decode(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let json = r#"{
            "expand": "names,schema",
            "startAt": 0,
            "maxResults": 20,
            "total": 2,
            "issues": [
                {"id": "10001", "key": "PROJ-2", "fields": {"summary": "Second", "status": {"name": "In Progress", "id": "3"}}},
                {"id": "10000", "key": "PROJ-1", "fields": {"summary": "First", "status": {"name": "To Do"}}}
            ]
        }"#;

        let issues = parse_search_response(json).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].key.as_str(), "PROJ-2");
        assert_eq!(issues[0].status, "In Progress");
        assert_eq!(issues[1].summary, "First");
    }

    #[test]
    fn test_parse_empty_list() {
        let issues = parse_search_response(r#"{"issues": []}"#).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_missing_status_name_fails_whole_response() {
        let json = r#"{"issues": [
            {"key": "PROJ-1", "fields": {"summary": "ok", "status": {"name": "To Do"}}},
            {"key": "PROJ-2", "fields": {"summary": "broken", "status": {}}}
        ]}"#;

        assert!(matches!(parse_search_response(json), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_missing_issues_field() {
        assert!(matches!(
            parse_search_response(r#"{"errorMessages": ["nope"]}"#),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_null_summary_rejected() {
        let json = r#"{"issues": [{"key": "PROJ-1", "fields": {"summary": null, "status": {"name": "To Do"}}}]}"#;
        assert!(parse_search_response(json).is_err());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let json = r#"{"issues": [{"key": "PROJ 1", "fields": {"summary": "x", "status": {"name": "To Do"}}}]}"#;
        assert!(matches!(parse_search_response(json), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_not_json() {
        assert!(parse_search_response("<html>Service Unavailable</html>").is_err());
    }
}
