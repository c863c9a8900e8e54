//! Persistence round-trip and edge case tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{ensure_dir, load_json, save_json};
use crate::settings_store::{LogLevel, Settings, SettingsStore};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_settings_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        jira_host: "acme.atlassian.net".to_string(),
        account_email: "me@acme.io".to_string(),
        token_file: Some(temp_dir.path().join("token")),
        poll_interval_secs: 120,
        notifications_enabled: false,
        log_level: LogLevel::Debug,
        ..Settings::default()
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("settings.json");

    save_json(&nested_path, &serde_json::json!({"key": "value"}))
        .await
        .unwrap();
    assert!(nested_path.exists());
    assert!(!nested_path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let result: Result<Settings, _> =
        load_json(&PathBuf::from("/nonexistent/path/settings.json")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_ensure_dir_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("config");

    ensure_dir(&dir).await.unwrap();
    ensure_dir(&dir).await.unwrap();
    assert!(dir.is_dir());
}

// ============================================================================
// Partial and Malformed Files
// ============================================================================

#[test]
fn test_partial_settings_use_defaults() {
    let settings: Settings =
        serde_json::from_str(r#"{"jira_host": "acme.atlassian.net"}"#).unwrap();

    assert_eq!(settings.jira_host, "acme.atlassian.net");
    assert_eq!(settings.poll_interval_secs, 300);
    assert!(settings.notifications_enabled);
    assert_eq!(settings.log_level, LogLevel::Info);
}

#[test]
fn test_token_override_not_serialized_when_unset() {
    let json = serde_json::to_string(&Settings::default()).unwrap();
    assert!(!json.contains("token_override"));
    assert!(!json.contains("token_file"));
}

#[tokio::test]
async fn test_malformed_file_loads_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{ not json").await.unwrap();

    let store = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

#[tokio::test]
async fn test_store_save_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(file_path.clone()).await.unwrap();
    store.set_jira_host("acme.atlassian.net").await;
    store.set_account_email("me@acme.io").await;
    store.set_notifications_enabled(false).await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await.unwrap().get().await;
    assert_eq!(reloaded.jira_host, "acme.atlassian.net");
    assert_eq!(reloaded.account_email, "me@acme.io");
    assert!(!reloaded.notifications_enabled);
    assert!(reloaded.is_configured());
}
