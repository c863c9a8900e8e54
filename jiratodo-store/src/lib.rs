// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # JiraTodo Store
//!
//! State management for the JiraTodo agent.
//!
//! This crate provides:
//!
//! - **IssueStore**: The published issue list and loading flag, observable via watch channels
//! - **SettingsStore**: User preferences with persistence
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use jiratodo_store::{default_settings_path, IssueStore, SettingsStore};
//!
//! let settings = SettingsStore::load(default_settings_path()).await?;
//! let store = IssueStore::new();
//!
//! let mut reader = store.reader();
//! while let Ok(snapshot) = reader.changed().await {
//!     println!("{} open issues", snapshot.open_count());
//! }
//! ```

pub mod error;
pub mod issue_store;
pub mod persistence;
pub mod settings_store;

pub use error::StoreError;
pub use issue_store::{IssueStore, IssueStoreReader};
pub use persistence::{default_config_dir, default_settings_path, ensure_dir, load_json, save_json};
pub use settings_store::{
    LogLevel, Settings, SettingsStore, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    MIN_POLL_INTERVAL_SECS,
};

#[cfg(test)]
mod persistence_tests;
