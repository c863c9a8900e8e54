// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `JiraTodo` Core
//!
//! Core types and change detection for the `JiraTodo` agent.
//!
//! This crate provides the foundational abstractions used across all other
//! `JiraTodo` crates:
//!
//! - Domain models (issues, published snapshots, refresh triggers)
//! - Membership-based change detection
//! - Error types
//!
//! ## Key Types
//!
//! - [`IssueRecord`] - One open issue (key, summary, status)
//! - [`IssueKey`] - Validated issue identifier
//! - [`IssueSnapshot`] - Immutable view of the issue list and loading flag
//! - [`PollRecord`] / [`PollOutcome`] - Bookkeeping for the last poll
//! - [`RefreshTrigger`] - Why a poll started
//! - [`IssueDiff`] / [`has_changed`] - Change detection

pub mod diff;
pub mod error;
pub mod models;

pub use diff::{has_changed, IssueDiff};
pub use error::CoreError;
pub use models::{
    site_base_url, IssueKey, IssueRecord, IssueSnapshot, PollOutcome, PollRecord, RefreshTrigger,
    CLOUD_DOMAIN,
};
