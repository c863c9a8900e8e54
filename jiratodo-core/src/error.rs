//! Core error types for JiraTodo.

use thiserror::Error;

/// Core error type for JiraTodo operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Issue key is empty or not usable as a URL path segment.
    #[error("Invalid issue key: {0:?}")]
    InvalidIssueKey(String),
}
