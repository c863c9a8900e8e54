//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for a single search request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established or was interrupted.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("Unexpected status code: {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// Server rejected the credentials (401/403).
    #[error("Authentication failed (HTTP {status})")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
    },

    /// Body was not the expected JSON shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Tracker host could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Credential could not be encoded into a header.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Classifies a reqwest error raised while sending a request.
    pub fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_decode() && !err.is_body() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err)
        }
    }

    /// Classifies a reqwest error raised while reading the response body.
    ///
    /// The body is read as raw text, so any failure here is a broken
    /// connection rather than a bad payload.
    pub fn from_body_read(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Network(err)
        }
    }

    /// Returns true for connectivity and timeout failures.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Network(_))
    }

    /// Returns true if the server answered with an error status.
    pub fn is_http(&self) -> bool {
        matches!(self, FetchError::Http { .. } | FetchError::Unauthorized { .. })
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } | FetchError::Unauthorized { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(FetchError::Timeout(Duration::from_secs(20)).is_transient());
        assert!(!FetchError::Decode("bad".into()).is_transient());
        assert!(FetchError::Unauthorized { status: 401 }.is_http());
        assert_eq!(FetchError::Http { status: 502 }.status(), Some(502));
        assert_eq!(FetchError::Decode("bad".into()).status(), None);
    }
}
