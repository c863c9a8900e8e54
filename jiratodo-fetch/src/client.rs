//! Jira search client.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jiratodo_core::{site_base_url, IssueRecord};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::credentials::Credential;
use crate::error::FetchError;
use crate::parser::parse_search_response;
use crate::source::IssueSource;

// ============================================================================
// Constants
// ============================================================================

/// Search endpoint path.
const SEARCH_ENDPOINT: &str = "/rest/api/3/search";

/// Open issues assigned to the authenticated account, newest first.
pub const ASSIGNED_OPEN_JQL: &str =
    "assignee=currentUser() AND resolution is EMPTY AND statusCategory != Done ORDER BY created DESC";

/// Fields requested for each issue.
const SEARCH_FIELDS: &str = "key,summary,status";

/// Page size cap. Only the first page is ever requested.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

// ============================================================================
// Client Config
// ============================================================================

/// Connection settings for [`JiraClient`].
#[derive(Debug, Clone)]
pub struct JiraClientConfig {
    /// Tracker host (`acme.atlassian.net`) or base URL (`http://127.0.0.1:8080`).
    pub host: String,
    /// Account e-mail used as the basic-auth user name.
    pub account_email: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size.
    pub max_results: u32,
}

impl JiraClientConfig {
    /// Creates a config with the default timeout and page size.
    pub fn new(host: impl Into<String>, account_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            account_email: account_email.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Turns a configured host into a base URL, defaulting to HTTPS.
///
/// A bare site name such as `acme` resolves to `https://acme.atlassian.net/`.
pub fn base_url(host: &str) -> Result<Url, FetchError> {
    if host.trim().trim_end_matches('/').is_empty() {
        return Err(FetchError::InvalidUrl("empty host".to_string()));
    }

    let raw = site_base_url(host);
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}

/// Builds the `Authorization` header value for basic auth.
pub fn basic_auth_header(account_email: &str, credential: &Credential) -> String {
    let raw = format!("{account_email}:{}", credential.expose());
    format!("Basic {}", STANDARD.encode(raw))
}

// ============================================================================
// Jira Client
// ============================================================================

/// Client for the Jira Cloud issue search API.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    config: JiraClientConfig,
    search_url: Url,
}

impl JiraClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(config: JiraClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jiratodo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let search_url = Self::build_search_url(&config)?;

        Ok(Self {
            http,
            config,
            search_url,
        })
    }

    fn build_search_url(config: &JiraClientConfig) -> Result<Url, FetchError> {
        let mut url = base_url(&config.host)?
            .join(SEARCH_ENDPOINT)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("jql", ASSIGNED_OPEN_JQL)
            .append_pair("maxResults", &config.max_results.to_string())
            .append_pair("fields", SEARCH_FIELDS);

        Ok(url)
    }

    /// Returns the full search URL, query included.
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    fn build_headers(&self, credential: &Credential) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&basic_auth_header(
            &self.config.account_email,
            credential,
        ))
        .map_err(|e| FetchError::InvalidCredential(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Fetches open issues assigned to the account.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the request exceeds the timeout
    /// - [`FetchError::Network`] on connectivity failures
    /// - [`FetchError::Unauthorized`] / [`FetchError::Http`] on error statuses
    /// - [`FetchError::Decode`] if the body is not a valid search response
    #[instrument(skip(self, credential), fields(url = %self.search_url))]
    pub async fn search_assigned(
        &self,
        credential: &Credential,
    ) -> Result<Vec<IssueRecord>, FetchError> {
        let timeout = self.config.timeout;
        let headers = self.build_headers(credential)?;

        debug!("Fetching assigned issues");
        let response = self
            .http
            .get(self.search_url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::from_request(e, timeout))?;

        let status = response.status();
        debug!(status = %status, "Response received");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "Jira rejected the credentials");
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_body_read(e, timeout))?;

        let issues = parse_search_response(&body)?;
        debug!(count = issues.len(), "Decoded issues");
        Ok(issues)
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch(&self, credential: &Credential) -> Result<Vec<IssueRecord>, FetchError> {
        self.search_assigned(credential).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_query() {
        let client = JiraClient::new(JiraClientConfig::new("acme.atlassian.net", "me@acme.io")).unwrap();
        let url = client.search_url();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("acme.atlassian.net"));
        assert_eq!(url.path(), "/rest/api/3/search");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("jql".to_string(), ASSIGNED_OPEN_JQL.to_string()),
                ("maxResults".to_string(), "20".to_string()),
                ("fields".to_string(), "key,summary,status".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let url = base_url("http://127.0.0.1:9000/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_bare_site_name_resolves_to_cloud_host() {
        let client = JiraClient::new(JiraClientConfig::new("ksa-motory", "me@acme.io")).unwrap();
        let url = client.search_url();
        assert_eq!(url.host_str(), Some("ksa-motory.atlassian.net"));
        assert_eq!(url.path(), "/rest/api/3/search");

        let url = base_url("jira.acme.io").unwrap();
        assert_eq!(url.host_str(), Some("jira.acme.io"));
    }

    #[test]
    fn test_base_url_rejects_empty() {
        assert!(matches!(base_url("  "), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_basic_auth_header() {
        let header = basic_auth_header("me@acme.io", &Credential::new("tok"));
        // base64("me@acme.io:tok")
        assert_eq!(header, "Basic bWVAYWNtZS5pbzp0b2s=");
    }

    #[test]
    fn test_default_config() {
        let config = JiraClientConfig::new("acme.atlassian.net", "me@acme.io");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.max_results, 20);
    }
}
