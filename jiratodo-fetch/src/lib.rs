// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # JiraTodo Fetch
//!
//! Credential lookup and the Jira search client.
//!
//! - [`credentials::TokenStore`] - Resolves the API token (override, then file)
//! - [`client::JiraClient`] - Authenticated `GET /rest/api/3/search`
//! - [`parser`] - All-or-nothing decoding of the search response
//! - [`source`] - Traits the polling loop depends on
//!
//! ## Example
//!
//! ```ignore
//! use jiratodo_fetch::{JiraClient, JiraClientConfig, TokenStore};
//!
//! let tokens = TokenStore::from_default_file().with_env_override();
//! let client = JiraClient::new(JiraClientConfig::new("acme.atlassian.net", "me@acme.io"))?;
//!
//! if let Some(credential) = tokens.load().await {
//!     let issues = client.search_assigned(&credential).await?;
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod parser;
pub mod source;

pub use client::{JiraClient, JiraClientConfig, ASSIGNED_OPEN_JQL};
pub use credentials::{default_token_file, Credential, TokenStore, TOKEN_ENV};
pub use error::FetchError;
pub use parser::parse_search_response;
pub use source::{CredentialSource, IssueSource};
