// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # JiraTodo Agent
//!
//! Keeps the list of open issues assigned to the user up to date.
//!
//! - [`refresh::PollingAgent`] - Single-flight poll loop fed by startup,
//!   interval, foreground and manual triggers
//! - [`notifications`] - The [`Notifier`] port and the desktop implementation
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use jiratodo_agent::{AgentConfig, PollingAgent, SystemNotifier};
//!
//! let agent = PollingAgent::new(
//!     AgentConfig::from_settings(&settings),
//!     Arc::new(settings.token_store()),
//!     Arc::new(JiraClient::new(settings.client_config()?)?),
//!     Arc::new(SystemNotifier::new(settings.notifications_enabled)),
//! );
//! let handle = agent.spawn();
//! handle.refresh();
//! ```

pub mod notifications;
pub mod refresh;

pub use notifications::{NotificationContent, Notifier, SystemNotifier, NOTIFICATION_TITLE};
pub use refresh::{AgentConfig, AgentHandle, PollingAgent, DEFAULT_TRIGGER_CAPACITY};
