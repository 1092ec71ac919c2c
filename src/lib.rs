//! slotwatch - appointment slot watcher
//!
//! Logs into a session-authenticated appointment portal, polls its
//! availability endpoint and raises an alert once a date at or before the
//! currently booked one opens up.
//!
//! # Architecture
//!
//! - [`config`] - Configuration loading and validation
//! - [`portal`] - HTTP client: sign-in handshake, cookie/token extraction, availability endpoints
//! - [`watcher`] - The poll loop state machine
//! - [`alerts`] - Sound and desktop notification
//! - [`models`] - Core data structures and types
//! - [`utils`] - Jittered sleep and shared helpers
//!
//! # Example
//!
//! ```no_run
//! use slotwatch::alerts::DesktopAlerter;
//! use slotwatch::config::Config;
//! use slotwatch::portal::PortalClient;
//! use slotwatch::watcher::Watcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let portal = PortalClient::new(&config.portal)?;
//!     let watcher = Watcher::from_config(&config, portal, DesktopAlerter::new(&config.alert));
//!     let outcome = watcher.run("2024-06-15".parse()?).await?;
//!     println!("Found {}", outcome.date);
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod config;
pub mod error;
pub mod models;
pub mod portal;
pub mod utils;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::alerts::{Alerter, DesktopAlerter, NoopAlerter};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{AppointmentDate, PollResult, SessionContext, TargetDate, WatchOutcome};
    pub use crate::portal::{Portal, PortalClient};
    pub use crate::watcher::Watcher;
}

// Direct re-exports for convenience
pub use models::{AppointmentDate, PollResult, TargetDate, WatchOutcome};
