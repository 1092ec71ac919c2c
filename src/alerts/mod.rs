//! Alerting once a qualifying slot shows up
//!
//! The watcher calls into an [`Alerter`] and never depends on how the alert
//! is delivered. [`DesktopAlerter`] plays a sound and raises a desktop
//! notification through the platform's own tools; [`NoopAlerter`] only logs.

pub mod desktop;

use async_trait::async_trait;
use tracing::info;

pub use desktop::DesktopAlerter;

/// Result type for alert delivery
pub type AlertResult<T> = Result<T, AlertError>;

/// Errors that can occur while delivering an alert
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// The helper program could not be started
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper program ran but reported failure
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

/// Something that can get the user's attention
#[async_trait]
pub trait Alerter: Send + Sync {
    /// Get the alerter name
    fn name(&self) -> &str;

    /// Play the audible alert for its whole bounded duration
    ///
    /// Playback failures are logged by the implementation and never returned.
    async fn play_alert(&self);

    /// Raise a notification carrying `message`
    async fn notify(&self, message: &str) -> AlertResult<()>;
}

/// Alerter that only writes log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAlerter;

#[async_trait]
impl Alerter for NoopAlerter {
    fn name(&self) -> &str {
        "noop"
    }

    async fn play_alert(&self) {
        info!("Sound alert disabled");
    }

    async fn notify(&self, message: &str) -> AlertResult<()> {
        info!(message = %message, "Notification disabled");
        Ok(())
    }
}
