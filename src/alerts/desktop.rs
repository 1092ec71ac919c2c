//! Desktop alerts through platform helper programs
//!
//! Sound goes through a configurable player command (`afplay` by default).
//! Notifications use `osascript` on macOS and `notify-send` elsewhere.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::{AlertError, AlertResult, Alerter};
use crate::config::AlertConfig;

/// Alerter backed by local helper programs
#[derive(Debug, Clone)]
pub struct DesktopAlerter {
    title: String,
    sound_player: String,
    sound_file: String,
    sound_duration: Duration,
    sound_interval: Duration,
}

impl DesktopAlerter {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            title: config.title.clone(),
            sound_player: config.sound_player.clone(),
            sound_file: config.sound_file.clone(),
            sound_duration: Duration::from_secs(config.sound_duration_secs),
            sound_interval: Duration::from_secs(config.sound_interval_secs.max(1)),
        }
    }

    /// How many times the sound plays over the configured duration
    pub fn repetitions(&self) -> u64 {
        (self.sound_duration.as_secs() / self.sound_interval.as_secs()).max(1)
    }

    fn spawn_sound(&self) -> AlertResult<Child> {
        Command::new(&self.sound_player)
            .arg(&self.sound_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AlertError::Launch {
                program: self.sound_player.clone(),
                source,
            })
    }

    fn notification_command(&self, message: &str) -> Command {
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                escape_applescript(message),
                escape_applescript(&self.title)
            );
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(script);
            cmd
        } else {
            let mut cmd = Command::new("notify-send");
            cmd.arg(&self.title).arg(message);
            cmd
        }
    }
}

#[async_trait]
impl Alerter for DesktopAlerter {
    fn name(&self) -> &str {
        "desktop"
    }

    async fn play_alert(&self) {
        let mut ticker = tokio::time::interval(self.sound_interval);
        let mut players = Vec::new();

        for _ in 0..self.repetitions() {
            ticker.tick().await;
            match self.spawn_sound() {
                Ok(child) => players.push(child),
                Err(e) => warn!(error = %e, "Failed to play alert sound"),
            }
        }

        for mut child in players {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    warn!(player = %self.sound_player, status = %status, "Alert sound player failed")
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to wait for alert sound player"),
            }
        }
    }

    async fn notify(&self, message: &str) -> AlertResult<()> {
        let mut cmd = self.notification_command(message);
        let program = cmd.as_std().get_program().to_string_lossy().into_owned();

        let status = cmd
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| AlertError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AlertError::Failed {
                program,
                status: status.to_string(),
            });
        }

        debug!(title = %self.title, "Desktop notification sent");
        Ok(())
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AlertConfig {
        AlertConfig {
            sound_player: "definitely-not-a-real-player-binary".to_string(),
            sound_duration_secs: 1,
            sound_interval_secs: 1,
            ..AlertConfig::default()
        }
    }

    #[test]
    fn test_repetitions() {
        let alerter = DesktopAlerter::new(&AlertConfig::default());
        assert_eq!(alerter.repetitions(), 30);

        let short = DesktopAlerter::new(&AlertConfig {
            sound_duration_secs: 0,
            ..AlertConfig::default()
        });
        assert_eq!(short.repetitions(), 1);
    }

    #[test]
    fn test_escape_applescript() {
        assert_eq!(escape_applescript(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_applescript(r"a\b"), r"a\\b");
    }

    #[tokio::test]
    async fn test_missing_player_is_not_fatal() {
        let alerter = DesktopAlerter::new(&config());
        alerter.play_alert().await;
    }

    #[tokio::test]
    async fn test_launch_error_names_program() {
        let alerter = DesktopAlerter::new(&config());
        let err = alerter.spawn_sound().unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-player-binary"));
    }
}
