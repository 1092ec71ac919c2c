//! Polling orchestrator
//!
//! Drives the authenticate → poll → decide → sleep cycle as an explicit state
//! machine:
//!
//! ```text
//!   Authenticating ──ok──▶ Polling ──qualifying date──▶ Done
//!        ▲   │                │ │
//!        │   └─err─┐   no date│ └─err─┐
//!        │         ▼          ▼       ▼
//!        └──────── sleep ◀── sleep  sleep
//! ```
//!
//! Any error from the portal drops the current session and sends the loop
//! back to `Authenticating` after the usual randomized pause. The loop only
//! ends on `Done`, or when an optional restart cap is reached.

use tracing::{debug, info, warn};

use crate::alerts::Alerter;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{AppointmentDate, Credentials, PollResult, SessionContext, TargetDate, WatchOutcome};
use crate::portal::Portal;
use crate::utils::{bullet_list, SleepRange};

/// Runtime settings of the watcher, lifted out of [`Config`]
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub credentials: Credentials,
    pub sleep: SleepRange,
    /// Consecutive failed cycles tolerated; `None` retries forever
    pub max_restarts: Option<u32>,
}

impl From<&Config> for WatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            credentials: config.credentials.clone(),
            sleep: config.polling.sleep_range(),
            max_restarts: config.polling.max_restarts,
        }
    }
}

/// What one poll tells the loop to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The portal listed no days at all
    NoDates,
    /// Days exist, none at or before the target
    NoneQualifying,
    /// `earliest` becomes the new target; `all` lists every qualifying date ascending
    Found {
        earliest: AppointmentDate,
        all: Vec<AppointmentDate>,
    },
}

/// Compare a poll result against the target
pub fn decide(result: &PollResult, target: &TargetDate) -> Decision {
    match result {
        PollResult::NoDates => Decision::NoDates,
        PollResult::Dates(dates) => {
            let all = target.qualifying(dates);
            match all.first().copied() {
                Some(earliest) => Decision::Found { earliest, all },
                None => Decision::NoneQualifying,
            }
        }
    }
}

enum State {
    Authenticating,
    Polling(SessionContext),
    Done(WatchOutcome),
}

/// The polling orchestrator
pub struct Watcher<P, A> {
    portal: P,
    alerter: A,
    settings: WatchSettings,
}

impl<P: Portal, A: Alerter> Watcher<P, A> {
    pub fn new(settings: WatchSettings, portal: P, alerter: A) -> Self {
        Self {
            portal,
            alerter,
            settings,
        }
    }

    pub fn from_config(config: &Config, portal: P, alerter: A) -> Self {
        Self::new(WatchSettings::from(config), portal, alerter)
    }

    /// Watch until a date at or before `target` shows up, then alert
    ///
    /// # Errors
    ///
    /// Only `Error::RetriesExhausted` when a restart cap is configured and
    /// reached, or a non-recoverable error surfacing from the portal. Every
    /// other failure restarts the session.
    pub async fn run(&self, target: TargetDate) -> Result<WatchOutcome> {
        let mut target = target;
        let mut failures: u32 = 0;
        let mut state = State::Authenticating;

        info!(target_date = %target, "Initializing with current date");

        let outcome = loop {
            state = match state {
                State::Authenticating => {
                    match self.portal.authenticate(&self.settings.credentials).await {
                        Ok(session) => {
                            debug!("Session established");
                            State::Polling(session)
                        }
                        Err(e) => {
                            self.record_failure(e, &mut failures)?;
                            self.settings.sleep.sleep().await;
                            State::Authenticating
                        }
                    }
                }

                State::Polling(session) => {
                    let polled = self.portal.list_available_days(&session).await;
                    match polled {
                        Ok(result) => {
                            failures = 0;
                            self.next_after_poll(&result, &mut target, session).await
                        }
                        Err(e) => {
                            self.record_failure(e, &mut failures)?;
                            self.settings.sleep.sleep().await;
                            State::Authenticating
                        }
                    }
                }

                State::Done(outcome) => break outcome,
            };
        };

        info!(date = %outcome.date, time = ?outcome.time, "Date for booking available");
        Ok(outcome)
    }

    /// Act on a successful poll: alert and finish, or pause and poll again
    async fn next_after_poll(
        &self,
        result: &PollResult,
        target: &mut TargetDate,
        session: SessionContext,
    ) -> State {
        match decide(result, target) {
            Decision::Found { earliest, all } => {
                info!(dates = %bullet_list(&all), "Dates available for booking");
                target.replace(earliest);
                State::Done(self.alert(&session, earliest).await)
            }
            Decision::NoDates => {
                info!("No dates available");
                self.settings.sleep.sleep().await;
                State::Polling(session)
            }
            Decision::NoneQualifying => {
                info!(target_date = %target, "No dates available before current date");
                self.settings.sleep.sleep().await;
                State::Polling(session)
            }
        }
    }

    /// Log a failed cycle and decide whether the loop may continue
    fn record_failure(&self, error: Error, failures: &mut u32) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }

        *failures += 1;
        warn!(
            error = %error,
            category = %error.category(),
            attempt = *failures,
            "Cycle failed, trying again with a new session"
        );

        match self.settings.max_restarts {
            Some(max) if *failures > max => Err(Error::RetriesExhausted {
                attempts: *failures,
            }),
            _ => Ok(()),
        }
    }

    /// Sound the alarm for `date` and look up its first time on the way
    ///
    /// The time lookup is informational; its failure is logged and the
    /// alert still goes out.
    async fn alert(&self, session: &SessionContext, date: AppointmentDate) -> WatchOutcome {
        let lookup_and_notify = async {
            let time = match self.portal.list_available_times(session, date).await {
                Ok(time) => time,
                Err(e) => {
                    warn!(error = %e, date = %date, "Failed to fetch available times");
                    None
                }
            };

            let message = format!("Data disponível para reserva: {date}");
            if let Err(e) = self.alerter.notify(&message).await {
                warn!(error = %e, alerter = self.alerter.name(), "Failed to send notification");
            }

            time
        };

        let (time, ()) = tokio::join!(lookup_and_notify, self.alerter.play_alert());

        WatchOutcome { date, time }
    }
}
