// Core data structures for the slot watcher

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ParseError;

/// Wire format of every date the portal emits and accepts
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Login credentials, supplied once at start-up
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Static browser headers sent with every request of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHeaders {
    pub referer: String,
    pub referrer_policy: &'static str,
    pub user_agent: &'static str,
    pub cache_control: &'static str,
    pub connection: &'static str,
}

/// Authenticated header/cookie bundle for API calls
///
/// Only the authenticator builds one. A failed cycle discards it and a new
/// login produces a replacement; nothing patches an existing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    cookie: String,
    csrf_token: String,
    fixed: FixedHeaders,
}

impl SessionContext {
    pub(crate) fn from_parts(cookie: String, csrf_token: String, fixed: FixedHeaders) -> Self {
        Self {
            cookie,
            csrf_token,
            fixed,
        }
    }

    /// `Cookie` header value, e.g. `_yatri_session=abc`
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Anti-forgery token scraped from the sign-in page (may be empty)
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn fixed_headers(&self) -> &FixedHeaders {
        &self.fixed
    }
}

/// A bookable calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppointmentDate(NaiveDate);

impl AppointmentDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for AppointmentDate {
    type Err = ParseError;

    /// Only the zero-padded `YYYY-MM-DD` form is accepted, so printing a
    /// parsed date gives back the exact string it came from.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ParseError::InvalidDate(s.to_string()))?;

        if date.to_string() != raw {
            return Err(ParseError::InvalidDate(s.to_string()));
        }
        Ok(date)
    }
}

impl fmt::Display for AppointmentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl<'de> Deserialize<'de> for AppointmentDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The currently booked date; any discovered date at or before it qualifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate(AppointmentDate);

impl TargetDate {
    pub fn new(date: AppointmentDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> AppointmentDate {
        self.0
    }

    pub fn admits(&self, candidate: &AppointmentDate) -> bool {
        *candidate <= self.0
    }

    /// All discovered dates that qualify, ascending, without duplicates
    pub fn qualifying(&self, dates: &[AppointmentDate]) -> Vec<AppointmentDate> {
        let mut found: Vec<AppointmentDate> =
            dates.iter().copied().filter(|d| self.admits(d)).collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    pub fn replace(&mut self, date: AppointmentDate) {
        self.0 = date;
    }
}

impl FromStr for TargetDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of asking the portal for open days
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    NoDates,
    Dates(Vec<AppointmentDate>),
}

impl PollResult {
    pub fn from_dates(dates: Vec<AppointmentDate>) -> Self {
        if dates.is_empty() {
            Self::NoDates
        } else {
            Self::Dates(dates)
        }
    }
}

/// A slot time as the portal reports it, e.g. `"09:00"`
pub type TimeOfDay = String;

/// What the watcher found when it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub date: AppointmentDate,
    pub time: Option<TimeOfDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> AppointmentDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_date_round_trips_literal_string() {
        assert_eq!(date("2024-06-10").to_string(), "2024-06-10");
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!("2024-13-01".parse::<AppointmentDate>().is_err());
        assert!("".parse::<AppointmentDate>().is_err());
        assert!("10/06/2024".parse::<AppointmentDate>().is_err());
    }

    #[test]
    fn test_unpadded_date_rejected() {
        assert!("2024-6-1".parse::<AppointmentDate>().is_err());
        assert!("2024-06-1".parse::<AppointmentDate>().is_err());
        assert!("+2024-06-01".parse::<AppointmentDate>().is_err());
        assert_eq!(date(" 2024-06-01 ").to_string(), "2024-06-01");
    }

    #[test]
    fn test_qualifying_subset() {
        let target: TargetDate = "2024-06-15".parse().unwrap();
        let found = [date("2024-07-01"), date("2024-06-10"), date("2024-06-20")];

        assert_eq!(target.qualifying(&found), vec![date("2024-06-10")]);
    }

    #[test]
    fn test_no_qualifying_dates() {
        let target: TargetDate = "2024-06-15".parse().unwrap();
        let found = [date("2024-07-01"), date("2024-08-01")];

        assert!(target.qualifying(&found).is_empty());
    }

    #[test]
    fn test_target_date_itself_qualifies() {
        let target: TargetDate = "2024-06-15".parse().unwrap();
        assert!(target.admits(&date("2024-06-15")));
    }

    #[test]
    fn test_qualifying_sorted_and_deduplicated() {
        let target: TargetDate = "2024-12-31".parse().unwrap();
        let found = [
            date("2024-09-01"),
            date("2024-06-10"),
            date("2024-09-01"),
            date("2024-07-04"),
        ];

        assert_eq!(
            target.qualifying(&found),
            vec![date("2024-06-10"), date("2024-07-04"), date("2024-09-01")]
        );
    }

    #[test]
    fn test_poll_result_from_empty() {
        assert_eq!(PollResult::from_dates(Vec::new()), PollResult::NoDates);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("me@example.com", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("me@example.com"));
        assert!(!printed.contains("hunter2"));
    }
}
