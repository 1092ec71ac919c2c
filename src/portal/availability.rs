//! Availability endpoints
//!
//! Both endpoints answer JSON when asked as XHR. Every parsed body is checked
//! for a top-level `error` field before anything else is read from it.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::headers::ajax_headers;
use super::PortalClient;
use crate::error::{Error, Result};
use crate::models::{AppointmentDate, PollResult, SessionContext, TimeOfDay};
use crate::utils::error::{FetchError, ParseError};

/// One entry of the days endpoint; other fields are ignored
#[derive(Debug, Deserialize)]
struct DayRecord {
    date: AppointmentDate,
}

#[derive(Debug, Default, Deserialize)]
struct TimesPayload {
    #[serde(default)]
    business_times: Option<Vec<String>>,
    #[serde(default)]
    available_times: Option<Vec<String>>,
}

/// Fail with the portal's message if the body carries an `error` field
pub fn check_api_error(body: &Value) -> Result<()> {
    match body.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(()),
        Some(Value::String(message)) if message.is_empty() => Ok(()),
        Some(Value::String(message)) => Err(Error::api(message.clone())),
        Some(other) => Err(Error::api(other.to_string())),
    }
}

/// Project a days payload onto appointment dates, keeping the portal's order
pub fn parse_days(body: Value) -> Result<PollResult> {
    check_api_error(&body)?;

    if !body.is_array() {
        return Err(ParseError::UnexpectedShape(format!("expected an array of days, got {body}")).into());
    }

    let records: Vec<DayRecord> = serde_json::from_value(body)?;
    let dates = records.into_iter().map(|r| r.date).collect();

    Ok(PollResult::from_dates(dates))
}

/// First business time, falling back to the first available time
pub fn parse_first_time(body: Value) -> Result<Option<TimeOfDay>> {
    check_api_error(&body)?;

    let payload: TimesPayload = serde_json::from_value(body)?;
    let first = |times: Option<Vec<String>>| times.and_then(|t| t.into_iter().next());

    Ok(first(payload.business_times).or_else(|| first(payload.available_times)))
}

impl PortalClient {
    /// Ask the portal for open days
    ///
    /// # Errors
    ///
    /// `Error::Api` when the body names an error, `Error::Parse` for a body
    /// that is not a list of `{date}` records, `Error::Fetch` otherwise.
    pub async fn available_days(&self, session: &SessionContext) -> Result<PollResult> {
        let body = self.get_json(&self.days_url(), session).await?;
        let result = parse_days(body)?;

        if let PollResult::Dates(dates) = &result {
            debug!(count = dates.len(), "Received available days");
        }

        Ok(result)
    }

    /// Ask the portal for the first open time on `date`
    pub async fn available_time(
        &self,
        session: &SessionContext,
        date: AppointmentDate,
    ) -> Result<Option<TimeOfDay>> {
        let body = self.get_json(&self.times_url(date), session).await?;
        parse_first_time(body)
    }

    /// GET a JSON endpoint as an XHR request
    ///
    /// The error field is checked before the status so the portal's own
    /// message wins over a bare status code.
    async fn get_json(&self, url: &str, session: &SessionContext) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .headers(ajax_headers(session)?)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                check_api_error(&body)?;
                if !status.is_success() {
                    return Err(FetchError::ServerError(status.as_u16()).into());
                }
                Ok(body)
            }
            Err(_) if !status.is_success() => Err(FetchError::ServerError(status.as_u16()).into()),
            Err(e) => Err(e.into()),
        }
    }
}
