//! Client for the appointment portal
//!
//! [`PortalClient`] owns the HTTP client and knows the portal's URL layout.
//! Login lives in [`auth`], the availability endpoints in [`availability`],
//! and the credential parsing both rely on in [`extract`]. The watcher only
//! sees the [`Portal`] trait.

pub mod auth;
pub mod availability;
pub mod extract;
pub mod headers;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

use crate::config::PortalConfig;
use crate::error::Result;
use crate::models::{AppointmentDate, Credentials, FixedHeaders, PollResult, SessionContext, TimeOfDay};
use crate::utils::error::FetchError;

/// The operations one poll cycle needs from the portal
#[async_trait]
pub trait Portal: Send + Sync {
    /// Log in and return a fresh session
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionContext>;

    /// Open days for the configured facility
    async fn list_available_days(&self, session: &SessionContext) -> Result<PollResult>;

    /// First open time on `date`, if the portal lists any
    async fn list_available_times(
        &self,
        session: &SessionContext,
        date: AppointmentDate,
    ) -> Result<Option<TimeOfDay>>;
}

/// HTTP implementation of [`Portal`]
pub struct PortalClient {
    /// HTTP client; redirects are not followed so sign-in cookies stay visible
    client: Client,

    /// Portal root without trailing slash
    base_url: String,

    schedule_id: String,

    facility_id: String,

    fixed: FixedHeaders,
}

impl PortalClient {
    /// Create a client from portal configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unparseable base URL and
    /// `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(config: &PortalConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self {
            fixed: headers::fixed_headers(&base_url),
            client,
            base_url,
            schedule_id: config.schedule_id.clone(),
            facility_id: config.facility_id.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn sign_in_url(&self) -> String {
        format!("{}/users/sign_in", self.base_url)
    }

    pub(crate) fn days_url(&self) -> String {
        format!(
            "{}/schedule/{}/appointment/days/{}.json?appointments[expedite]=false",
            self.base_url, self.schedule_id, self.facility_id
        )
    }

    pub(crate) fn times_url(&self, date: AppointmentDate) -> String {
        format!(
            "{}/schedule/{}/appointment/times/{}.json?date={date}&appointments[expedite]=false",
            self.base_url, self.schedule_id, self.facility_id
        )
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionContext> {
        self.login(credentials).await
    }

    async fn list_available_days(&self, session: &SessionContext) -> Result<PollResult> {
        self.available_days(session).await
    }

    async fn list_available_times(
        &self,
        session: &SessionContext,
        date: AppointmentDate,
    ) -> Result<Option<TimeOfDay>> {
        self.available_time(session, date).await
    }
}
