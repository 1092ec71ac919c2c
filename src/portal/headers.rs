use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, COOKIE,
    REFERER, USER_AGENT,
};

use crate::models::{FixedHeaders, SessionContext};
use crate::utils::error::FetchError;

/// Browser identity presented to the portal
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36";

pub const REFERRER_POLICY: &str = "strict-origin-when-cross-origin";

pub const NO_STORE: &str = "no-store";

pub const KEEP_ALIVE: &str = "keep-alive";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

static REFERRER_POLICY_HEADER: HeaderName = HeaderName::from_static("referrer-policy");
static CSRF_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");
static REQUESTED_WITH_HEADER: HeaderName = HeaderName::from_static("x-requested-with");

/// Static headers for a session against `base_url`
pub fn fixed_headers(base_url: &str) -> FixedHeaders {
    FixedHeaders {
        referer: base_url.to_string(),
        referrer_policy: REFERRER_POLICY,
        user_agent: BROWSER_USER_AGENT,
        cache_control: NO_STORE,
        connection: KEEP_ALIVE,
    }
}

/// Build the browser-like headers shared by every request
///
/// # Errors
///
/// Returns `FetchError::InvalidHeader` if the referer is not a valid header value.
pub fn browser_headers(fixed: &FixedHeaders) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(REFERER, header_value("referer", &fixed.referer)?);
    headers.insert(
        REFERRER_POLICY_HEADER.clone(),
        HeaderValue::from_static(fixed.referrer_policy),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(fixed.user_agent));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(fixed.cache_control));
    headers.insert(CONNECTION, HeaderValue::from_static(fixed.connection));

    Ok(headers)
}

/// Browser headers plus the session cookie and anti-forgery token
///
/// An empty token is left out rather than sent as an empty header.
pub fn session_headers(session: &SessionContext) -> Result<HeaderMap, FetchError> {
    let mut headers = browser_headers(session.fixed_headers())?;

    headers.insert(COOKIE, header_value("cookie", session.cookie())?);
    if !session.csrf_token().is_empty() {
        headers.insert(
            CSRF_TOKEN_HEADER.clone(),
            header_value("x-csrf-token", session.csrf_token())?,
        );
    }

    Ok(headers)
}

/// Headers for the credential form post
pub fn form_headers(session: &SessionContext) -> Result<HeaderMap, FetchError> {
    let mut headers = session_headers(session)?;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    Ok(headers)
}

/// Headers for the JSON availability endpoints
///
/// Declares the request as XHR so the portal answers with JSON instead of a page.
pub fn ajax_headers(session: &SessionContext) -> Result<HeaderMap, FetchError> {
    let mut headers = session_headers(session)?;
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        REQUESTED_WITH_HEADER.clone(),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader(name))
}
