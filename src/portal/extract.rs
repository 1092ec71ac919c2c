//! Session credential extraction from portal responses
//!
//! Pure functions that turn the headers and body of a sign-in response into
//! the pieces of a [`SessionContext`]. Missing values are not errors here:
//! an empty cookie or token only surfaces later as a rejected API call.

use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, SET_COOKIE};
use scraper::{Html, Selector};
use std::collections::HashMap;

use crate::models::{FixedHeaders, SessionContext};

/// Cookie that identifies an authenticated portal session
pub const SESSION_COOKIE: &str = "_yatri_session";

lazy_static! {
    static ref CSRF_META: Selector =
        Selector::parse(r#"meta[name="csrf-token"]"#).expect("Invalid CSS selector: csrf meta");
}

/// Parse `name=value` pairs out of every `Set-Cookie` header
///
/// Pairs are split on `;`, trimmed, then split on the first `=`. Attributes
/// such as `path` or `HttpOnly` end up as entries too; callers pick the keys
/// they care about. A later header wins over an earlier one.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for raw in headers.get_all(SET_COOKIE) {
        let Ok(raw) = raw.to_str() else {
            continue;
        };

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            cookies.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    cookies
}

/// The session cookie as a `Cookie` header value
///
/// Yields `_yatri_session=` with an empty value when the response set none.
pub fn session_cookie(headers: &HeaderMap) -> String {
    let value = parse_cookies(headers)
        .remove(SESSION_COOKIE)
        .unwrap_or_default();
    format!("{SESSION_COOKIE}={value}")
}

/// Anti-forgery token from the page's `csrf-token` meta tag, or empty
pub fn csrf_token(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&CSRF_META)
        .find_map(|el| el.value().attr("content"))
        .map(|token| token.trim().to_string())
        .unwrap_or_default()
}

/// Build a session from a full response (headers and HTML body)
pub fn extract_session(headers: &HeaderMap, html: &str, fixed: FixedHeaders) -> SessionContext {
    SessionContext::from_parts(session_cookie(headers), csrf_token(html), fixed)
}

/// Rebuild a session with the cookie a later response set
///
/// Only the cookie is replaced; the token and fixed headers carry over from
/// `previous`, which is left untouched.
pub fn refresh_cookie(previous: &SessionContext, headers: &HeaderMap) -> SessionContext {
    SessionContext::from_parts(
        session_cookie(headers),
        previous.csrf_token().to_string(),
        previous.fixed_headers().clone(),
    )
}
