//! Sign-in handshake
//!
//! Two requests: fetch the sign-in page anonymously to pick up a cookie and
//! the anti-forgery token, then post the credential form. The session cookie
//! set by the post replaces the anonymous one; the token is kept from the
//! first page. Failures propagate untouched, the watcher decides on retries.

use tracing::{debug, info};

use super::extract::{extract_session, refresh_cookie};
use super::headers::{browser_headers, form_headers};
use super::PortalClient;
use crate::error::Result;
use crate::models::{Credentials, SessionContext};
use crate::utils::error::FetchError;

/// Form fields of the sign-in post, in the order the page submits them
pub fn sign_in_form(credentials: &Credentials) -> [(&'static str, &str); 5] {
    [
        ("utf8", "✓"),
        ("user[email]", credentials.username.as_str()),
        ("user[password]", credentials.password.as_str()),
        ("policy_confirmed", "1"),
        ("commit", "Acessar"),
    ]
}

impl PortalClient {
    /// Run the sign-in handshake and return an authenticated session
    ///
    /// # Errors
    ///
    /// - `FetchError` on transport failures, a non-2xx sign-in page, or a
    ///   form post answered with anything other than 2xx/3xx
    /// - `FetchError::InvalidHeader` if a scraped value cannot be sent back
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionContext> {
        info!("Logging in");
        let url = self.sign_in_url();

        let response = self
            .client
            .get(&url)
            .headers(browser_headers(&self.fixed)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()).into());
        }

        let page_headers = response.headers().clone();
        let html = response.text().await?;
        let anonymous = extract_session(&page_headers, &html, self.fixed.clone());
        debug!(
            has_token = !anonymous.csrf_token().is_empty(),
            "Fetched sign-in page"
        );

        debug!(user = %credentials.username, "Submitting sign-in form");
        let form = sign_in_form(credentials);
        let response = self
            .client
            .post(&url)
            .form(form.as_slice())
            .headers(form_headers(&anonymous)?)
            .send()
            .await?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::ServerError(status.as_u16()).into());
        }

        let session = refresh_cookie(&anonymous, response.headers());
        debug!(status = status.as_u16(), "Sign-in form accepted");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_form_fields() {
        let creds = Credentials::new("me@example.com", "s3cret");
        let form = sign_in_form(&creds);

        assert_eq!(form[0], ("utf8", "✓"));
        assert_eq!(form[1], ("user[email]", "me@example.com"));
        assert_eq!(form[2], ("user[password]", "s3cret"));
        assert_eq!(form[3], ("policy_confirmed", "1"));
        assert_eq!(form[4], ("commit", "Acessar"));
    }
}
