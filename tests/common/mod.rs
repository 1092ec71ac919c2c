//! Common test utilities

use slotwatch::models::{AppointmentDate, Credentials};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn credentials() -> Credentials {
    Credentials::new("me@example.com", "hunter2")
}

pub fn date(s: &str) -> AppointmentDate {
    s.parse().unwrap()
}

/// Minimal sign-in page carrying a csrf meta tag
pub fn sign_in_page(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta name="csrf-param" content="authenticity_token" />
<meta name="csrf-token" content="{token}" />
</head>
<body><form action="/users/sign_in" method="post"></form></body>
</html>"#
    )
}

/// Mount a working sign-in handshake that hands out `_yatri_session=authed`
pub async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/sign_in"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "_yatri_session=anon; path=/")
                .set_body_string(sign_in_page("tok")),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/sign_in"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/account")
                .insert_header("set-cookie", "_yatri_session=authed; path=/"),
        )
        .mount(server)
        .await;
}
