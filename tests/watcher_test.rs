//! End-to-end watcher runs against a mock portal

use slotwatch::alerts::NoopAlerter;
use slotwatch::config::PortalConfig;
use slotwatch::error::Error;
use slotwatch::portal::PortalClient;
use slotwatch::utils::SleepRange;
use slotwatch::watcher::{WatchSettings, Watcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{credentials, date};

const DAYS_PATH: &str = "/schedule/777/appointment/days/55.json";
const TIMES_PATH: &str = "/schedule/777/appointment/times/55.json";

fn watcher_for(server: &MockServer, max_restarts: Option<u32>) -> Watcher<PortalClient, NoopAlerter> {
    let portal = PortalClient::new(&PortalConfig {
        base_url: server.uri(),
        schedule_id: "777".to_string(),
        facility_id: "55".to_string(),
        request_timeout_secs: 5,
    })
    .unwrap();

    let settings = WatchSettings {
        credentials: credentials(),
        sleep: SleepRange::new(0, 0),
        max_restarts,
    };

    Watcher::new(settings, portal, NoopAlerter)
}

/// Test that the watcher stops on the earliest qualifying date
#[tokio::test]
async fn test_finds_earlier_date() {
    let server = MockServer::start().await;
    common::mount_sign_in(&server).await;

    Mock::given(method("GET"))
        .and(path(DAYS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAYS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"date": "2024-07-01"},
            {"date": "2024-06-10"},
            {"date": "2024-06-20"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(TIMES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "business_times": ["08:30"],
            "available_times": ["08:30", "09:00"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = watcher_for(&server, None)
        .run("2024-06-15".parse().unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.date, date("2024-06-10"));
    assert_eq!(outcome.time.as_deref(), Some("08:30"));
}

/// Test that an API error triggers a complete new login
#[tokio::test]
async fn test_api_error_restarts_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/sign_in"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "_yatri_session=anon; path=/")
                .set_body_string(common::sign_in_page("tok")),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/sign_in"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("set-cookie", "_yatri_session=authed; path=/"),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAYS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Your session expired, please sign in again to continue."
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DAYS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"date": "2024-06-15"}])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(TIMES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = watcher_for(&server, None)
        .run("2024-06-15".parse().unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.date, date("2024-06-15"));
    assert_eq!(outcome.time, None);
}

/// Test that the optional restart cap ends an unreachable portal watch
#[tokio::test]
async fn test_restart_cap_against_down_portal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/sign_in"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = watcher_for(&server, Some(2))
        .run("2024-06-15".parse().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RetriesExhausted { attempts: 3 }));
}
