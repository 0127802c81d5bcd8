//! Tests that Marquee logs behave as expected.
//!
//! These requests go through [`InProcessApp`](crate::InProcessApp), which
//! serves them on the test's thread where the log watcher is installed.
#![cfg(test)]

use crate::{marquee_test, TestingTools, DISCOVERY_ROOT};
use actix_web::http::StatusCode;
use httpmock::Method::GET;
use serde_json::json;
use tracing::Level;

#[actix_rt::test]
async fn requests_log_their_outcome() {
    marquee_test(
        |_| (),
        |TestingTools {
             in_process_app,
             mut log_watcher,
             ..
         }| async move {
            let (status, _) = in_process_app.get("/health").await;
            assert_eq!(status, StatusCode::OK);

            assert!(log_watcher.has(|event| {
                event.field_contains("message", "Request success")
                    && event.event_type() == Some("web.request.success")
            }));
        },
    )
    .await
}

#[actix_rt::test]
async fn client_errors_are_warnings() {
    marquee_test(
        |_| (),
        |TestingTools {
             in_process_app,
             mut log_watcher,
             ..
         }| async move {
            let (status, _) = in_process_app.get("/search?lat=34&lon=-118").await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            assert!(log_watcher.has(|event| {
                event.level == Level::WARN && event.field_contains("message", "Request client error")
            }));
        },
    )
    .await
}

#[actix_rt::test]
async fn upstream_failures_are_logged_without_the_api_key() {
    marquee_test(
        |_| (),
        |TestingTools {
             in_process_app,
             ticketmaster_mock,
             mut log_watcher,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(format!("{}events.json", DISCOVERY_ROOT));
                    then.status(500).json_body(json!({"error": "boom"}));
                })
                .await;

            let (status, _) = in_process_app
                .get("/search?keyword=jazz&lat=34&lon=-118")
                .await;
            assert_eq!(status, StatusCode::BAD_GATEWAY);

            assert!(log_watcher
                .first_of_type("web.search.request")
                .map_or(false, |event| event.is_sensitive()));
            assert!(log_watcher.has(|event| {
                event.level == Level::WARN
                    && event.event_type() == Some("discovery.upstream.error")
            }));
            assert!(log_watcher.has(|event| {
                event.level == Level::ERROR && event.event_type() == Some("web.request.server-error")
            }));
            assert!(!log_watcher.mentions("test-ticketmaster-key"));
        },
    )
    .await
}

#[actix_rt::test]
async fn unreachable_upstream_does_not_reveal_the_api_key() {
    marquee_test(
        // Nothing listens on port 1.
        |settings| settings.ticketmaster.base_url = format!("http://127.0.0.1:1{}", DISCOVERY_ROOT),
        |TestingTools {
             in_process_app,
             mut log_watcher,
             ..
         }| async move {
            let (status, body) = in_process_app.get("/suggest?keyword=tay").await;
            assert_eq!(status, StatusCode::BAD_GATEWAY);

            let body = String::from_utf8_lossy(&body);
            assert!(body.contains("could not reach Ticketmaster"), "{}", body);
            assert!(!body.contains("test-ticketmaster-key"), "{}", body);

            assert!(log_watcher.has_type("web.upstream.error"));
            assert!(!log_watcher.mentions("test-ticketmaster-key"));
        },
    )
    .await
}
