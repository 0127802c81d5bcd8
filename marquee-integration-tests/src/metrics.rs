//! Tests that Marquee reports metrics.
#![cfg(test)]

use crate::{marquee_test, TestingTools, DISCOVERY_ROOT};
use anyhow::Result;
use httpmock::Method::GET;
use reqwest::StatusCode;
use serde_json::json;

#[actix_rt::test]
async fn requests_are_timed() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             mut metrics_watcher,
             ..
         }| async move {
            let response = test_client.get("/health").send().await?;
            assert_eq!(response.status(), StatusCode::OK);

            assert!(metrics_watcher.has_timer(
                "request.duration",
                &[("path", "/health"), ("status", "200")]
            ));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn searches_count_results() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             mut metrics_watcher,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(format!("{}events.json", DISCOVERY_ROOT));
                    then.status(200).json_body(json!({"_embedded": {"events": [
                        {"id": "a"}, {"id": "b"}, {"id": "c"}
                    ]}}));
                })
                .await;

            let response = test_client
                .get("/search?keyword=jazz&lat=34&lon=-118")
                .send()
                .await?;
            assert_eq!(response.status(), StatusCode::OK);

            assert!(metrics_watcher.has_incr("upstream.search.success"));
            assert!(metrics_watcher.has_histogram("search.results", 3.0));
            assert!(!metrics_watcher.has_histogram("search.results", 0.0));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn upstream_errors_are_counted() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             mut metrics_watcher,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(format!("{}venues.json", DISCOVERY_ROOT));
                    then.status(503);
                })
                .await;

            let response = test_client.get("/venue?keyword=bowl").send().await?;
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

            assert!(metrics_watcher.has_incr("upstream.venue.error"));
            assert!(metrics_watcher.has_timer(
                "request.duration",
                &[("path", "/venue"), ("status", "502")]
            ));
            assert!(!metrics_watcher.has_incr("upstream.venue.success"));

            Ok(())
        },
    )
    .await
}
