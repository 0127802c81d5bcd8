//! Tests the health check and cross-origin behavior shared by every route.
#![cfg(test)]

use crate::{marquee_test, TestingTools};
use anyhow::Result;
use pretty_assertions::assert_eq;
use reqwest::{header::HeaderValue, StatusCode};
use serde_json::{json, Value};

#[actix_rt::test]
async fn health_works() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/health").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response
                    .headers()
                    .get_all("content-type")
                    .iter()
                    .collect::<Vec<_>>(),
                vec!["application/json"]
            );
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"ok": true}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn health_does_not_need_credentials() -> Result<()> {
    marquee_test(
        |settings| {
            settings.ticketmaster.api_key = None;
            settings.geocoding.api_key = None;
        },
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/health").send().await?;
            assert_eq!(response.status(), StatusCode::OK);
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn cross_origin_requests_are_allowed() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client
                .get("/health")
                .header("Origin", "https://events.example.com")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get("access-control-allow-origin"),
                Some(&HeaderValue::from_static("https://events.example.com"))
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unknown_routes_are_not_found() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/favorites").send().await?;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            Ok(())
        },
    )
    .await
}
