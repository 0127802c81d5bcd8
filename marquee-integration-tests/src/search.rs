//! Tests Marquee's event search.
#![cfg(test)]

use crate::{marquee_test, TestingTools, DISCOVERY_ROOT};
use anyhow::Result;
use httpmock::{Method::GET, MockServer};
use marquee_settings::LocationEncoding;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// The path of the event search endpoint on the Ticketmaster mock.
fn events_path() -> String {
    format!("{}events.json", DISCOVERY_ROOT)
}

/// A Discovery API search response with one fully populated event and one
/// event missing almost everything.
fn two_events() -> Value {
    json!({
        "_embedded": {
            "events": [
                {
                    "id": "G5vYZ9dXz1",
                    "name": "Jazz at the Bowl",
                    "url": "https://www.ticketmaster.com/event/G5vYZ9dXz1",
                    "dates": {"start": {"localDate": "2024-05-01", "localTime": "19:30:00"}},
                    "images": [
                        {"url": "https://img/100.jpg", "width": 100},
                        {"url": "https://img/180.jpg", "width": 180},
                        {"url": "https://img/400.jpg", "width": 400}
                    ],
                    "classifications": [{"segment": {"name": "Music"}, "genre": {"name": "Jazz"}}],
                    "_embedded": {"venues": [{"name": "Hollywood Bowl"}]}
                },
                {"id": "sparse", "dates": {"start": {"localDate": "2024-05-02"}}}
            ]
        },
        "page": {"size": 20, "totalElements": 2}
    })
}

#[actix_rt::test]
async fn search_normalizes_events() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(events_path())
                        .query_param("apikey", "test-ticketmaster-key")
                        .query_param("keyword", "jazz")
                        .query_param("geoPoint", "9q5ctr1")
                        .query_param("radius", "10")
                        .query_param("unit", "miles")
                        .query_param("sort", "date,asc")
                        .query_param("size", "20");
                    then.status(200).json_body(two_events());
                })
                .await;

            let response = test_client
                .get("/search?keyword=jazz&lat=34.0522&lon=-118.2437")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"events": [
                    {
                        "id": "G5vYZ9dXz1",
                        "event": "Jazz at the Bowl",
                        "date": "2024-05-01 19:30:00",
                        "venue": "Hollywood Bowl",
                        "genre": "Music",
                        "icon": "https://img/180.jpg"
                    },
                    {
                        "id": "sparse",
                        "event": "",
                        "date": "2024-05-02",
                        "venue": "",
                        "genre": "",
                        "icon": ""
                    }
                ]})
            );
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn search_filters_by_category_and_distance() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(events_path())
                        .query_param("segmentId", "KZFzniwnSyZfZ7v7nE")
                        .query_param("radius", "2.5");
                    then.status(200).json_body(json!({"page": {"totalElements": 0}}));
                })
                .await;

            let response = test_client
                .get("/search?keyword=lakers&category=Sports&distance=2.5&lat=34.04&lon=-118.26")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"events": []}));
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn search_can_send_raw_coordinates() -> Result<()> {
    marquee_test(
        |settings| settings.ticketmaster.location_encoding = LocationEncoding::LatLong,
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(events_path())
                        .query_param("latlong", "34.0522,-118.2437");
                    then.status(200).json_body(json!({}));
                })
                .await;

            let response = test_client
                .get("/search?keyword=jazz&lat=34.0522&lon=-118.2437")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

/// Mock every request to the Discovery API, so tests can check it was never
/// called.
async fn mock_anything(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({}));
        })
        .await
}

#[actix_rt::test]
async fn invalid_searches_never_reach_upstream() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = mock_anything(&ticketmaster_mock).await;

            for (path, message) in [
                ("/search?lat=34&lon=-118", "keyword is required"),
                ("/search?keyword=%20%20&lat=34&lon=-118", "keyword is required"),
                ("/search?keyword=jazz&lat=34", "lat/lon are required"),
                ("/search?keyword=jazz&lat=north&lon=-118", "invalid lat/lon"),
                ("/search?keyword=jazz&lat=34&lon=-181", "invalid lat/lon"),
                (
                    "/search?keyword=jazz&lat=34&lon=-118&distance=-3",
                    "distance must be a positive number",
                ),
                (
                    "/search?keyword=jazz&lat=34&lon=-118&distance=far",
                    "distance must be a positive number",
                ),
            ] {
                let response = test_client.get(path).send().await?;
                assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
                let body: Value = response.json().await?;
                assert_eq!(body, json!({ "error": message }), "{}", path);
            }

            mock.assert_hits_async(0).await;
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unconfigured_key_short_circuits_every_event_route() -> Result<()> {
    marquee_test(
        |settings| settings.ticketmaster.api_key = None,
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = mock_anything(&ticketmaster_mock).await;

            for path in [
                "/search?keyword=jazz&lat=34&lon=-118",
                "/search",
                "/event?id=G5vYZ9dXz1",
                "/venue?keyword=Hollywood%20Bowl",
                "/suggest?keyword=tay",
            ] {
                let response = test_client.get(path).send().await?;
                assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
                let body: Value = response.json().await?;
                assert_eq!(
                    body,
                    json!({"error": "Ticketmaster API key not configured"}),
                    "{}",
                    path
                );
            }

            mock.assert_hits_async(0).await;
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn upstream_failures_are_bad_gateways() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(events_path());
                    then.status(401)
                        .json_body(json!({"fault": {"faultstring": "Invalid ApiKey"}}));
                })
                .await;

            let response = test_client
                .get("/search?keyword=jazz&lat=34&lon=-118")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(body["error"], json!("Upstream search request failed"));
            let details = body["details"].as_str().unwrap_or_default();
            assert!(details.contains("status 401"), "{}", details);
            assert!(details.contains("Invalid ApiKey"), "{}", details);

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unreadable_upstream_response_is_a_bad_gateway() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(events_path());
                    then.status(200).body("<html>Service Unavailable</html>");
                })
                .await;

            let response = test_client
                .get("/search?keyword=jazz&lat=34&lon=-118")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

            Ok(())
        },
    )
    .await
}
