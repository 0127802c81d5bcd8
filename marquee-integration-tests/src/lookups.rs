//! Tests Marquee's event, venue, and keyword lookups.
#![cfg(test)]

use crate::{marquee_test, TestingTools, DISCOVERY_ROOT};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[actix_rt::test]
async fn event_detail_is_normalized() -> Result<()> {
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
                        .path(format!("{}events/G5vYZ9dXz1.json", DISCOVERY_ROOT))
                        .query_param("apikey", "test-ticketmaster-key");
                    then.status(200).json_body(json!({
                        "id": "G5vYZ9dXz1",
                        "name": "Jazz at the Bowl",
                        "url": "https://www.ticketmaster.com/event/G5vYZ9dXz1",
                        "dates": {
                            "start": {"localDate": "2024-05-01", "localTime": "19:30:00"},
                            "status": {"code": "onsale"}
                        },
                        "classifications": [{
                            "segment": {"name": "Music"},
                            "genre": {"name": "Music"},
                            "subGenre": {"name": "Jazz"},
                            "type": {"name": "Undefined"},
                            "subType": {"name": ""}
                        }],
                        "priceRanges": [{"min": 25, "max": 75.5, "currency": "USD"}],
                        "seatmap": {"staticUrl": "https://maps/seatmap.gif"},
                        "_embedded": {
                            "venues": [{"name": "Hollywood Bowl"}],
                            "attractions": [
                                {"name": "Kamasi Washington", "url": "https://tm/kamasi"},
                                {"name": "Thundercat"}
                            ]
                        }
                    }));
                })
                .await;

            let response = test_client.get("/event?id=G5vYZ9dXz1").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"event": {
                    "id": "G5vYZ9dXz1",
                    "name": "Jazz at the Bowl",
                    "date": "2024-05-01",
                    "time": "19:30:00",
                    "status": "onsale",
                    "genres": ["Music", "Jazz", "Undefined"],
                    "artists": [
                        {"name": "Kamasi Washington", "url": "https://tm/kamasi"},
                        {"name": "Thundercat", "url": ""}
                    ],
                    "venueName": "Hollywood Bowl",
                    "buyUrl": "https://www.ticketmaster.com/event/G5vYZ9dXz1",
                    "seatmap": "https://maps/seatmap.gif",
                    "priceRange": "25 - 75.5 USD"
                }})
            );
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unknown_event_is_a_bad_gateway() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(format!("{}events/missing.json", DISCOVERY_ROOT));
                    then.status(404).json_body(json!({"errors": [{"detail": "Resource not found"}]}));
                })
                .await;

            let response = test_client.get("/event?id=missing").send().await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(body["error"], json!("Upstream event request failed"));
            assert!(body["details"]
                .as_str()
                .map_or(false, |details| details.contains("status 404")));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn event_requires_an_id() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/event").send().await?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "event id is required"}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn venue_is_normalized() -> Result<()> {
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
                        .path(format!("{}venues.json", DISCOVERY_ROOT))
                        .query_param("keyword", "Hollywood Bowl")
                        .query_param("size", "1");
                    then.status(200).json_body(json!({"_embedded": {"venues": [{
                        "name": "Hollywood Bowl",
                        "url": "https://tm/venue/1",
                        "address": {"line1": "2301 N Highland Ave"},
                        "city": {"name": "Los Angeles"},
                        "state": {"stateCode": "CA"},
                        "images": [{"url": "https://img/bowl.jpg"}]
                    }]}}));
                })
                .await;

            let response = test_client
                .get("/venue?keyword=Hollywood%20Bowl")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"venue": {
                    "name": "Hollywood Bowl",
                    "address": "2301 N Highland Ave",
                    "city": "Los Angeles",
                    "state": "CA",
                    "postalCode": "N/A",
                    "url": "https://tm/venue/1",
                    "image": "https://img/bowl.jpg"
                }})
            );
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn venue_without_matches_is_null() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET).path(format!("{}venues.json", DISCOVERY_ROOT));
                    then.status(200)
                        .json_body(json!({"page": {"size": 1, "totalElements": 0}}));
                })
                .await;

            let response = test_client.get("/venue?keyword=nowhere").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({ "venue": null }));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn suggestions_are_attraction_names() -> Result<()> {
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
                        .path(format!("{}suggest", DISCOVERY_ROOT))
                        .query_param("keyword", "tay");
                    then.status(200).json_body(json!({"_embedded": {"attractions": [
                        {"name": "Taylor Swift"},
                        {"name": "Tayc"},
                        {"name": ""}
                    ]}}));
                })
                .await;

            let response = test_client.get("/suggest?keyword=tay").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"suggestions": ["Taylor Swift", "Tayc"]}));
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn blank_suggestion_keyword_skips_upstream() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             ticketmaster_mock,
             ..
         }| async move {
            let mock = ticketmaster_mock
                .mock_async(|when, then| {
                    when.method(GET);
                    then.status(200).json_body(json!({}));
                })
                .await;

            let response = test_client.get("/suggest?keyword=").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"suggestions": []}));
            mock.assert_hits_async(0).await;

            Ok(())
        },
    )
    .await
}
