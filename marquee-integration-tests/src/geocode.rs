//! Tests Marquee's address geocoding and reverse geocoding.
#![cfg(test)]

use crate::{marquee_test, TestingTools, GEOCODE_PATH};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[actix_rt::test]
async fn first_result_is_returned() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            let mock = geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(GEOCODE_PATH)
                        .query_param("address", "University of Southern California")
                        .query_param("key", "test-geocoding-key");
                    then.status(200).json_body(json!({
                        "status": "OK",
                        "results": [
                            {"geometry": {"location": {"lat": 34.0224, "lng": -118.2851}}},
                            {"geometry": {"location": {"lat": 1.0, "lng": 1.0}}}
                        ]
                    }));
                })
                .await;

            let response = test_client
                .get("/api/geocode?address=University%20of%20Southern%20California")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"lat": 34.0224, "lng": -118.2851}));
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn zero_results_is_not_found() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET).path(GEOCODE_PATH);
                    then.status(200)
                        .json_body(json!({"status": "ZERO_RESULTS", "results": []}));
                })
                .await;

            let response = test_client.get("/api/geocode?address=Atlantis").send().await?;

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "location not found"}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn rejected_requests_are_bad_gateways() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET).path(GEOCODE_PATH);
                    then.status(200).json_body(json!({
                        "status": "REQUEST_DENIED",
                        "error_message": "The provided API key is invalid.",
                        "results": []
                    }));
                })
                .await;

            let response = test_client.get("/api/geocode?address=Los%20Angeles").send().await?;

            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let body: Value = response.json().await?;
            assert_eq!(body["error"], json!("Upstream geocode request failed"));
            assert!(body["details"]
                .as_str()
                .map_or(false, |details| details.contains("REQUEST_DENIED")));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn address_is_required() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/api/geocode?address=").send().await?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "address is required"}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unconfigured_key_never_reaches_upstream() -> Result<()> {
    marquee_test(
        |settings| settings.geocoding.api_key = Some("  ".to_string()),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            let mock = geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET);
                    then.status(200).json_body(json!({"status": "OK", "results": []}));
                })
                .await;

            let response = test_client.get("/api/geocode?address=Los%20Angeles").send().await?;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "Geocoding API key not configured"}));
            mock.assert_hits_async(0).await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn reverse_geocoding_names_the_city() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            let mock = geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(GEOCODE_PATH)
                        .query_param("latlng", "34.0224,-118.2851")
                        .query_param("key", "test-geocoding-key");
                    then.status(200).json_body(json!({
                        "status": "OK",
                        "results": [{
                            "formatted_address": "Los Angeles, CA 90007, USA",
                            "address_components": [
                                {"long_name": "90007", "types": ["postal_code"]},
                                {"long_name": "Los Angeles", "types": ["locality", "political"]}
                            ]
                        }]
                    }));
                })
                .await;

            let response = test_client
                .get("/api/reverse-geocode?lat=34.0224&lng=-118.2851")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({"city": "Los Angeles", "fullAddress": "Los Angeles, CA 90007, USA"})
            );
            mock.assert_async().await;

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn reverse_geocoding_without_results_is_not_found() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET).path(GEOCODE_PATH);
                    then.status(200)
                        .json_body(json!({"status": "ZERO_RESULTS", "results": []}));
                })
                .await;

            let response = test_client.get("/api/reverse-geocode?lat=0&lng=-140").send().await?;

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body: Value = response.json().await?;
            assert_eq!(body, json!({"error": "location not found"}));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn invalid_positions_never_reach_upstream() -> Result<()> {
    marquee_test(
        |_| (),
        |TestingTools {
             test_client,
             geocoding_mock,
             ..
         }| async move {
            let mock = geocoding_mock
                .mock_async(|when, then| {
                    when.method(GET);
                    then.status(200).json_body(json!({"status": "OK", "results": []}));
                })
                .await;

            for (path, message) in [
                ("/api/reverse-geocode", "lat/lon are required"),
                ("/api/reverse-geocode?lat=34&lng=east", "invalid lat/lon"),
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
