//! Address geocoding, used when the browser cannot provide coordinates, and
//! reverse geocoding, which names the city the browser is in.

use crate::{
    error::{SetupError, UpstreamError},
    http::{self, Credential},
};
use async_trait::async_trait;
use marquee_settings::GeocodingSettings;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};

/// Service name used in errors and logs.
const GEOCODING: &str = "Google Geocoding";

/// A resolved position, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    #[allow(missing_docs)]
    pub lat: f64,
    #[allow(missing_docs)]
    pub lng: f64,
}

/// The place at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// The city, or the full address when no component names one.
    pub city: String,
    /// The formatted address of the best match.
    pub full_address: String,
}

/// Turns free form addresses into positions, and positions into places.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// A short name for the upstream, used in logs.
    fn name(&self) -> String;

    /// Resolve an address. `Ok(None)` when the address matches nothing.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, UpstreamError>;

    /// Name the place at `lat`, `lng`. `Ok(None)` when nothing is there, such
    /// as in the middle of an ocean.
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<Place>, UpstreamError>;
}

/// A [`Geocoder`] backed by the Google Geocoding API.
pub struct GoogleGeocoder {
    /// The HTTP client, carrying the configured timeout.
    client: reqwest::Client,
    /// The full endpoint URL.
    url: Url,
    /// The `key` sent with each request.
    api_key: String,
}

impl GoogleGeocoder {
    /// Create a geocoder from settings.
    ///
    /// # Errors
    /// If no API key is configured, the URL is unusable, or the HTTP client
    /// cannot be built.
    pub fn new(settings: &GeocodingSettings) -> Result<Self, SetupError> {
        let api_key = settings
            .credential()
            .ok_or(SetupError::MissingCredential(GEOCODING))?
            .to_string();
        let url = http::parse_base_url(&settings.base_url)?;
        let client = http::build_client(settings.timeout, settings.timeout)?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

impl GoogleGeocoder {
    /// Call the API with one lookup parameter.
    async fn lookup(&self, param: (&str, String)) -> Result<Value, UpstreamError> {
        http::get_json(
            &self.client,
            GEOCODING,
            self.url.clone(),
            &[param],
            Credential {
                param: "key",
                value: &self.api_key,
            },
        )
        .await
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    fn name(&self) -> String {
        GEOCODING.to_string()
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, UpstreamError> {
        let payload = self.lookup(("address", address.to_string())).await?;
        first_location(&payload)
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<Place>, UpstreamError> {
        let payload = self.lookup(("latlng", format!("{},{}", lat, lng))).await?;
        first_place(&payload)
    }
}

/// The first result of a geocoding response, after checking its `status`.
///
/// The API reports problems such as a rejected key with a 200 response and a
/// `status` other than `OK`. Those become [`UpstreamError::Rejected`], except
/// for `ZERO_RESULTS` which simply means nothing was found.
fn first_result(payload: &Value) -> Result<Option<&Value>, UpstreamError> {
    match payload.get("status").and_then(Value::as_str) {
        None | Some("OK") => Ok(payload.pointer("/results/0")),
        Some("ZERO_RESULTS") => Ok(None),
        Some(status) => Err(UpstreamError::Rejected {
            service: GEOCODING,
            status: status.to_string(),
            message: payload
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
    }
}

/// The location of the first result of a geocoding response.
///
/// # Errors
/// If the upstream rejected the request, or the first result has no usable
/// location.
pub fn first_location(payload: &Value) -> Result<Option<GeocodedLocation>, UpstreamError> {
    let first = match first_result(payload)? {
        Some(first) => first,
        None => return Ok(None),
    };

    first
        .pointer("/geometry/location")
        .ok_or_else(|| "first result has no location".to_string())
        .and_then(|location| {
            GeocodedLocation::deserialize(location).map_err(|error| error.to_string())
        })
        .map(Some)
        .map_err(|reason| UpstreamError::Decode {
            service: GEOCODING,
            reason,
        })
}

/// One result of a geocoding response, as far as naming a place needs.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocodeResult {
    /// The full address.
    #[serde_as(deserialize_as = "DefaultOnError")]
    formatted_address: Option<String>,
    /// The parts of the address, from most to least specific.
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    address_components: Vec<AddressComponent>,
}

/// One part of an address, such as a city or a county.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddressComponent {
    /// The unabbreviated name, such as "Los Angeles".
    #[serde_as(deserialize_as = "DefaultOnError")]
    long_name: Option<String>,
    /// What the part is, such as `locality`.
    #[serde_as(deserialize_as = "DefaultOnError")]
    types: Vec<String>,
}

/// Component types that can name a city, most preferred first.
const CITY_TYPES: [&str; 3] = [
    "locality",
    "administrative_area_level_3",
    "administrative_area_level_2",
];

impl GeocodeResult {
    /// The name of the first component having `kind` among its types.
    fn component(&self, kind: &str) -> Option<String> {
        self.address_components
            .iter()
            .filter(|component| component.types.iter().any(|t| t == kind))
            .find_map(|component| {
                let name = component.long_name.as_deref()?.trim();
                (!name.is_empty()).then(|| name.to_string())
            })
    }
}

/// The place named by the first result of a reverse geocoding response.
///
/// # Errors
/// If the upstream rejected the request, or the first result is not an
/// object.
pub fn first_place(payload: &Value) -> Result<Option<Place>, UpstreamError> {
    let first = match first_result(payload)? {
        Some(first) => first,
        None => return Ok(None),
    };
    if !first.is_object() {
        return Err(UpstreamError::Decode {
            service: GEOCODING,
            reason: "first result is not an object".to_string(),
        });
    }

    let result = GeocodeResult::deserialize(first).map_err(|error| UpstreamError::Decode {
        service: GEOCODING,
        reason: error.to_string(),
    })?;
    let full_address = result
        .formatted_address
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let city = CITY_TYPES
        .iter()
        .find_map(|kind| result.component(kind))
        .unwrap_or_else(|| full_address.clone());

    Ok(Some(Place { city, full_address }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn first_result_wins() {
        let payload = json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 34.0522, "lng": -118.2437}}},
                {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
            ]
        });
        assert_eq!(
            first_location(&payload).unwrap(),
            Some(GeocodedLocation {
                lat: 34.0522,
                lng: -118.2437
            })
        );
    }

    #[test]
    fn zero_results_is_none() {
        let payload = json!({"status": "ZERO_RESULTS", "results": []});
        assert_eq!(first_location(&payload).unwrap(), None);
        assert_eq!(first_location(&json!({"results": []})).unwrap(), None);
    }

    #[test]
    fn denied_requests_are_rejections() {
        let payload = json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        });
        let error = first_location(&payload).unwrap_err();
        assert!(matches!(error, UpstreamError::Rejected { .. }));
        assert!(error.details().contains("API key is invalid"));
    }

    #[test]
    fn result_without_location_is_a_decode_error() {
        let payload = json!({"status": "OK", "results": [{"geometry": {}}]});
        assert!(matches!(
            first_location(&payload),
            Err(UpstreamError::Decode { .. })
        ));
    }

    fn component(name: &str, types: &[&str]) -> Value {
        json!({"long_name": name, "short_name": name, "types": types})
    }

    #[test]
    fn locality_names_the_city() {
        let payload = json!({"status": "OK", "results": [{
            "formatted_address": "2301 N Highland Ave, Los Angeles, CA 90068, USA",
            "address_components": [
                component("2301", &["street_number"]),
                component("Los Angeles County", &["administrative_area_level_2", "political"]),
                component("Los Angeles", &["locality", "political"]),
            ]
        }]});
        assert_eq!(
            first_place(&payload).unwrap(),
            Some(Place {
                city: "Los Angeles".to_string(),
                full_address: "2301 N Highland Ave, Los Angeles, CA 90068, USA".to_string(),
            })
        );
    }

    #[test]
    fn city_falls_back_through_administrative_areas() {
        let payload = json!({"results": [{
            "formatted_address": "Somewhere, USA",
            "address_components": [
                component("Orange County", &["administrative_area_level_2"]),
                component("Township 4", &["administrative_area_level_3"]),
            ]
        }]});
        assert_eq!(first_place(&payload).unwrap().unwrap().city, "Township 4");

        let payload = json!({"results": [{
            "formatted_address": "Somewhere, USA",
            "address_components": [component("Orange County", &["administrative_area_level_2"])]
        }]});
        assert_eq!(first_place(&payload).unwrap().unwrap().city, "Orange County");
    }

    #[test]
    fn city_falls_back_to_the_full_address() {
        let payload = json!({"results": [{
            "formatted_address": "Pacific Ocean",
            "address_components": [component("", &["locality"]), "junk"]
        }]});
        assert_eq!(
            first_place(&payload).unwrap(),
            Some(Place {
                city: "Pacific Ocean".to_string(),
                full_address: "Pacific Ocean".to_string(),
            })
        );
    }

    #[test]
    fn reverse_lookup_statuses() {
        assert_eq!(first_place(&json!({"status": "ZERO_RESULTS"})).unwrap(), None);
        assert!(matches!(
            first_place(&json!({"status": "OVER_QUERY_LIMIT"})),
            Err(UpstreamError::Rejected { .. })
        ));
        assert!(matches!(
            first_place(&json!({"status": "OK", "results": [["Los Angeles"]]})),
            Err(UpstreamError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn reverse_geocoder_sends_position() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/maps/api/geocode/json")
                    .query_param("latlng", "34.0522,-118.2437")
                    .query_param("key", "geo-secret");
                then.status(200).json_body(json!({
                    "status": "OK",
                    "results": [{
                        "formatted_address": "Los Angeles, CA, USA",
                        "address_components": [component("Los Angeles", &["locality"])]
                    }]
                }));
            })
            .await;

        let geocoder = GoogleGeocoder::new(&GeocodingSettings {
            base_url: server.url("/maps/api/geocode/json"),
            api_key: Some("geo-secret".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let place = geocoder.reverse_geocode(34.0522, -118.2437).await.unwrap();

        mock.assert_async().await;
        assert_eq!(place.map(|place| place.city), Some("Los Angeles".to_string()));
    }

    #[tokio::test]
    async fn geocoder_sends_address_and_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/maps/api/geocode/json")
                    .query_param("address", "2301 N Highland Ave, Los Angeles")
                    .query_param("key", "geo-secret");
                then.status(200).json_body(json!({
                    "status": "OK",
                    "results": [{"geometry": {"location": {"lat": 34.11, "lng": -118.33}}}]
                }));
            })
            .await;

        let geocoder = GoogleGeocoder::new(&GeocodingSettings {
            base_url: server.url("/maps/api/geocode/json"),
            api_key: Some("geo-secret".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let location = geocoder
            .geocode("2301 N Highland Ave, Los Angeles")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            location,
            Some(GeocodedLocation {
                lat: 34.11,
                lng: -118.33
            })
        );
    }
}
