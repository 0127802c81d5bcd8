//! Web handlers for geocoding addresses and naming positions.

use actix_web::{
    get,
    web::{Data, Query},
    HttpResponse,
};
use cadence::StatsdClient;
use marquee_discovery::{position, ValidationError};
use serde::Deserialize;

use super::{record_outcome, required};
use crate::{
    errors::{HandlerError, HandlerErrorKind},
    upstreams::Upstreams,
};

/// Query parameters for geocoding.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeocodeQuery {
    /// A free form address.
    address: Option<String>,
}

/// The position of an address, as `{"lat": .., "lng": ..}`.
#[get("/geocode")]
#[tracing::instrument(skip_all)]
pub(crate) async fn geocode(
    query: Query<GeocodeQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let geocoder = upstreams.geocoder()?;
    let address = required(&query.address, ValidationError::MissingParameter("address"))?;

    tracing::info!(
        r#type = "web.geocode.request",
        sensitive = true,
        %address,
        "Geocoding address"
    );
    let location = record_outcome(
        &metrics_client,
        &geocoder.name(),
        "geocode",
        geocoder.geocode(address).await,
    )?
    .ok_or(HandlerErrorKind::NotFound("location not found"))?;

    Ok(HttpResponse::Ok().json(location))
}

/// Query parameters for reverse geocoding.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReverseGeocodeQuery {
    /// Latitude in degrees.
    lat: Option<String>,
    /// Longitude in degrees.
    lng: Option<String>,
}

/// The city at a position, as `{"city": .., "fullAddress": ..}`.
#[get("/reverse-geocode")]
#[tracing::instrument(skip_all)]
pub(crate) async fn reverse_geocode(
    query: Query<ReverseGeocodeQuery>,
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> Result<HttpResponse, HandlerError> {
    let geocoder = upstreams.geocoder()?;
    let (lat, lng) = position(&query.lat, &query.lng)?;

    tracing::info!(
        r#type = "web.reverse-geocode.request",
        sensitive = true,
        lat,
        lng,
        "Naming position"
    );
    let place = record_outcome(
        &metrics_client,
        &geocoder.name(),
        "reverse-geocode",
        geocoder.reverse_geocode(lat, lng).await,
    )?
    .ok_or(HandlerErrorKind::NotFound("location not found"))?;

    Ok(HttpResponse::Ok().json(place))
}

#[cfg(test)]
mod tests {
    use crate::{app, Upstreams};
    use actix_web::{http::StatusCode, test, web::Data};
    use async_trait::async_trait;
    use cadence::{NopMetricSink, StatsdClient};
    use marquee_discovery::{GeocodedLocation, Geocoder, Place, UpstreamError};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Knows exactly one address, which is at the only position it can name.
    struct OneAddress;

    #[async_trait]
    impl Geocoder for OneAddress {
        fn name(&self) -> String {
            "one-address".to_string()
        }

        async fn geocode(
            &self,
            address: &str,
        ) -> Result<Option<GeocodedLocation>, UpstreamError> {
            Ok((address == "Hollywood Bowl").then(|| GeocodedLocation {
                lat: 34.11,
                lng: -118.33,
            }))
        }

        async fn reverse_geocode(
            &self,
            lat: f64,
            lng: f64,
        ) -> Result<Option<Place>, UpstreamError> {
            if lat > 80.0 {
                return Err(UpstreamError::Rejected {
                    service: "one-address",
                    status: "OVER_QUERY_LIMIT".to_string(),
                    message: String::new(),
                });
            }
            Ok(((lat, lng) == (34.11, -118.33)).then(|| Place {
                city: "Los Angeles".to_string(),
                full_address: "2301 N Highland Ave, Los Angeles, CA 90068, USA".to_string(),
            }))
        }
    }

    async fn get(geocoder: Option<Arc<dyn Geocoder>>, uri: &str) -> (StatusCode, Value) {
        let upstreams = Upstreams {
            events: None,
            geocoder,
        };
        let metrics_client = StatsdClient::from_sink("", NopMetricSink);
        let service =
            test::init_service(app(Data::new(upstreams), Data::new(metrics_client))).await;
        let response =
            test::call_service(&service, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn known_address() {
        let (status, body) = get(
            Some(Arc::new(OneAddress)),
            "/api/geocode?address=Hollywood%20Bowl",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"lat": 34.11, "lng": -118.33}));
    }

    #[actix_rt::test]
    async fn unknown_address_is_not_found() {
        let (status, body) = get(Some(Arc::new(OneAddress)), "/api/geocode?address=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "location not found"}));
    }

    #[actix_rt::test]
    async fn address_is_required() {
        let (status, body) = get(Some(Arc::new(OneAddress)), "/api/geocode").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "address is required"}));
    }

    #[actix_rt::test]
    async fn missing_key_is_a_server_error() {
        let (status, body) = get(None, "/api/geocode?address=Hollywood%20Bowl").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Geocoding API key not configured"}));
    }

    #[actix_rt::test]
    async fn known_position() {
        let (status, body) = get(
            Some(Arc::new(OneAddress)),
            "/api/reverse-geocode?lat=34.11&lng=-118.33",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "city": "Los Angeles",
                "fullAddress": "2301 N Highland Ave, Los Angeles, CA 90068, USA"
            })
        );
    }

    #[actix_rt::test]
    async fn unknown_position_is_not_found() {
        let (status, body) =
            get(Some(Arc::new(OneAddress)), "/api/reverse-geocode?lat=0&lng=0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "location not found"}));
    }

    #[actix_rt::test]
    async fn reverse_lookup_validates_position() {
        for (uri, message) in [
            ("/api/reverse-geocode?lat=34.11", "lat/lon are required"),
            ("/api/reverse-geocode?lat=34.11&lng=", "lat/lon are required"),
            ("/api/reverse-geocode?lat=95&lng=0", "invalid lat/lon"),
        ] {
            let (status, body) = get(Some(Arc::new(OneAddress)), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, json!({ "error": message }), "{}", uri);
        }
    }

    #[actix_rt::test]
    async fn reverse_lookup_checks_the_key_first() {
        let (status, body) = get(None, "/api/reverse-geocode").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Geocoding API key not configured"}));
    }

    #[actix_rt::test]
    async fn rejected_reverse_lookup_is_a_bad_gateway() {
        let (status, body) =
            get(Some(Arc::new(OneAddress)), "/api/reverse-geocode?lat=85&lng=0").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], json!("Upstream reverse-geocode request failed"));
    }
}
