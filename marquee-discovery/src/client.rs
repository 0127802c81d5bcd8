//! The Discovery API client.

use crate::{
    error::{SetupError, UpstreamError},
    http::{self, Credential},
    normalize::{self, EventDetail, EventSummary, VenueInfo},
    params,
    query::SearchQuery,
};
use async_trait::async_trait;
use marquee_settings::TicketmasterSettings;
use reqwest::Url;
use serde_json::Value;

/// Service name used in errors and logs.
const TICKETMASTER: &str = "Ticketmaster";

/// A source of event data. Each method makes exactly one upstream request and
/// returns a normalized result.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// An operator friendly name for this source.
    fn name(&self) -> String;

    /// Search for events near a position.
    async fn search_events(&self, query: &SearchQuery)
        -> Result<Vec<EventSummary>, UpstreamError>;

    /// Look up a single event by its upstream id.
    async fn event_detail(&self, id: &str) -> Result<EventDetail, UpstreamError>;

    /// Find the best matching venue for a keyword, if any venue matches.
    async fn find_venue(&self, keyword: &str) -> Result<Option<VenueInfo>, UpstreamError>;

    /// Suggest attraction names that complete a partial keyword.
    async fn suggest(&self, keyword: &str) -> Result<Vec<String>, UpstreamError>;
}

/// An [`EventSource`] backed by the Ticketmaster Discovery API.
pub struct TicketmasterClient {
    /// The HTTP client, carrying the configured timeouts.
    client: reqwest::Client,
    /// The API root that endpoint paths are appended to.
    base_url: Url,
    /// The `apikey` sent with each request.
    api_key: String,
    /// Search behavior settings, such as page size and position encoding.
    settings: TicketmasterSettings,
}

impl TicketmasterClient {
    /// Create a client from settings.
    ///
    /// # Errors
    /// If no API key is configured, the base URL is unusable, or the HTTP
    /// client cannot be built.
    pub fn new(settings: &TicketmasterSettings) -> Result<Self, SetupError> {
        let api_key = settings
            .credential()
            .ok_or(SetupError::MissingCredential(TICKETMASTER))?
            .to_string();
        let base_url = http::parse_base_url(&settings.base_url)?;
        let client = http::build_client(settings.timeout, settings.connect_timeout)?;

        Ok(Self {
            client,
            base_url,
            api_key,
            settings: settings.clone(),
        })
    }

    /// The URL of an endpoint below the API root. Segments are percent
    /// encoded, so ids can't escape their path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make one request to an endpoint.
    async fn get(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Value, UpstreamError> {
        http::get_json(
            &self.client,
            TICKETMASTER,
            self.endpoint(segments),
            params,
            Credential {
                param: "apikey",
                value: &self.api_key,
            },
        )
        .await
    }
}

#[async_trait]
impl EventSource for TicketmasterClient {
    fn name(&self) -> String {
        "TicketmasterClient".to_owned()
    }

    async fn search_events(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<EventSummary>, UpstreamError> {
        let params = params::search_parameters(query, &self.settings);
        let payload = self.get(&["events.json"], &params).await?;
        Ok(normalize::event_summaries(&payload))
    }

    async fn event_detail(&self, id: &str) -> Result<EventDetail, UpstreamError> {
        let file = format!("{}.json", id);
        let payload = self.get(&["events", &file], &[]).await?;
        normalize::event_detail(&payload).map_err(|error| UpstreamError::Decode {
            service: TICKETMASTER,
            reason: error.to_string(),
        })
    }

    async fn find_venue(&self, keyword: &str) -> Result<Option<VenueInfo>, UpstreamError> {
        let params = [("keyword", keyword.to_string()), ("size", "1".to_string())];
        let payload = self.get(&["venues.json"], &params).await?;
        Ok(normalize::venue(&payload))
    }

    async fn suggest(&self, keyword: &str) -> Result<Vec<String>, UpstreamError> {
        let params = [("keyword", keyword.to_string())];
        let payload = self.get(&["suggest"], &params).await?;
        Ok(normalize::suggestions(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use marquee_settings::LocationEncoding;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn settings(base_url: String) -> TicketmasterSettings {
        TicketmasterSettings {
            base_url,
            api_key: Some("secret".to_string()),
            location_encoding: LocationEncoding::Geohash,
            page_size: 20,
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        }
    }

    fn client(server: &MockServer) -> TicketmasterClient {
        TicketmasterClient::new(&settings(server.url("/discovery/v2/")))
            .expect("client should build")
    }

    #[test]
    fn missing_key_is_a_setup_error() {
        let mut settings = settings("https://example.com/".to_string());
        settings.api_key = Some("".to_string());
        assert!(matches!(
            TicketmasterClient::new(&settings),
            Err(SetupError::MissingCredential(_))
        ));
    }

    #[test]
    fn unusable_base_url_is_a_setup_error() {
        assert!(matches!(
            TicketmasterClient::new(&settings("not a url".to_string())),
            Err(SetupError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            TicketmasterClient::new(&settings("mailto:events@example.com".to_string())),
            Err(SetupError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn endpoints_are_appended_to_the_root() {
        let client = TicketmasterClient::new(&settings(
            "https://app.ticketmaster.com/discovery/v2/".to_string(),
        ))
        .unwrap();
        assert_eq!(
            client.endpoint(&["events.json"]).as_str(),
            "https://app.ticketmaster.com/discovery/v2/events.json"
        );
        assert_eq!(
            client.endpoint(&["events", "a/b.json"]).as_str(),
            "https://app.ticketmaster.com/discovery/v2/events/a%2Fb.json"
        );
    }

    #[tokio::test]
    async fn search_sends_parameters_and_normalizes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/discovery/v2/events.json")
                    .query_param("apikey", "secret")
                    .query_param("keyword", "jazz night")
                    .query_param("geoPoint", "9q5ctr1")
                    .query_param("radius", "10")
                    .query_param("unit", "miles")
                    .query_param("sort", "date,asc")
                    .query_param("size", "20")
                    .query_param("segmentId", "KZFzniwnSyZfZ7v7nJ");
                then.status(200).json_body(json!({
                    "_embedded": {"events": [{"id": "e1", "name": "Jazz Night"}]}
                }));
            })
            .await;

        let query = SearchQuery {
            keyword: "jazz night".to_string(),
            category: "music".to_string(),
            distance: 10.0,
            latitude: 34.0522,
            longitude: -118.2437,
        };
        let events = client(&server).search_events(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "Jazz Night");
    }

    #[tokio::test]
    async fn detail_of_unknown_event_is_a_status_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/discovery/v2/events/nope.json");
                then.status(404).body("Resource not found");
            })
            .await;

        let error = client(&server).event_detail("nope").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.upstream_status(), Some(404));
        assert!(error.details().contains("Resource not found"));
    }

    #[tokio::test]
    async fn detail_that_is_not_an_object_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/discovery/v2/events/e1.json");
                then.status(200).json_body(json!(["e1"]));
            })
            .await;

        let error = client(&server).event_detail("e1").await.unwrap_err();
        assert!(matches!(error, UpstreamError::Decode { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/discovery/v2/suggest");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let error = client(&server).suggest("tay").await.unwrap_err();
        assert!(matches!(error, UpstreamError::Decode { .. }));
        assert!(!error.details().contains("secret"), "{}", error.details());
    }

    #[tokio::test]
    async fn venue_lookup_asks_for_one_result() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/discovery/v2/venues.json")
                    .query_param("keyword", "Hollywood Bowl")
                    .query_param("size", "1");
                then.status(200).json_body(json!({"page": {"totalElements": 0}}));
            })
            .await;

        let venue = client(&server).find_venue("Hollywood Bowl").await.unwrap();

        mock.assert_async().await;
        assert_eq!(venue, None);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        // Nothing listens on port 1.
        let client = TicketmasterClient::new(&settings("http://127.0.0.1:1/".to_string())).unwrap();
        let error = client.suggest("tay").await.unwrap_err();
        assert!(matches!(error, UpstreamError::Transport { .. }));
    }

    #[tokio::test]
    async fn transport_errors_do_not_reveal_the_key() {
        let client = TicketmasterClient::new(&settings("http://127.0.0.1:1/".to_string())).unwrap();
        let error = client.suggest("tay").await.unwrap_err();
        assert!(!error.details().contains("secret"), "{}", error.details());
        assert!(!format!("{:?}", error).contains("secret"), "{:?}", error);
    }
}
