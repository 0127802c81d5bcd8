//! Tools for running tests

use crate::utils::{logging::LogWatcher, metrics::MetricsWatcher};
use actix_web::{
    http::StatusCode,
    test::{call_service, init_service, read_body, TestRequest},
    web::{Bytes, Data},
};
use cadence::StatsdClient;
use httpmock::MockServer;
use marquee_settings::Settings;
use marquee_web::Upstreams;
use reqwest::{redirect, Client, ClientBuilder, RequestBuilder};
use std::{future::Future, net::TcpListener};
use tracing::instrument::{Instrument, WithSubscriber};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt};

/// The path below the Ticketmaster mock server that Marquee is configured to
/// treat as the Discovery API root.
pub const DISCOVERY_ROOT: &str = "/discovery/v2/";

/// The path of the geocoding endpoint on the geocoding mock server.
pub const GEOCODE_PATH: &str = "/maps/api/geocode/json";

/// Run a test with a fully configured Marquee server.
///
/// The server will listen on a port assigned arbitrarily by the OS.
///
/// A suite of tools will be passed to the test function in the form of an
/// instance of [`TestingTools`]. It includes an HTTP client configured to use
/// the test server, HTTP mock servers that Marquee's upstreams have been
/// configured to use, and collectors to make assertions about logs and metrics.
///
/// `settings_changer` runs after the mock servers are configured, so tests can
/// still remove credentials or change encodings.
///
/// # Example
///
/// ```
/// # use marquee_integration_tests::{marquee_test, TestingTools};
/// #[actix_rt::test]
/// async fn a_test() {
///     marquee_test(
///         |settings| settings.http.workers = Some(2),
///         |TestingTools { test_client, .. }| async move {
///             assert!(true) // Test goes here
///         }
///     ).await
/// }
/// ```
///
/// # Panics
/// May panic if tests could not be set up correctly.
pub async fn marquee_test<FSettings, FTest, Fut>(
    settings_changer: FSettings,
    test: FTest,
) -> Fut::Output
where
    FSettings: FnOnce(&mut Settings),
    FTest: FnOnce(TestingTools) -> Fut,
    Fut: Future,
{
    let test_span = tracing::info_span!("marquee_test");

    // Load settings
    let mut settings = Settings::load_for_tests(|_| ());

    // Set up logging
    let log_watcher = LogWatcher::default();
    let log_watcher_writer = log_watcher.make_writer();

    let env_filter: tracing_subscriber::EnvFilter = (&settings.logging.levels).into();
    let tracing_subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(move || log_watcher_writer.clone()),
        )
        .with(tracing_subscriber::fmt::layer().pretty().with_test_writer());

    let _tracing_subscriber_guard = tracing::subscriber::set_default(tracing_subscriber);

    // Set up mock servers for the upstreams to talk to
    let ticketmaster_mock = MockServer::start_async().await;
    settings.ticketmaster.base_url = ticketmaster_mock.url(DISCOVERY_ROOT);
    let geocoding_mock = MockServer::start_async().await;
    settings.geocoding.base_url = geocoding_mock.url(GEOCODE_PATH);

    settings_changer(&mut settings);

    // Setup metrics
    assert_eq!(
        settings.metrics.sink_host, "0.0.0.0",
        "Tests cannot change the metrics sink host, since it is ignored"
    );
    assert_eq!(
        settings.metrics.sink_port, 8125,
        "Tests cannot change the metrics sink address, since it is ignored"
    );
    let (metrics_watcher, metrics_client) = MetricsWatcher::new_with_client();

    // An app that serves requests on the test's own thread, so that its logs
    // reach the log watcher.
    let in_process_app = InProcessApp {
        upstreams: Data::new(
            Upstreams::from_settings(&settings).expect("Failed to set up upstreams"),
        ),
        metrics_client: Data::new(metrics_client.clone()),
    };

    // Run server in the background
    let listener = TcpListener::bind(settings.http.listen).expect("Failed to bind to a port");
    let address = listener.local_addr().unwrap().to_string();
    let server =
        marquee_web::run(listener, metrics_client, settings).expect("Failed to start server");
    let server_handle = tokio::spawn(server.with_current_subscriber());
    let test_client = TestReqwestClient::new(address);

    // Assemble the tools
    let tools = TestingTools {
        test_client,
        in_process_app,
        ticketmaster_mock,
        geocoding_mock,
        log_watcher,
        metrics_watcher,
    };
    // Run the test
    let rv = test(tools).instrument(test_span).await;
    server_handle.abort();
    rv
}

/// A set of tools for tests, including mock servers and logging helpers.
///
/// The fields of this struct are marked as non-exhaustive, meaning that any
/// destructuring of this struct will require a `..` "and the rest" entry, even
/// if all present items are named. This makes adding tools in the future easier,
/// since old tests won't need to be rewritten to account for the added tools.
#[non_exhaustive]
pub struct TestingTools {
    /// A wrapper around a `reqwest::client` that automatically uses the Marquee
    /// server under test.
    pub test_client: TestReqwestClient,

    /// The same app as the server under test, called directly instead of over
    /// the network. Use this when asserting on request logs.
    pub in_process_app: InProcessApp,

    /// A [`httpmock::MockServer`] that Marquee uses as the Discovery API, rooted
    /// at [`DISCOVERY_ROOT`]. Does not contain mock responses, any needed must
    /// be added.
    pub ticketmaster_mock: MockServer,

    /// A [`httpmock::MockServer`] that Marquee uses for geocoding, at
    /// [`GEOCODE_PATH`]. Does not contain mock responses.
    pub geocoding_mock: MockServer,

    /// To make assertions about logs.
    pub log_watcher: LogWatcher,

    /// To make assertions about metrics.
    pub metrics_watcher: MetricsWatcher,
}

/// A wrapper around a `[reqwest::client]` that automatically sends requests to
/// the test server.
///
/// This only handles `GET` requests right now. Other methods should be
/// added as needed.
///
/// The client is configured to not follow any redirects.
pub struct TestReqwestClient {
    /// The wrapped client.
    client: Client,

    /// The server address to implicitly use for all requests.
    address: String,
}

impl TestReqwestClient {
    /// Construct a new test client that uses `address` for every request given.
    pub fn new(address: String) -> Self {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Could not build test client");
        Self { client, address }
    }

    /// Start building a GET request to the test server with the path specified.
    ///
    /// The path should start with `/`, such as `/health`.
    pub fn get(&self, path: &str) -> RequestBuilder {
        assert!(path.starts_with('/'));
        let url = format!("http://{}{}", &self.address, path);
        self.client.get(url)
    }
}

/// Serves requests through the full app, middleware included, on the calling
/// thread.
///
/// The server under test runs its workers on other threads, where the test's
/// log subscriber is not installed.
pub struct InProcessApp {
    /// Clients configured from the same settings as the server under test.
    upstreams: Data<Upstreams>,
    /// Shares its sink with the metrics watcher.
    metrics_client: Data<StatsdClient>,
}

impl InProcessApp {
    /// Send a GET request for `path` and return the response status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, Bytes) {
        let service = init_service(marquee_web::app(
            self.upstreams.clone(),
            self.metrics_client.clone(),
        ))
        .await;
        let response = call_service(&service, TestRequest::get().uri(path).to_request()).await;
        let status = response.status();
        (status, read_body(response).await)
    }
}
