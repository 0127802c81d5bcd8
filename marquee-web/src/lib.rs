#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Web server for [Marquee](../marquee/index.html)'s public API.

mod endpoints;
mod errors;
mod health;
mod logging;
mod middleware;
mod upstreams;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse},
    error::QueryPayloadError,
    web::{self, Data},
    App, HttpRequest, HttpServer,
};
use anyhow::Result;
use cadence::StatsdClient;
use marquee_settings::Settings;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use crate::errors::{HandlerError, HandlerErrorKind};
pub use crate::logging::MarqueeRootSpanBuilder;
pub use crate::upstreams::Upstreams;

/// Run the web server
///
/// The returned server is a `Future` that must either be `.await`ed, or run it
/// as a background task using `tokio::spawn`.
///
/// Most of the details from `settings` will be respected, except for those that
/// go into building the listener (the host and port). If you want to respect the
/// settings specified in that object, you must include them in the construction
/// of `listener`.
///
/// # Errors
///
/// Returns an error if an upstream client cannot be built from the settings, or
/// if the server cannot be started on the provided listener.
///
/// # Examples
///
/// Run the server in the foreground. This will only return if there is an error
/// that causes the server to shut down. This is used to run Marquee as a
/// service, such as in production.
///
/// ```no_run
/// # tokio_test::block_on(async {
/// let listener = std::net::TcpListener::bind("127.0.0.1:8080")
///     .expect("Failed to bind port");
/// let settings = marquee_settings::Settings::load()
///     .expect("Failed to load settings");
/// let metrics_client = cadence::StatsdClient::from_sink("marquee", cadence::NopMetricSink);
/// marquee_web::run(listener, metrics_client, settings)
///     .expect("Failed to start server")
///     .await
///     .expect("Fatal error while running server");
/// # })
/// ```
pub fn run(
    listener: TcpListener,
    metrics_client: StatsdClient,
    settings: Settings,
) -> Result<Server> {
    let upstreams = Data::new(Upstreams::from_settings(&settings)?);
    let metrics_client = Data::new(metrics_client);

    let mut server = HttpServer::new(move || app(upstreams.clone(), metrics_client.clone()))
        .listen(listener)?;

    if let Some(n) = settings.http.workers {
        server = server.workers(n);
    }

    let server = server.run();
    Ok(server)
}

/// Create an `App` with all routes, app data, and middleware.
///
/// Tests can pass the result to `actix_web::test::init_service` to serve
/// requests without binding a port.
pub fn app(
    upstreams: Data<Upstreams>,
    metrics_client: Data<StatsdClient>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(upstreams)
        .app_data(metrics_client)
        .wrap(middleware::Metrics)
        .wrap(TracingLogger::<MarqueeRootSpanBuilder>::new())
        .wrap(Cors::permissive())
        .configure(configure_app)
}

/// Configure all routes, and how query strings are read. Does not include
/// middleware or app data.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(malformed_query));
    endpoints::configure(cfg);
    health::service(cfg);
}

/// Report query strings that can't be read at all with the usual JSON error
/// body.
fn malformed_query(error: QueryPayloadError, _: &HttpRequest) -> actix_web::Error {
    HandlerErrorKind::MalformedQuery(error.to_string()).into()
}
