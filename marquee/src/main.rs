// Only overview documentation that is not relevant to one of the more specific
// crates should go here.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A web service that finds live events for a browser front-end.
//!
//! Marquee is split into several subcrates that work in collaboration.
//!
//! - [marquee-discovery](../marquee_discovery/index.html)
//! - [marquee-integration-tests](../marquee_integration_tests/index.html)
//! - [marquee-settings](../marquee_settings/index.html)
//! - [marquee-web](../marquee_web/index.html)

mod docs;

use anyhow::{Context, Result};
use cadence::{QueuingMetricSink, StatsdClient, UdpMetricSink};
use marquee_settings::{LogFormat, Settings};
use std::net::{TcpListener, UdpSocket};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Primary entry point
#[actix_rt::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Loading settings")?;
    init_logging(&settings).context("Initializing logging")?;
    let metrics_client = init_metrics(&settings).context("Initializing metrics")?;

    tracing::info!(
        r#type = "app.starting",
        env = %settings.env,
        listen = %settings.http.listen,
        "Starting Marquee"
    );
    let listener = TcpListener::bind(settings.http.listen).context("Binding port")?;

    marquee_web::run(listener, metrics_client, settings)
        .context("Starting marquee-web server")?
        .await
        .context("Running marquee-web server")?;

    Ok(())
}

/// Set up logging for Marquee, based on settings and the `RUST_LOG` environment variable.
fn init_logging(settings: &Settings) -> Result<()> {
    LogTracer::init()?;
    let env_filter: EnvFilter = (&settings.logging.levels).into();
    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.logging.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().pretty()),
        )?,
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().compact()),
        )?,
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            ),
        )?,
    }

    Ok(())
}

/// Set up a metrics client that sends to the configured statsd sink.
///
/// Metrics are queued and sent from a background thread.
fn init_metrics(settings: &Settings) -> Result<StatsdClient> {
    let socket = UdpSocket::bind("0.0.0.0:0").context("Binding metrics socket")?;
    socket.set_nonblocking(true)?;

    let sink_address = (settings.metrics.sink_host.as_str(), settings.metrics.sink_port);
    let udp_sink = UdpMetricSink::from(sink_address, socket)
        .context("Resolving the metrics sink address")?;
    let queuing_sink = QueuingMetricSink::with_capacity(udp_sink, settings.metrics.max_queue_size);

    Ok(StatsdClient::builder("marquee", queuing_sink)
        .with_error_handler(|error| {
            tracing::warn!(r#type = "app.metrics.error", %error, "Could not send metric");
        })
        .build())
}
