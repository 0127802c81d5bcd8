//! Web handlers for the public API.

mod events;
mod geocode;

use actix_web::web::{self, ServiceConfig};
use cadence::{CountedExt, StatsdClient};
use marquee_discovery::UpstreamError;

use crate::errors::{HandlerError, HandlerErrorKind};

/// Configure the event and geocoding routes.
pub fn configure(config: &mut ServiceConfig) {
    config
        .service(events::search)
        .service(events::event)
        .service(events::venue)
        .service(events::suggest)
        .service(
            web::scope("/api")
                .service(geocode::geocode)
                .service(geocode::reverse_geocode),
        );
}

/// Count the outcome of an upstream call, and convert failures into handler
/// errors.
fn record_outcome<T>(
    metrics_client: &StatsdClient,
    service: &str,
    operation: &'static str,
    result: Result<T, UpstreamError>,
) -> Result<T, HandlerError> {
    match result {
        Ok(value) => {
            metrics_client
                .incr(&format!("upstream.{}.success", operation))
                .ok();
            Ok(value)
        }
        Err(source) => {
            metrics_client
                .incr(&format!("upstream.{}.error", operation))
                .ok();
            tracing::error!(
                r#type = "web.upstream.error",
                %service,
                %operation,
                error = %source,
                upstream_status = source.upstream_status(),
                "Upstream call failed"
            );
            Err(HandlerErrorKind::Upstream { operation, source }.into())
        }
    }
}

/// A query parameter that must be present and not blank, trimmed.
fn required<E>(value: &Option<String>, error: E) -> Result<&str, E> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(error)
}
