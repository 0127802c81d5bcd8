//! The upstream clients shared by every handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use marquee_discovery::{
    EventSource, Geocoder, GoogleGeocoder, SetupError, TicketmasterClient,
};
use marquee_settings::Settings;

use crate::errors::{HandlerError, HandlerErrorKind};

/// The upstream clients stored in Actix's app_data.
///
/// An upstream without a configured credential is `None`. Handlers that need
/// it fail with a configuration error before doing anything else, so the
/// service can still start and answer the routes that don't need it.
#[derive(Clone, Default)]
pub struct Upstreams {
    /// Ticketmaster, backing every event route.
    pub events: Option<Arc<dyn EventSource>>,
    /// Backs address geocoding.
    pub geocoder: Option<Arc<dyn Geocoder>>,
}

impl Upstreams {
    /// Build the upstream clients from settings.
    ///
    /// # Errors
    /// If a configured upstream is unusable, for example because of an invalid
    /// URL. A missing credential is not an error.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let _setup_span = tracing::info_span!("upstream_setup").entered();
        tracing::info!(r#type = "web.configuring-upstreams", "Setting up upstream clients");

        let events = match TicketmasterClient::new(&settings.ticketmaster) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn EventSource>),
            Err(SetupError::MissingCredential(service)) => {
                log_unconfigured(service);
                None
            }
            Err(error) => return Err(error).context("Setting up the Ticketmaster client"),
        };

        let geocoder = match GoogleGeocoder::new(&settings.geocoding) {
            Ok(geocoder) => Some(Arc::new(geocoder) as Arc<dyn Geocoder>),
            Err(SetupError::MissingCredential(service)) => {
                log_unconfigured(service);
                None
            }
            Err(error) => return Err(error).context("Setting up the geocoding client"),
        };

        Ok(Self { events, geocoder })
    }

    /// The event source, if it is configured.
    pub fn events(&self) -> Result<&dyn EventSource, HandlerError> {
        self.events
            .as_deref()
            .ok_or_else(|| HandlerErrorKind::NotConfigured("Ticketmaster").into())
    }

    /// The geocoder, if it is configured.
    pub fn geocoder(&self) -> Result<&dyn Geocoder, HandlerError> {
        self.geocoder
            .as_deref()
            .ok_or_else(|| HandlerErrorKind::NotConfigured("Geocoding").into())
    }
}

/// Warn operators about an upstream that can't be used.
fn log_unconfigured(service: &str) {
    tracing::warn!(
        r#type = "web.upstream-unconfigured",
        %service,
        "No API key configured, routes that need this upstream will fail"
    );
}
