#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # Marquee Settings
//!
//! Configuration is specified in several ways, with later methods overriding earlier ones.
//!
//! 1. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 2. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `MARQUEE_ENV`. The
//!    settings for that environment are then loaded from `config/${env}.yaml`, if
//!    it exists. The default environment is "development". A "production"
//!    environment is also provided.
//! 3. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is the intended
//!    place for local secrets such as API keys.
//! 4. Environment variables that begin with `MARQUEE_` and have a separator for
//!    `__`. For example, `Settings::http::workers` can be controlled from the
//!    environment variable `MARQUEE_HTTP__WORKERS`.
//! 5. The bare variables `TICKETMASTER_API_KEY` and `GOOGLE_GEOCODING_API_KEY`,
//!    which override the corresponding `api_key` settings.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.

mod logging;

pub use logging::{DirectiveWrapper, LogFormat, LoggingSettings};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::{net::SocketAddr, time::Duration};

/// Plain environment variables that are accepted for upstream credentials, and
/// the setting each one overrides.
const CREDENTIAL_VARIABLES: [(&str, &str); 2] = [
    ("TICKETMASTER_API_KEY", "ticketmaster.api_key"),
    ("GOOGLE_GEOCODING_API_KEY", "geocoding.api_key"),
];

/// Top level settings object for Marquee.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[doc(inline)]
pub struct Settings {
    /// The environment Marquee is running in. Should only be set with the
    /// `MARQUEE_ENV` environment variable.
    pub env: String,

    /// Settings for the HTTP server.
    pub http: HttpSettings,

    /// Settings for the Ticketmaster Discovery API.
    pub ticketmaster: TicketmasterSettings,

    /// Settings for the address geocoding API.
    pub geocoding: GeocodingSettings,

    /// Logging settings.
    pub logging: LoggingSettings,

    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// Settings for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSettings {
    /// The host and port to listen on, such as "127.0.0.1:8080" or "0.0.0.0:80".
    pub listen: SocketAddr,

    /// The number of workers to use. Optional. If no value is provided, the
    /// number of logical cores will be used.
    pub workers: Option<usize>,
}

/// How a search position is sent to the Discovery API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationEncoding {
    /// A precision 7 geohash, sent as `geoPoint`.
    Geohash,
    /// The raw pair, sent as `latlong=<lat>,<lon>`.
    LatLong,
}

/// Settings for the Ticketmaster Discovery API.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketmasterSettings {
    /// Base URL of the Discovery API, ending in a slash. Endpoint paths such as
    /// `events.json` are joined onto it.
    pub base_url: String,

    /// The API key sent as `apikey`. Data routes answer with an error while
    /// this is unset or blank.
    pub api_key: Option<String>,

    /// How the searched position is encoded.
    pub location_encoding: LocationEncoding,

    /// The number of events requested per search. Values outside of 1 to 50
    /// are clamped.
    pub page_size: usize,

    /// The total time allowed for a single upstream request.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "timeout_sec")]
    pub timeout: Duration,

    /// The time allowed to establish a connection to the upstream.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "connect_timeout_sec")]
    pub connect_timeout: Duration,
}

impl TicketmasterSettings {
    /// The configured API key, if it is present and not blank.
    pub fn credential(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

/// Settings for the geocoding API used to turn addresses into coordinates.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodingSettings {
    /// The full URL of the geocoding endpoint.
    pub base_url: String,

    /// The API key sent as `key`.
    pub api_key: Option<String>,

    /// The total time allowed for a single geocoding request.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "timeout_sec")]
    pub timeout: Duration,
}

impl GeocodingSettings {
    /// The configured API key, if it is present and not blank.
    pub fn credential(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

/// Settings for the StatsD metrics sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// The host to send metrics to.
    pub sink_host: String,

    /// The UDP port to send metrics to.
    pub sink_port: u16,

    /// The maximum number of metrics waiting to be sent. Metrics past this
    /// limit are dropped.
    pub max_queue_size: usize,
}

/// Treat blank strings the same as missing ones.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, or if any of the required
    /// configuration files are missing.
    pub fn load() -> Result<Self, ConfigError> {
        let marquee_env =
            std::env::var("MARQUEE_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            // Start off with the base config.
            .add_source(File::with_name("./config/base"))
            .set_override("env", marquee_env.as_str())?
            // Merge in an environment specific config.
            .add_source(File::with_name(&format!("config/{}", marquee_env)).required(false))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables that start with "MARQUEE_" and have "__"
            // to separate levels. For example, `MARQUEE_HTTP__LISTEN` maps to
            // `Settings::http::listen`.
            .add_source(
                Environment::with_prefix("MARQUEE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (variable, key) in CREDENTIAL_VARIABLES {
            if let Ok(value) = std::env::var(variable) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Load settings from configuration files for tests.
    ///
    /// `changer` is applied to the loaded settings before they are returned.
    ///
    /// # Panics
    /// If the test configuration files are missing or invalid.
    pub fn load_for_tests<F: FnOnce(&mut Self)>(changer: F) -> Self {
        let config_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../config");

        let mut settings: Self = Config::builder()
            // Start off with the base config.
            .add_source(File::with_name(&format!("{}/base", config_dir)))
            // Merge in test specific config.
            .add_source(File::with_name(&format!("{}/test", config_dir)))
            // Add a local configuration file that is `.gitignore`ed.
            .add_source(File::with_name(&format!("{}/local_test", config_dir)).required(false))
            .set_override("env", "test")
            .expect("Could not set env for tests")
            .build()
            .expect("Could not load test settings")
            .try_deserialize()
            .expect("Could not convert settings");

        changer(&mut settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_load() {
        let settings = Settings::load_for_tests(|_| ());
        assert_eq!(settings.env, "test");
        assert_eq!(settings.ticketmaster.page_size, 20);
        assert_eq!(
            settings.ticketmaster.location_encoding,
            LocationEncoding::Geohash
        );
        assert_eq!(settings.ticketmaster.timeout, Duration::from_secs(2));
    }

    #[test]
    fn changer_is_applied() {
        let settings = Settings::load_for_tests(|s| s.ticketmaster.page_size = 50);
        assert_eq!(settings.ticketmaster.page_size, 50);
    }

    #[test]
    fn blank_credentials_are_unset() {
        let settings = Settings::load_for_tests(|s| {
            s.ticketmaster.api_key = Some("   ".to_string());
            s.geocoding.api_key = None;
        });
        assert_eq!(settings.ticketmaster.credential(), None);
        assert_eq!(settings.geocoding.credential(), None);
    }

    #[test]
    fn credentials_are_trimmed() {
        let settings =
            Settings::load_for_tests(|s| s.ticketmaster.api_key = Some(" abc123\n".to_string()));
        assert_eq!(settings.ticketmaster.credential(), Some("abc123"));
    }

    #[test]
    fn location_encoding_deserializes_snake_case() {
        let encoding: LocationEncoding = serde_json::from_str("\"lat_long\"").unwrap();
        assert_eq!(encoding, LocationEncoding::LatLong);
    }
}
