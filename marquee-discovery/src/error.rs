//! Errors produced while validating input and talking to upstream services.

use thiserror::Error;

/// A client supplied value that cannot be used to build an upstream request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The search keyword was missing or blank.
    #[error("keyword is required")]
    MissingKeyword,

    /// One or both of the latitude and longitude were missing.
    #[error("lat/lon are required")]
    MissingPosition,

    /// The latitude or longitude was not a number of degrees within range.
    #[error("invalid lat/lon")]
    InvalidPosition,

    /// The distance was not a positive number.
    #[error("distance must be a positive number")]
    InvalidDistance,

    /// A lookup parameter, such as an event id, was missing or blank.
    #[error("{0} is required")]
    MissingParameter(&'static str),
}

impl ValidationError {
    /// The name of the request field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingKeyword => "keyword",
            Self::MissingPosition | Self::InvalidPosition => "position",
            Self::InvalidDistance => "distance",
            Self::MissingParameter(name) => name,
        }
    }
}

/// An upstream call that did not produce a usable response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent, or no response arrived in time.
    #[error("could not reach {service}: {source}")]
    Transport {
        /// The upstream that was called.
        service: &'static str,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status code.
    #[error("{service} responded with status {status}")]
    Status {
        /// The upstream that was called.
        service: &'static str,
        /// The HTTP status code of the response.
        status: u16,
        /// The start of the response body, for diagnostics.
        body: String,
    },

    /// The upstream answered, but the body was not the JSON we expected.
    #[error("{service} sent an unreadable response: {reason}")]
    Decode {
        /// The upstream that was called.
        service: &'static str,
        /// What was wrong with the body.
        reason: String,
    },

    /// The upstream answered successfully but reported that it refused the
    /// request, as the geocoding API does with its `status` field.
    #[error("{service} rejected the request with status {status}")]
    Rejected {
        /// The upstream that was called.
        service: &'static str,
        /// The status reported in the response body.
        status: String,
        /// The upstream's explanation, if any.
        message: String,
    },
}

impl UpstreamError {
    /// The HTTP status the upstream answered with, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::Rejected { .. } => None,
        }
    }

    /// A description of the failure suitable for returning to API clients.
    pub fn details(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.is_empty() => format!("{}: {}", self, body),
            Self::Rejected { message, .. } if !message.is_empty() => {
                format!("{}: {}", self, message)
            }
            _ => self.to_string(),
        }
    }
}

/// Errors that may occur while building an upstream client.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No usable credential was configured for the upstream.
    #[error("no API key is configured for {0}")]
    MissingCredential(&'static str),

    /// The configured values cannot be used.
    #[error("This upstream cannot be used with the current Marquee configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    /// The HTTP client could not be created.
    #[error("There was a network error while setting up this upstream")]
    Network(#[source] anyhow::Error),
}
