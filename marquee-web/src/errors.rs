//! Any errors that marquee-web might generate, and supporting implementations.

use std::error::Error;
use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use backtrace::Backtrace;
use marquee_discovery::{UpstreamError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// The Standard Error for most of Marquee
pub struct HandlerError {
    /// The wrapped error value.
    kind: HandlerErrorKind,
    /// The backtrace related to the wrapped error.
    pub(crate) backtrace: Backtrace,
}

/// An error that happened in a web handler.
#[derive(Error, Debug)]
pub enum HandlerErrorKind {
    /// A generic error, when there is nothing more specific to say.
    #[error("Internal error")]
    Internal,

    /// The query string could not be parsed at all.
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),

    /// A query parameter was missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upstream needed to answer this request has no credential.
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),

    /// The upstream call failed.
    #[error("Upstream {operation} request failed")]
    Upstream {
        /// The operation that was attempted, such as `search`.
        operation: &'static str,
        /// What went wrong.
        #[source]
        source: UpstreamError,
    },

    /// The upstream answered, but had nothing for the request.
    #[error("{0}")]
    NotFound(&'static str),
}

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// A short description of the error.
    error: String,
    /// More about upstream failures, such as the upstream's own error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl HandlerErrorKind {
    /// Convert the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal | Self::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedQuery(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Build an HTTP response reporting the error.
    pub fn error_response(&self) -> HttpResponse {
        let details = match self {
            Self::Upstream { source, .. } => Some(source.details()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

impl From<HandlerErrorKind> for actix_web::Error {
    fn from(kind: HandlerErrorKind) -> Self {
        let error: HandlerError = kind.into();
        error.into()
    }
}

impl HandlerError {
    /// Access the wrapped error.
    pub fn kind(&self) -> &HandlerErrorKind {
        &self.kind
    }

    /// Get an `HandlerError` representing an `Internal` error.
    pub fn internal() -> Self {
        HandlerErrorKind::Internal.into()
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

impl<T> From<T> for HandlerError
where
    HandlerErrorKind: From<T>,
{
    fn from(item: T) -> Self {
        HandlerError {
            kind: HandlerErrorKind::from(item),
            backtrace: Backtrace::new(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::fmt::Debug for HandlerError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Name the debug struct `HandlerError/<error kind>` so that log
        // aggregation groups errors by kind.
        fmt.debug_struct(&format!("HandlerError/{:?}", &self.kind))
            .field("kind", &self.kind)
            .field("backtrace", &self.backtrace)
            .finish()
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        self.kind().error_response()
    }
}
