//! Middlewares specific to Marquee.

mod metrics;

pub use self::metrics::Metrics;
