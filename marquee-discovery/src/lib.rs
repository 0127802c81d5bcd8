#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! The event discovery core of Marquee.
//!
//! This crate turns browser queries into Ticketmaster Discovery API requests,
//! and turns the Discovery API's deeply nested, loosely populated responses into
//! small, stable payloads for the front-end.
//!
//! The moving parts are:
//!
//! - [`SearchQuery`], built by validating raw query string values.
//! - [`params::search_parameters`], which translates a query into upstream
//!   request parameters, including the [`category`] filter and the position
//!   encoding ([`geohash`] or a raw `lat,lon` pair).
//! - The [`normalize`] functions, which extract [`EventSummary`],
//!   [`EventDetail`], and [`VenueInfo`] values from upstream JSON. Missing or
//!   malformed upstream fields always produce a default value, never an error.
//! - [`EventSource`] and [`Geocoder`], the seams the web layer calls through,
//!   with reqwest backed implementations in [`TicketmasterClient`] and
//!   [`GoogleGeocoder`].

pub mod category;
mod client;
mod error;
pub mod geocode;
pub mod geohash;
mod http;
pub mod model;
pub mod normalize;
pub mod params;
mod query;

pub use crate::client::{EventSource, TicketmasterClient};
pub use crate::error::{SetupError, UpstreamError, ValidationError};
pub use crate::geocode::{GeocodedLocation, Geocoder, GoogleGeocoder, Place};
pub use crate::normalize::{Artist, EventDetail, EventSummary, VenueInfo};
pub use crate::query::{position, RawSearchQuery, SearchQuery, DEFAULT_CATEGORY, DEFAULT_DISTANCE};
