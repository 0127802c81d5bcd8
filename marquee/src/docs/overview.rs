//! # High level overview of Marquee
//!
//! This project is structured as a [Cargo Workspace][] that contains one crate
//! for each broad area of behavior for Marquee. The crates can be built and
//! tested individually or as a group.
//!
//! [Cargo Workspace]: https://doc.rust-lang.org/book/ch14-03-cargo-workspaces.html
//!
//! This is a brief overview of the crates found in the repository. For more
//! details, see the specific crate docs.
//!
//! ## [`marquee`](../)
//!
//! The *binary* crate. It loads settings, sets up logging and metrics, and runs
//! the web server.
//!
//! ## [`marquee-settings`](../../marquee_settings/index.html)
//!
//! This defines and documents the settings of the application. These settings
//! are initialized by the binary crate and passed into the other crates to
//! configure them.
//!
//! ## [`marquee-discovery`](../../marquee_discovery/index.html)
//!
//! The *domain* crate. It validates searches, builds Ticketmaster Discovery API
//! requests, and normalizes the Discovery API's responses into the small
//! payloads the front-end renders. It also holds the geocoding client.
//!
//! ## [`marquee-web`](../../marquee_web/index.html)
//!
//! This crate provides the HTTP API, mapping errors to status codes and adding
//! request logging and metrics.
//!
//! ## [`marquee-integration-tests`](../../marquee_integration_tests/index.html)
//!
//! A separate test system. It brings together the other crates like `marquee`
//! does, but points the upstream clients at mock servers and exercises the
//! service through its HTTP API.
