#![warn(missing_docs, clippy::missing_docs_in_private_items)]
// None of the tests are seen by the linter, so none of the utilities are marked
// as used. But docs don't generate for the below if they are `#[cfg(test)]`.
// This is a compromise.
#![allow(dead_code)]

//! Tests for Marquee that work by reading from the external API only.
//!
//! Since the URL endpoints Marquee exposes to the world are its public API, and
//! the front-end depends on them, the paths and response shapes used in tests
//! here are important details, and used to keep compatibility.
//!
//! This is structured as a separate crate so that it produces a single test
//! binary instead of one test per file like would happen if this were
//! `marquee/tests/...`. This improves compilation and test times.
//!
//! The primary tool used by tests is [`marquee_test`], which starts mock
//! upstream servers, sets up the application for testing, and provides helpers
//! to inspect the state of the app. It then calls the test function that is
//! passed to it, providing the above tools as an argument.
//!
//! ```
//! use marquee_integration_tests::{marquee_test, TestingTools};
//! use reqwest::StatusCode;
//!
//! #[actix_rt::test]
//! async fn health_works() {
//!     marquee_test(
//!         |_| (),
//!         |TestingTools { test_client, .. }| async move {
//!             let response = test_client
//!                 .get("/health")
//!                 .send()
//!                 .await
//!                 .expect("failed to execute request");
//!
//!             assert_eq!(response.status(), StatusCode::OK);
//!         },
//!     )
//!     .await
//! }
//! ```

mod geocode;
mod health;
mod logging;
mod lookups;
mod metrics;
mod search;
mod utils;

pub use crate::utils::{
    logging::{LogEvent, LogWatcher},
    metrics::MetricsWatcher,
    test_tools::{
        marquee_test, InProcessApp, TestReqwestClient, TestingTools, DISCOVERY_ROOT, GEOCODE_PATH,
    },
};
