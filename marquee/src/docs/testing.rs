//! # Testing strategies
//!
//! There are two major testing strategies used in this repository: unit tests,
//! and integration tests.
//!
//! Unit tests should appear close to the code they are testing, using standard
//! Rust unit tests. This is suitable for testing complex behavior at a small
//! scale, with fine grained control over the inputs. Most of the normalization
//! rules in `marquee-discovery` are tested this way, with `serde_json::json!`
//! fixtures standing in for Discovery API responses.
//!
//! ```
//! fn add_two(n: u32) -> u32 {
//!     n + 2
//! }
//!
//! #[cfg(test)]
//! mod tests {
//!     #[test]
//!     fn add_two_works() {
//!         assert_eq!(add_two(3), 5, "it should work");
//!     }
//! }
//! ```
//!
//! However, many behaviors are difficult to test as unit tests, especially
//! details like the URLs and response shapes we expose via the web service. To
//! test these parts of Marquee, we have
//! [`marquee-integration-tests`][test-crate], which starts an instance of
//! Marquee with its upstreams pointed at mock servers. HTTP requests can then
//! be made to that server in order to test its behavior, and the mocks can
//! check which upstream requests were made.
//!
//! [test-crate]: ../../../marquee_integration_tests/
//!
//! ```ignore
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
//!
//! For more details, see the documentation of the `marquee-integration-tests`
//! crate.
