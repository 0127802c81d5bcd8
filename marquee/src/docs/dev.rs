//! # Developer documentation for working on Marquee
//!
//! ## tl;dr
//!
//! Here are some useful commands when working on Marquee.
//!
//! Run the main app
//! ```shell
//! $ TICKETMASTER_API_KEY=... cargo run -p marquee
//! ```
//!
//! Run specific tests for one crate
//! ```shell
//! $ cargo test -p marquee-integration-tests -- search
//! ```
//!
//! ## Credentials
//!
//! Marquee needs a Ticketmaster Discovery API key, and a Google Geocoding API
//! key for the geocode endpoint. Provide them with the `TICKETMASTER_API_KEY`
//! and `GOOGLE_GEOCODING_API_KEY` environment variables, or in
//! `config/local.yaml`. Without a key Marquee still starts, but the endpoints
//! that need it answer with a 500.
//!
//! ## Local configuration
//!
//! The default configuration of Marquee is development, which has
//! human-oriented logging enabled. For settings that you wish to
//! change in the development configuration, you have three options.
//!
//! > For full details, make sure to check out the documentation for
//! > [`marquee_settings`].
//!
//! ### Update the defaults
//!
//! If the change you want to make makes the system better for most development
//! tasks, consider adding it to `config/development.yaml`, so that other
//! developers can take advantage of it. You can look at `config/base.yaml`,
//! which defines all required configuration, to see an example of the
//! structure.
//!
//! It is not suitable to put secrets in `config/development.yaml`.
//!
//! ### Create a local override
//!
//! For local changes to adapt to your machine or tastes, you can put the
//! configuration in `config/local.yaml`. This file doesn't exist by default.
//! These changes won't be a part of the git history, so it is safe to put
//! secrets here, if needed.
//!
//! ### Create a new configuration
//!
//! You can create a file `config/<yourname>.yaml`, and set the environment
//! variable `MARQUEE_ENV=<yourname>` to use it. This will be based on the *base*
//! configuration, not the development one, so it is likely a good idea to start
//! by copying `config/development.yaml`.
//!
//! Since this file is meant to be checked into the repository, it is **not**
//! suitable for secrets.
//!
//! > Note that none of the above overrides are used in tests. If you need to
//! > configure the test environment, you can edit `config/test.yaml` or create
//! > `config/local_test.yaml`.
//!
//! ## Recommended Tools
//!
//! * [rust-analyzer][] - IDE-like tools for many editors.
//! * [cargo-watch][] - A Cargo subcommand that re-runs a task when files change,
//!   such as `cargo watch -x clippy`.
//!
//! [rust-analyzer]: https://rust-analyzer.github.io/
//! [cargo-watch]: https://crates.io/crates/cargo-watch
