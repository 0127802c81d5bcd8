//! Shared tools for tests.

pub mod logging;
pub mod metrics;
pub mod test_tools;
