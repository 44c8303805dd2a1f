//! Shared E2E test helpers.
//!
//! Provides context builders around the mock hub, fixture sets matching
//! the shipped suite definitions, and suite-report assertions.

pub mod assertions;
pub mod context;
pub mod fixtures;
