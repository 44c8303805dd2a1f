//! End-to-end tests for the scenario layer, driven against the mock hub.
//!
//! These tests exercise whole suites (setup, creation, verification,
//! teardown, registry audit) instead of individual methods.

mod helpers;
mod scenarios;
