//! Suite context builders for E2E tests.

use std::sync::Arc;

use migcheck_core::config::MigcheckConfig;
use migcheck_fixture::FixtureSet;
use migcheck_hub::MockHubClient;
use migcheck_scenario::{PollSettings, SuiteContext};

/// Build a suite context around a mock hub with fast polling.
///
/// The artifacts directory points into a fresh tempdir so suites that
/// write settings.xml / key files never touch the real filesystem layout.
/// The tempdir guard must be kept alive for the duration of the test.
pub fn make_context(
    hub: MockHubClient,
    fixtures: FixtureSet,
) -> (SuiteContext<MockHubClient>, tempfile::TempDir) {
    let artifacts_dir = tempfile::tempdir().expect("tempdir for artifacts");

    let mut config = MigcheckConfig::default();
    config.artifacts.dir = artifacts_dir.path().to_string_lossy().into_owned();

    let ctx = SuiteContext::new(Arc::new(hub), config, fixtures)
        .with_poll_settings(PollSettings::fast());
    (ctx, artifacts_dir)
}
