//! Suite-report assertion helpers for E2E tests.

use migcheck_scenario::{ScenarioStatus, SuiteReport};

/// Find a scenario outcome by name.
///
/// # Panics
///
/// Panics if no scenario with that name exists in the report.
pub fn outcome<'a>(report: &'a SuiteReport, name: &str) -> &'a ScenarioStatus {
    &report
        .outcomes
        .iter()
        .find(|o| o.name == name)
        .unwrap_or_else(|| panic!("no scenario named '{name}' in report: {report}"))
        .status
}

/// Assert that a named scenario passed.
pub fn assert_passed(report: &SuiteReport, name: &str) {
    assert_eq!(
        outcome(report, name),
        &ScenarioStatus::Passed,
        "scenario '{name}' should pass, report:\n{report}"
    );
}

/// Assert that a named scenario failed and the reason mentions `needle`.
pub fn assert_failed_with(report: &SuiteReport, name: &str, needle: &str) {
    match outcome(report, name) {
        ScenarioStatus::Failed(reason) => assert!(
            reason.contains(needle),
            "scenario '{name}' failed for the wrong reason: {reason}"
        ),
        other => panic!("scenario '{name}' should fail, got {other:?}, report:\n{report}"),
    }
}
