//! S6: Full shipped-suite runs against a scripted mock hub.
//!
//! Exercises the real `suites::source_analysis` / `suites::binary_analysis`
//! definitions end to end, with mock reports shaped to the shipped fixture
//! expectations.

use migcheck_core::types::{AnalysisReport, IncidentCategory, Transaction};
use migcheck_hub::MockHubClient;
use migcheck_scenario::suites;

use crate::helpers::context::make_context;
use crate::helpers::fixtures::shipped_fixtures;

fn report(story_points: u64) -> AnalysisReport {
    AnalysisReport {
        story_points,
        incidents: vec![IncidentCategory {
            category: "mandatory".to_owned(),
            incidents: 24,
        }],
        transactions: Vec::new(),
        tags: Vec::new(),
    }
}

/// 허브가 소스 스위트의 픽스처 기대값대로 응답하도록 스크립트합니다.
fn source_suite_hub() -> MockHubClient {
    let tagged = AnalysisReport {
        tags: vec![
            "EJB XML".to_owned(),
            "Servlet".to_owned(),
            "Properties".to_owned(),
        ],
        ..report(5)
    };

    MockHubClient::new()
        .with_status_script(Vec::new())
        .with_report(report(5))
        .with_report_for("tackleTestApp_Source+dependencies", report(8))
        .with_report_for("tackleTestApp_Source+knownLibraries", report(8))
        .with_report_for("tackleTestApp_Source_autoTagging", tagged)
        .with_report_for("dayTraderApp_MavenCreds", report(120))
}

#[tokio::test]
async fn test_e2e_source_analysis_suite_passes_end_to_end() {
    let fixtures = shipped_fixtures().await;
    let hub = source_suite_hub();
    let (mut ctx, _artifacts) = make_context(hub.clone(), fixtures);

    let suite = suites::source_analysis::suite();
    let outcome = suite.run(&mut ctx).await;

    assert!(outcome.success(), "report:\n{outcome}");
    assert_eq!(outcome.passed_count(), 9);
    assert!(outcome.contract_error.is_none());

    // 티어다운이 애플리케이션과 자격 증명을 정리했는지 확인
    assert_eq!(hub.application_count(), 0);
    assert_eq!(hub.credential_count(), 0);
}

#[tokio::test]
async fn test_e2e_binary_analysis_suite_passes_end_to_end() {
    let fixtures = shipped_fixtures().await;
    let hub = MockHubClient::new()
        .with_status_script(Vec::new())
        .with_report_for(
            "customersApp_binary",
            AnalysisReport {
                story_points: 3,
                incidents: vec![IncidentCategory {
                    category: "mandatory".to_owned(),
                    incidents: 5,
                }],
                transactions: vec![
                    Transaction {
                        name: "com.example.customers.ListCustomers".to_owned(),
                        story_points: 2,
                    },
                    Transaction {
                        name: "com.example.customers.UpdateCustomer".to_owned(),
                        story_points: 1,
                    },
                ],
                tags: Vec::new(),
            },
        );
    let (mut ctx, _artifacts) = make_context(hub.clone(), fixtures);

    let suite = suites::binary_analysis::suite();
    let outcome = suite.run(&mut ctx).await;

    assert!(outcome.success(), "report:\n{outcome}");
    assert_eq!(outcome.passed_count(), 2);
    assert_eq!(hub.application_count(), 0);
}

/// An unreachable hub aborts the whole suite: setup fails, every scenario
/// is skipped, teardown is still attempted.
#[tokio::test]
async fn test_e2e_unreachable_hub_aborts_source_suite() {
    let fixtures = shipped_fixtures().await;
    let hub = MockHubClient::new().with_ping_failure();
    let (mut ctx, _artifacts) = make_context(hub, fixtures);

    let suite = suites::source_analysis::suite();
    let outcome = suite.run(&mut ctx).await;

    assert!(outcome.setup_error.is_some());
    assert_eq!(outcome.passed_count(), 0);
    assert_eq!(outcome.skipped_count(), 9);
    assert!(!outcome.success());
}

/// A single failing analysis fails its own verification scenario while the
/// other applications still verify green.
#[tokio::test]
async fn test_e2e_one_failing_analysis_does_not_poison_the_suite() {
    use migcheck_core::types::AnalysisStatus;

    let fixtures = shipped_fixtures().await;
    let hub = source_suite_hub().with_outcome_for("dayTraderApp", AnalysisStatus::Failed);
    let (mut ctx, _artifacts) = make_context(hub, fixtures);

    let suite = suites::source_analysis::suite();
    let outcome = suite.run(&mut ctx).await;

    assert_eq!(outcome.failed_count(), 1);
    assert_eq!(outcome.passed_count(), 8);
    crate::helpers::assertions::assert_failed_with(
        &outcome,
        "Analysis on daytrader app with maven credentials",
        "'Failed'",
    );
}
