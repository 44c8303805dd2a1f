//! S1: Lifecycle ordering and failure taxonomy through the suite runner.
//!
//! Verifies that out-of-order operations fail fast, and that a status
//! mismatch and a polling timeout surface as distinct failure reasons.

use migcheck_core::types::AnalysisStatus;
use migcheck_hub::MockHubClient;
use migcheck_scenario::{Suite, scenario};

use crate::helpers::assertions::*;
use crate::helpers::context::make_context;
use crate::helpers::fixtures::minimal_fixtures;

/// analyze() before create() has been confirmed -> lifecycle error, no hang.
#[tokio::test]
async fn test_e2e_analyze_before_create_is_rejected() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("lifecycle").with_scenario(scenario("analyze first", |ctx| {
        Box::pin(async move {
            let mut analysis =
                ctx.new_analysis("eager", "bookserver-app", "eagerApp", "source_analysis")?;
            // create()를 건너뛰고 바로 분석 시작을 시도
            analysis.analyze().await?;
            Ok(())
        })
    }));

    let report = suite.run(&mut ctx).await;
    assert_failed_with(&report, "analyze first", "not allowed in state 'pending'");
}

/// Wrong terminal status -> StatusMismatch, reported with both statuses.
#[tokio::test]
async fn test_e2e_status_mismatch_reason_names_both_statuses() {
    let hub = MockHubClient::new()
        .with_status_script(Vec::new())
        .with_outcome(AnalysisStatus::Failed);
    let (mut ctx, _artifacts) = make_context(hub, minimal_fixtures());

    let suite = Suite::new("mismatch").with_scenario(scenario("expect completed", |ctx| {
        Box::pin(async move {
            let mut analysis =
                ctx.new_analysis("app", "bookserver-app", "mismatchApp", "source_analysis")?;
            analysis.create().await?;
            analysis.analyze().await?;
            analysis.verify_status(AnalysisStatus::Completed).await?;
            Ok(())
        })
    }));

    let report = suite.run(&mut ctx).await;
    assert_failed_with(&report, "expect completed", "expected 'Completed'");
    assert_failed_with(&report, "expect completed", "'Failed'");
}

/// Analysis never reaching a terminal status -> PollTimeout, not a mismatch.
#[tokio::test]
async fn test_e2e_poll_timeout_is_distinct_from_mismatch() {
    let hub = MockHubClient::new()
        .with_status_script(vec![AnalysisStatus::InProgress; 100_000]);
    let (mut ctx, _artifacts) = make_context(hub, minimal_fixtures());

    let suite = Suite::new("timeout").with_scenario(scenario("stuck analysis", |ctx| {
        Box::pin(async move {
            let mut analysis =
                ctx.new_analysis("app", "bookserver-app", "stuckApp", "source_analysis")?;
            analysis.create().await?;
            analysis.analyze().await?;
            analysis.verify_status(AnalysisStatus::Completed).await?;
            Ok(())
        })
    }));

    let report = suite.run(&mut ctx).await;
    assert_failed_with(&report, "stuck analysis", "timed out");
    assert_failed_with(&report, "stuck analysis", "In Progress");
    // 불일치 실패와 섞이지 않아야 함
    match crate::helpers::assertions::outcome(&report, "stuck analysis") {
        migcheck_scenario::ScenarioStatus::Failed(reason) => {
            assert!(!reason.contains("expected 'Completed'"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

/// Creation that the hub reflects late still confirms within the deadline.
#[tokio::test]
async fn test_e2e_creation_confirmed_after_visibility_lag() {
    let hub = MockHubClient::new().with_visibility_lag(3);
    let (mut ctx, _artifacts) = make_context(hub, minimal_fixtures());

    let suite = Suite::new("lagged-create").with_scenario(scenario("create", |ctx| {
        Box::pin(async move {
            let mut analysis =
                ctx.new_analysis("app", "bookserver-app", "laggedApp", "source_analysis")?;
            analysis.create().await?;
            analysis.analyze().await?;
            analysis.verify_status(AnalysisStatus::Completed).await?;
            Ok(())
        })
    }));

    let report = suite.run(&mut ctx).await;
    assert_passed(&report, "create");
}
