//! S5: The canonical end-to-end flow.
//!
//! Create an application pointing at a known git repository with no
//! credentials, run the analysis, expect terminal status "Completed"
//! and a non-empty story-points figure in the opened report.

use migcheck_core::types::{AnalysisStatus, IncidentCategory};
use migcheck_hub::MockHubClient;
use migcheck_scenario::{Suite, scenario};

use crate::helpers::assertions::*;
use crate::helpers::context::make_context;
use crate::helpers::fixtures::minimal_fixtures;

#[tokio::test]
async fn test_e2e_source_analysis_without_credentials() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("canonical")
        .with_scenario(scenario("create and start", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "bookserverApp",
                    "bookserver-app",
                    "bookserverApp",
                    "source_analysis",
                )?;
                analysis.create().await?;
                analysis.analyze().await?;
                ctx.registry.insert(analysis)?;
                Ok(())
            })
        }))
        .with_scenario(scenario("verify and validate story points", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.registry.claim("bookserverApp")?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                analysis.open_report().await?;
                // 기대값 미지정 프리셋 -- 0보다 큰 수치면 통과
                analysis.validate_story_points()?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert!(report.success(), "report:\n{report}");
    assert_eq!(report.passed_count(), 2);
}

/// The same flow with exact expectations wired through the fixture preset.
#[tokio::test]
async fn test_e2e_report_content_matches_fixture_expectations() {
    let hub = MockHubClient::new().with_report(migcheck_core::types::AnalysisReport {
        story_points: 5,
        incidents: vec![IncidentCategory {
            category: "mandatory".to_owned(),
            incidents: 24,
        }],
        transactions: Vec::new(),
        tags: Vec::new(),
    });
    let (mut ctx, _artifacts) = make_context(hub, minimal_fixtures());

    let suite = Suite::new("expectations")
        .with_scenario(scenario("create and start", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "expected",
                    "bookserver-app",
                    "expectedApp",
                    "source_analysis_with_expectations",
                )?;
                analysis.create().await?;
                analysis.analyze().await?;
                ctx.registry.insert(analysis)?;
                Ok(())
            })
        }))
        .with_scenario(scenario("verify content", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.registry.claim("expected")?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                analysis.open_report().await?;
                analysis.validate_story_points()?;
                analysis.validate_incidents()?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert!(report.success(), "report:\n{report}");
}

/// Mismatching report content fails the verification scenario with a
/// descriptive reason, not the whole suite run.
#[tokio::test]
async fn test_e2e_report_mismatch_is_descriptive() {
    let hub = MockHubClient::new().with_report(migcheck_core::types::AnalysisReport {
        story_points: 7,
        ..Default::default()
    });
    let (mut ctx, _artifacts) = make_context(hub, minimal_fixtures());

    let suite = Suite::new("mismatching")
        .with_scenario(scenario("create and start", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "mismatch",
                    "bookserver-app",
                    "mismatchApp",
                    "source_analysis_with_expectations",
                )?;
                analysis.create().await?;
                analysis.analyze().await?;
                ctx.registry.insert(analysis)?;
                Ok(())
            })
        }))
        .with_scenario(scenario("verify content", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.registry.claim("mismatch")?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                analysis.open_report().await?;
                analysis.validate_story_points()?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert_passed(&report, "create and start");
    assert_failed_with(&report, "verify content", "expected 5, got 7");
}
