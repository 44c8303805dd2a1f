//! S3: Report download toggles.
//!
//! A disabled export format must fail cleanly (never a silent no-op),
//! and the other format must stay unaffected.

use migcheck_core::types::{AnalysisStatus, ReportFormat};
use migcheck_hub::MockHubClient;
use migcheck_scenario::{Suite, admin, report, scenario};

use crate::helpers::assertions::*;
use crate::helpers::context::make_context;
use crate::helpers::fixtures::minimal_fixtures;

/// CSV disabled in setup -> downloading CSV fails with a "disabled" reason,
/// while the HTML export still succeeds and parses.
#[tokio::test]
async fn test_e2e_disabled_csv_download_fails_cleanly() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("downloads")
        .with_setup(scenario("disable csv downloads", |ctx| {
            Box::pin(async move {
                admin::set_report_download(&*ctx.hub, ReportFormat::Csv, false).await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("csv download", |ctx| {
            Box::pin(async move {
                let mut analysis =
                    ctx.new_analysis("csv", "bookserver-app", "csvApp", "source_analysis")?;
                analysis.create().await?;
                analysis.analyze().await?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                analysis.download_report(ReportFormat::Csv).await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("html download", |ctx| {
            Box::pin(async move {
                let mut analysis =
                    ctx.new_analysis("html", "bookserver-app", "htmlApp", "source_analysis")?;
                analysis.create().await?;
                analysis.analyze().await?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                let bytes = analysis.download_report(ReportFormat::Html).await?;
                report::verify_html_export(analysis.label(), &bytes)?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert_failed_with(&report, "csv download", "disabled");
    assert_passed(&report, "html download");
}

/// With both toggles enabled, both exports download and pass format checks.
#[tokio::test]
async fn test_e2e_enabled_exports_pass_format_checks() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("downloads-enabled").with_scenario(scenario("both formats", |ctx| {
        Box::pin(async move {
            let mut analysis =
                ctx.new_analysis("both", "bookserver-app", "exportApp", "source_analysis")?;
            analysis.create().await?;
            analysis.analyze().await?;
            analysis.verify_status(AnalysisStatus::Completed).await?;

            let csv = analysis.download_report(ReportFormat::Csv).await?;
            report::verify_csv_export(analysis.label(), &csv)?;

            let html = analysis.download_report(ReportFormat::Html).await?;
            report::verify_html_export(analysis.label(), &html)?;
            Ok(())
        })
    }));

    let report = suite.run(&mut ctx).await;
    assert!(report.success(), "report:\n{report}");
}
