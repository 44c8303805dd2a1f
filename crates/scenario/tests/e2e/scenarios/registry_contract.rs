//! S4: Registry claim contract across creation and verification scenarios.

use migcheck_core::types::AnalysisStatus;
use migcheck_hub::MockHubClient;
use migcheck_scenario::{Suite, scenario};

use crate::helpers::assertions::*;
use crate::helpers::context::make_context;
use crate::helpers::fixtures::minimal_fixtures;

/// Creating two analyses but verifying only one leaves an unclaimed entry,
/// which the suite audit reports as a contract violation.
#[tokio::test]
async fn test_e2e_unclaimed_entry_is_a_contract_violation() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("contract")
        .with_scenario(scenario("create two", |ctx| {
            Box::pin(async move {
                for (label, base) in [("verified", "verifiedApp"), ("forgotten", "forgottenApp")] {
                    let mut analysis =
                        ctx.new_analysis(label, "bookserver-app", base, "source_analysis")?;
                    analysis.create().await?;
                    analysis.analyze().await?;
                    ctx.registry.insert(analysis)?;
                }
                Ok(())
            })
        }))
        .with_scenario(scenario("verify one", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.registry.claim("verified")?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert_passed(&report, "verify one");

    let contract = report.contract_error.as_deref().expect("audit must fire");
    assert!(contract.contains("forgotten"));
    assert!(!contract.contains("verified,"));
    assert!(!report.success());
}

/// Two verification scenarios claiming the same label: the second fails,
/// the suite records it, and the audit itself stays clean.
#[tokio::test]
async fn test_e2e_double_claim_fails_second_scenario() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("double-claim")
        .with_scenario(scenario("create", |ctx| {
            Box::pin(async move {
                let mut analysis =
                    ctx.new_analysis("shared", "bookserver-app", "sharedApp", "source_analysis")?;
                analysis.create().await?;
                analysis.analyze().await?;
                ctx.registry.insert(analysis)?;
                Ok(())
            })
        }))
        .with_scenario(scenario("first claim", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.registry.claim("shared")?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("second claim", |ctx| {
            Box::pin(async move {
                let _ = ctx.registry.claim("shared")?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert_passed(&report, "first claim");
    assert_failed_with(&report, "second claim", "already claimed");
    assert!(report.contract_error.is_none());
}
