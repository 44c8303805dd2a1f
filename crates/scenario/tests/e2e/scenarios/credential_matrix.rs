//! S2: Credential selection matrix.
//!
//! Explicit `None` selections, named credentials, and unknown names,
//! all driven through suite scenarios against the mock hub.

use migcheck_core::types::AnalysisStatus;
use migcheck_hub::{CredentialRequest, MockHubClient};
use migcheck_scenario::{CredentialSelection, Suite, scenario};

use crate::helpers::assertions::*;
use crate::helpers::context::make_context;
use crate::helpers::fixtures::minimal_fixtures;

/// manage_credentials(None, None) attaches nothing, is recorded, and the
/// application stays analyzable. Omitting the call entirely is equally legal.
#[tokio::test]
async fn test_e2e_explicit_none_vs_omitted_call() {
    let hub = MockHubClient::new();
    let (mut ctx, _artifacts) = make_context(hub.clone(), minimal_fixtures());

    let suite = Suite::new("credential-none")
        .with_scenario(scenario("explicit none", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "explicit",
                    "bookserver-app",
                    "explicitNone",
                    "source_analysis",
                )?;
                analysis.create().await?;
                analysis
                    .manage_credentials(CredentialSelection::None, CredentialSelection::None)
                    .await?;
                assert!(analysis.credentials_attached());
                analysis.analyze().await?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("omitted call", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "omitted",
                    "bookserver-app",
                    "omittedCall",
                    "source_analysis",
                )?;
                analysis.create().await?;
                // manage_credentials를 아예 호출하지 않음
                assert!(!analysis.credentials_attached());
                analysis.analyze().await?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert_passed(&report, "explicit none");
    assert_passed(&report, "omitted call");

    // 명시적 None 호출만 허브에 기록됨 -- 연결된 자격 증명은 양쪽 슬롯 다 없음
    let calls = hub.attach_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, None);
    assert_eq!(calls[0].2, None);
}

/// Named credentials created in setup resolve to hub ids at attach time.
#[tokio::test]
async fn test_e2e_named_credentials_through_setup() {
    let hub = MockHubClient::new();
    let (mut ctx, _artifacts) = make_context(hub.clone(), minimal_fixtures());

    let suite = Suite::new("credential-named")
        .with_setup(scenario("create credentials", |ctx| {
            Box::pin(async move {
                ctx.credentials
                    .create(
                        &*ctx.hub,
                        CredentialRequest::source_userpass("sc-cred", "user", "pass"),
                    )
                    .await?;
                ctx.credentials
                    .create(&*ctx.hub, CredentialRequest::maven("mvn-cred", "<settings/>"))
                    .await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("attach both", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "both",
                    "bookserver-app",
                    "bothCreds",
                    "source_analysis",
                )?;
                analysis.create().await?;
                analysis
                    .manage_credentials(
                        CredentialSelection::named("sc-cred"),
                        CredentialSelection::named("mvn-cred"),
                    )
                    .await?;
                analysis.analyze().await?;
                analysis.verify_status(AnalysisStatus::Completed).await?;
                Ok(())
            })
        }));

    let report = suite.run(&mut ctx).await;
    assert!(report.success(), "report:\n{report}");

    let calls = hub.attach_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.is_some());
    assert!(calls[0].2.is_some());
}

/// A credential name that was never registered fails the scenario only.
#[tokio::test]
async fn test_e2e_unknown_credential_name_fails_scenario() {
    let (mut ctx, _artifacts) = make_context(MockHubClient::new(), minimal_fixtures());

    let suite = Suite::new("credential-ghost")
        .with_scenario(scenario("ghost credential", |ctx| {
            Box::pin(async move {
                let mut analysis = ctx.new_analysis(
                    "ghost",
                    "bookserver-app",
                    "ghostCreds",
                    "source_analysis",
                )?;
                analysis.create().await?;
                analysis
                    .manage_credentials(
                        CredentialSelection::named("does-not-exist"),
                        CredentialSelection::None,
                    )
                    .await?;
                Ok(())
            })
        }))
        .with_scenario(scenario("unaffected", |_ctx| Box::pin(async { Ok(()) })));

    let report = suite.run(&mut ctx).await;
    assert_failed_with(&report, "ghost credential", "does-not-exist");
    assert_passed(&report, "unaffected");
}
