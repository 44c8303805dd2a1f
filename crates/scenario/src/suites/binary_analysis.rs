//! 바이너리 분석 스위트 — Maven 좌표 기반 애플리케이션의 분석/검증
//!
//! 소스 저장소 대신 아티팩트 좌표(group:artifact:version:packaging)를 가리키는
//! 애플리케이션을 만들어 분석하고, 스토리 포인트/트랜잭션 리포트와
//! CSV/HTML 내보내기까지 검증합니다.

use std::path::PathBuf;

use migcheck_core::error::ScenarioError;
use migcheck_core::types::{AnalysisStatus, CredentialKind, ReportFormat};
use migcheck_fixture::{data, scrub_maven_settings, write_maven_settings};
use migcheck_hub::{CredentialRequest, HubClient};

use crate::admin;
use crate::credentials::CredentialSelection;
use crate::report;
use crate::suite::{Scenario, Suite, SuiteContext, scenario};

/// 스위트 이름
pub const NAME: &str = "binary-analysis";

const LABEL_CUSTOMERS: &str = "customersApp_binary";

fn maven_settings_path<H: HubClient>(ctx: &SuiteContext<H>) -> PathBuf {
    PathBuf::from(&ctx.config.artifacts.dir).join("settings.xml")
}

/// 셋업 — 허브 확인, 잔재 정리, 다운로드 토글 허용, Maven 자격 증명
fn setup<H: HubClient>() -> Box<dyn Scenario<H>> {
    scenario("Login and prepare hub", |ctx: &mut SuiteContext<H>| {
        Box::pin(async move {
            ctx.hub
                .ping()
                .await
                .map_err(|e| ScenarioError::Setup(format!("hub not reachable: {e}")))?;

            admin::delete_all_applications(&*ctx.hub).await?;
            admin::disable_all_proxies(&*ctx.hub).await?;

            // 내보내기 검증을 위해 두 형식 모두 허용 상태로 시작
            admin::set_report_download(&*ctx.hub, ReportFormat::Csv, true).await?;
            admin::set_report_download(&*ctx.hub, ReportFormat::Html, true).await?;

            let settings_path = maven_settings_path(ctx);
            write_maven_settings(
                &settings_path,
                &format!("deploy-{}", data::unique_suffix()),
                &data::random_secret(),
            )
            .await?;
            let settings_xml = tokio::fs::read_to_string(&settings_path).await?;
            ctx.credentials
                .create(
                    &*ctx.hub,
                    CredentialRequest::maven(data::unique_name("maven-creds"), settings_xml),
                )
                .await?;

            Ok(())
        })
    })
}

/// 생성 시나리오 — 바이너리 애플리케이션을 만들고 분석 시작
fn create_application<H: HubClient>() -> Box<dyn Scenario<H>> {
    scenario("Create binary application and start analysis", |ctx| {
        Box::pin(async move {
            let maven_name = ctx
                .credentials
                .first_of(CredentialKind::Maven)
                .map(|r| r.name.clone())
                .ok_or_else(|| {
                    ScenarioError::Contract(
                        "no maven credential was created during setup".to_owned(),
                    )
                })?;

            let mut analysis = ctx.new_analysis(
                LABEL_CUSTOMERS,
                "customers-binary",
                "customersApp_binary",
                "binary_analysis_on_customers",
            )?;
            analysis.create().await?;
            analysis
                .manage_credentials(
                    CredentialSelection::None,
                    CredentialSelection::Named(maven_name),
                )
                .await?;
            analysis.analyze().await?;
            ctx.registry.insert(analysis)?;

            Ok(())
        })
    })
}

/// 검증 시나리오 — 상태, 리포트 내용, 내보내기 형식
fn verify_application<H: HubClient>() -> Box<dyn Scenario<H>> {
    scenario("Binary analysis on customers application", |ctx| {
        Box::pin(async move {
            let mut analysis = ctx.registry.claim(LABEL_CUSTOMERS)?;
            analysis.verify_status(AnalysisStatus::Completed).await?;
            analysis.open_report().await?;

            analysis.validate_story_points()?;
            analysis.validate_incidents()?;
            analysis.validate_transactions()?;

            let csv = analysis.download_report(ReportFormat::Csv).await?;
            report::verify_csv_export(analysis.label(), &csv)?;

            let html = analysis.download_report(ReportFormat::Html).await?;
            report::verify_html_export(analysis.label(), &html)?;

            Ok(())
        })
    })
}

/// 티어다운 — 일괄 삭제와 아티팩트 정리
fn teardown<H: HubClient>() -> Box<dyn Scenario<H>> {
    scenario("Clean up test data", |ctx| {
        Box::pin(async move {
            admin::delete_all_applications(&*ctx.hub).await?;

            let mut credentials = std::mem::take(&mut ctx.credentials);
            credentials.delete_all(&*ctx.hub).await?;

            scrub_maven_settings(maven_settings_path(ctx)).await?;
            Ok(())
        })
    })
}

/// 바이너리 분석 스위트를 조립합니다.
pub fn suite<H: HubClient>() -> Suite<H> {
    Suite::new(NAME)
        .with_setup(setup())
        .with_scenario(create_application())
        .with_scenario(verify_application())
        .with_teardown(teardown())
}
