//! 스위트 오케스트레이션 — 셋업, 순차 시나리오 실행, 티어다운, 계약 감사
//!
//! 실행 순서와 실패 격리 규칙:
//!
//! 1. **셋업** 실패는 스위트 전체를 중단합니다. 남은 시나리오는 전부
//!    Skipped로 기록되고 티어다운은 그래도 시도됩니다.
//! 2. **시나리오**는 선언 순서대로 엄격히 순차 실행되며, 한 시나리오의
//!    실패는 그 시나리오만 실패시킵니다.
//! 3. **티어다운**은 항상 시도됩니다.
//! 4. 마지막으로 **레지스트리 감사**: 생성 시나리오가 등록했지만 어떤
//!    검증 시나리오도 가져가지 않은 레이블이 있으면 계약 위반입니다.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use migcheck_core::config::MigcheckConfig;
use migcheck_core::error::MigcheckError;
use migcheck_fixture::FixtureSet;
use migcheck_hub::HubClient;

use crate::analysis::{Analysis, PollSettings};
use crate::credentials::CredentialStore;
use crate::registry::AnalysisRegistry;

/// 시나리오가 반환하는 박싱된 future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 시나리오 간 공유 컨텍스트
///
/// 레지스트리와 자격 증명 장부를 전역 상태 대신 명시적으로 주입합니다.
pub struct SuiteContext<H: HubClient> {
    /// 허브 클라이언트
    pub hub: Arc<H>,
    /// 하네스 설정
    pub config: MigcheckConfig,
    /// 로드된 픽스처
    pub fixtures: FixtureSet,
    /// 레이블 → 분석 레지스트리
    pub registry: AnalysisRegistry<H>,
    /// 생성된 자격 증명 장부
    pub credentials: CredentialStore,
    /// 설정 대신 쓸 폴링 설정 (테스트가 짧은 값을 주입할 때)
    poll_override: Option<PollSettings>,
}

impl<H: HubClient> SuiteContext<H> {
    /// 새 컨텍스트를 생성합니다.
    pub fn new(hub: Arc<H>, config: MigcheckConfig, fixtures: FixtureSet) -> Self {
        Self {
            hub,
            config,
            fixtures,
            registry: AnalysisRegistry::new(),
            credentials: CredentialStore::new(),
            poll_override: None,
        }
    }

    /// 설정 섹션 대신 쓸 폴링 설정을 지정합니다.
    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll_override = Some(poll);
        self
    }

    /// 유효한 폴링 설정을 반환합니다.
    pub fn poll_settings(&self) -> PollSettings {
        self.poll_override
            .unwrap_or_else(|| PollSettings::from_config(&self.config.polling))
    }

    /// 픽스처로부터 분석 인스턴스를 조립합니다.
    ///
    /// `application_key`/`preset`은 픽스처 키, `base_name`은 실행마다
    /// 유일 접미사가 붙는 애플리케이션 이름의 앞부분입니다.
    pub fn new_analysis(
        &self,
        label: &str,
        application_key: &str,
        base_name: &str,
        preset: &str,
    ) -> Result<Analysis<H>, MigcheckError> {
        let descriptor = self.fixtures.descriptor(application_key, base_name)?;
        let configuration = self.fixtures.configuration(preset)?;
        Ok(Analysis::new(
            Arc::clone(&self.hub),
            label,
            descriptor,
            configuration,
            self.poll_settings(),
        ))
    }
}

/// 스위트를 구성하는 시나리오 하나
///
/// 이름과 실행 본체만 요구하는 최소 인터페이스입니다.
pub trait Scenario<H: HubClient>: Send {
    /// 시나리오 이름 (리포트에 그대로 표시)
    fn name(&self) -> &str;

    /// 시나리오 본체를 실행합니다.
    fn run<'a>(
        &'a mut self,
        ctx: &'a mut SuiteContext<H>,
    ) -> BoxFuture<'a, Result<(), MigcheckError>>;
}

/// 클로저 기반 시나리오
struct FnScenario<F> {
    name: String,
    body: F,
}

impl<H, F> Scenario<H> for FnScenario<F>
where
    H: HubClient,
    F: for<'a> FnMut(&'a mut SuiteContext<H>) -> BoxFuture<'a, Result<(), MigcheckError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run<'a>(
        &'a mut self,
        ctx: &'a mut SuiteContext<H>,
    ) -> BoxFuture<'a, Result<(), MigcheckError>> {
        (self.body)(ctx)
    }
}

/// 클로저로 시나리오를 만듭니다.
///
/// ```ignore
/// suite.add(scenario("Source analysis on bookserver app", |ctx| {
///     Box::pin(async move {
///         let mut analysis = ctx.registry.claim("bookserverApp")?;
///         analysis.verify_status(AnalysisStatus::Completed).await?;
///         Ok(())
///     })
/// }));
/// ```
pub fn scenario<H, F>(name: impl Into<String>, body: F) -> Box<dyn Scenario<H>>
where
    H: HubClient,
    F: for<'a> FnMut(&'a mut SuiteContext<H>) -> BoxFuture<'a, Result<(), MigcheckError>>
        + Send
        + 'static,
{
    Box::new(FnScenario {
        name: name.into(),
        body,
    })
}

/// 시나리오 하나의 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// 통과
    Passed,
    /// 실패 (사유 포함)
    Failed(String),
    /// 셋업 실패로 실행되지 않음
    Skipped,
}

/// 이름 붙은 시나리오 결과
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// 시나리오 이름
    pub name: String,
    /// 결과
    pub status: ScenarioStatus,
}

/// 스위트 실행 결과 보고서
#[derive(Debug, Serialize)]
pub struct SuiteReport {
    /// 스위트 이름
    pub suite: String,
    /// 시나리오별 결과 (선언 순서)
    pub outcomes: Vec<ScenarioOutcome>,
    /// 셋업 실패 사유 (있으면 스위트가 중단된 것)
    pub setup_error: Option<String>,
    /// 티어다운 실패 사유
    pub teardown_error: Option<String>,
    /// 레지스트리 계약 위반 사유
    pub contract_error: Option<String>,
}

impl SuiteReport {
    fn new(suite: &str) -> Self {
        Self {
            suite: suite.to_owned(),
            outcomes: Vec::new(),
            setup_error: None,
            teardown_error: None,
            contract_error: None,
        }
    }

    /// 통과한 시나리오 수를 반환합니다.
    pub fn passed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScenarioStatus::Passed)
            .count()
    }

    /// 실패한 시나리오 수를 반환합니다.
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ScenarioStatus::Failed(_)))
            .count()
    }

    /// 건너뛴 시나리오 수를 반환합니다.
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScenarioStatus::Skipped)
            .count()
    }

    /// 스위트 전체가 성공했는지 여부를 반환합니다.
    ///
    /// 셋업/티어다운/계약 위반이 없고 실패한 시나리오도 없어야 합니다.
    pub fn success(&self) -> bool {
        self.setup_error.is_none()
            && self.teardown_error.is_none()
            && self.contract_error.is_none()
            && self.failed_count() == 0
            && self.skipped_count() == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "suite '{}': {} passed, {} failed, {} skipped",
            self.suite,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
        )?;
        if let Some(reason) = &self.setup_error {
            writeln!(f, "  setup failed: {reason}")?;
        }
        for outcome in &self.outcomes {
            match &outcome.status {
                ScenarioStatus::Passed => writeln!(f, "  PASS {}", outcome.name)?,
                ScenarioStatus::Failed(reason) => {
                    writeln!(f, "  FAIL {}: {reason}", outcome.name)?;
                }
                ScenarioStatus::Skipped => writeln!(f, "  SKIP {}", outcome.name)?,
            }
        }
        if let Some(reason) = &self.teardown_error {
            writeln!(f, "  teardown failed: {reason}")?;
        }
        if let Some(reason) = &self.contract_error {
            writeln!(f, "  contract violated: {reason}")?;
        }
        Ok(())
    }
}

/// 시나리오 스위트 — 셋업/시나리오/티어다운의 묶음
pub struct Suite<H: HubClient> {
    name: String,
    setup: Option<Box<dyn Scenario<H>>>,
    scenarios: Vec<Box<dyn Scenario<H>>>,
    teardown: Option<Box<dyn Scenario<H>>>,
}

impl<H: HubClient> Suite<H> {
    /// 빈 스위트를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            scenarios: Vec::new(),
            teardown: None,
        }
    }

    /// 스위트 이름을 반환합니다.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 셋업 단계를 지정합니다. 실패는 스위트 전체를 중단합니다.
    pub fn with_setup(mut self, setup: Box<dyn Scenario<H>>) -> Self {
        self.setup = Some(setup);
        self
    }

    /// 시나리오를 선언 순서대로 추가합니다.
    pub fn with_scenario(mut self, scenario: Box<dyn Scenario<H>>) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// 티어다운 단계를 지정합니다. 항상 시도됩니다.
    pub fn with_teardown(mut self, teardown: Box<dyn Scenario<H>>) -> Self {
        self.teardown = Some(teardown);
        self
    }

    /// 등록된 시나리오 수를 반환합니다.
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// 스위트를 실행하고 보고서를 반환합니다.
    pub async fn run(mut self, ctx: &mut SuiteContext<H>) -> SuiteReport {
        let mut report = SuiteReport::new(&self.name);
        info!(suite = %self.name, scenarios = self.scenarios.len(), "suite starting");

        // 셋업 -- 실패 시 전체 중단
        if let Some(mut setup) = self.setup.take() {
            info!(suite = %self.name, step = setup.name(), "running setup");
            if let Err(e) = setup.run(ctx).await {
                error!(suite = %self.name, error = %e, "setup failed, aborting suite");
                report.setup_error = Some(e.to_string());
                for skipped in &self.scenarios {
                    report.outcomes.push(ScenarioOutcome {
                        name: skipped.name().to_owned(),
                        status: ScenarioStatus::Skipped,
                    });
                }
                self.run_teardown(ctx, &mut report).await;
                return report;
            }
        }

        // 시나리오 -- 엄격한 순차 실행, 실패는 해당 시나리오에 국한
        for mut scenario in std::mem::take(&mut self.scenarios) {
            let name = scenario.name().to_owned();
            info!(suite = %self.name, scenario = %name, "scenario starting");
            let status = match scenario.run(ctx).await {
                Ok(()) => {
                    info!(suite = %self.name, scenario = %name, "scenario passed");
                    ScenarioStatus::Passed
                }
                Err(e) => {
                    error!(suite = %self.name, scenario = %name, error = %e, "scenario failed");
                    ScenarioStatus::Failed(e.to_string())
                }
            };
            report.outcomes.push(ScenarioOutcome { name, status });
        }

        // 티어다운 -- 항상 시도
        self.run_teardown(ctx, &mut report).await;

        // 레지스트리 계약 감사
        let unclaimed = ctx.registry.unclaimed();
        if !unclaimed.is_empty() {
            let reason = format!(
                "registry entries never claimed by a verification scenario: {}",
                unclaimed.join(", ")
            );
            error!(suite = %self.name, %reason, "scenario contract violated");
            report.contract_error = Some(reason);
        }

        info!(
            suite = %self.name,
            passed = report.passed_count(),
            failed = report.failed_count(),
            "suite finished"
        );
        report
    }

    async fn run_teardown(&mut self, ctx: &mut SuiteContext<H>, report: &mut SuiteReport) {
        if let Some(mut teardown) = self.teardown.take() {
            info!(suite = %self.name, step = teardown.name(), "running teardown");
            if let Err(e) = teardown.run(ctx).await {
                error!(suite = %self.name, error = %e, "teardown failed");
                report.teardown_error = Some(e.to_string());
            }
        }
    }
}
