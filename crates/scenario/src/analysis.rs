//! 분석 생명주기 모델 — 서술자 + 설정 한 쌍의 상태 기계
//!
//! [`Analysis`]는 애플리케이션 하나와 분석 설정 하나를 묶어
//! 생성부터 리포트 검증까지의 생명주기를 관리합니다.
//!
//! # 상태 기계
//! ```text
//! Pending → create() → Created → analyze() → Running
//!                         │                     │
//!                manage_credentials()    verify_status()
//!                         │                     │
//!                      Created          {Completed | Failed}
//! ```
//!
//! 종료 상태는 싱크이며 자동 재시도는 없습니다. 순서를 어긴 호출은
//! 대기 없이 [`ScenarioError::Lifecycle`]로 즉시 실패합니다.
//! 특히 생성 확인 전의 `analyze()`는 거부됩니다.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::{debug, info};

use migcheck_core::config::PollingConfig;
use migcheck_core::error::{MigcheckError, ScenarioError};
use migcheck_core::types::{
    AnalysisConfiguration, AnalysisRef, AnalysisReport, AnalysisStatus, Application,
    ApplicationDescriptor, ReportFormat,
};
use migcheck_hub::HubClient;

use crate::credentials::CredentialSelection;
use crate::report;

/// 생성 확인 폴링 간격
///
/// 생성 반영은 수 초 내에 끝나는 것이 보통이므로 상태 폴링 간격과
/// 별도로 짧게 유지합니다.
const CREATE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 폴링 시간 설정
///
/// [`PollingConfig`]에서 파생되며, 테스트는 짧은 값을 직접 지정합니다.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// 상태 조회 간격
    pub status_interval: Duration,
    /// 분석 종료 대기 시한
    pub analysis_deadline: Duration,
    /// 생성 반영 대기 시한
    pub create_deadline: Duration,
}

impl PollSettings {
    /// 설정 섹션에서 폴링 설정을 만듭니다.
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            status_interval: config.interval(),
            analysis_deadline: config.analysis_timeout(),
            create_deadline: config.create_timeout(),
        }
    }

    /// 테스트용 고속 설정 (밀리초 단위 간격/시한)
    pub fn fast() -> Self {
        Self {
            status_interval: Duration::from_millis(5),
            analysis_deadline: Duration::from_millis(500),
            create_deadline: Duration::from_millis(500),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

/// 생명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// 메모리에만 존재, 아직 허브에 등록되지 않음
    Pending,
    /// 허브 등록이 확인됨 (자격 증명 연결/분석 시작 가능)
    Created,
    /// 분석 실행 중
    Running,
    /// 분석 정상 완료
    Completed,
    /// 분석 실패
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// 분석 집합체 — 서술자 + 설정 + 런타임 상태
///
/// 하나의 [`ApplicationDescriptor`]와 하나의 [`AnalysisConfiguration`]을
/// 소유하며, 허브 호출은 전부 주입된 [`HubClient`]를 거칩니다.
#[derive(Debug)]
pub struct Analysis<H: HubClient> {
    hub: Arc<H>,
    label: String,
    descriptor: ApplicationDescriptor,
    configuration: AnalysisConfiguration,
    poll: PollSettings,
    state: LifecycleState,
    application: Option<Application>,
    analysis: Option<AnalysisRef>,
    report: Option<AnalysisReport>,
    credentials_attached: bool,
}

impl<H: HubClient> Analysis<H> {
    /// 새 분석 인스턴스를 생성합니다. 허브에는 아직 아무것도 만들지 않습니다.
    pub fn new(
        hub: Arc<H>,
        label: impl Into<String>,
        descriptor: ApplicationDescriptor,
        configuration: AnalysisConfiguration,
        poll: PollSettings,
    ) -> Self {
        Self {
            hub,
            label: label.into(),
            descriptor,
            configuration,
            poll,
            state: LifecycleState::Pending,
            application: None,
            analysis: None,
            report: None,
            credentials_attached: false,
        }
    }

    /// 레지스트리 레이블을 반환합니다.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 현재 생명주기 상태를 반환합니다.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// 애플리케이션 서술자를 반환합니다.
    pub fn descriptor(&self) -> &ApplicationDescriptor {
        &self.descriptor
    }

    /// 분석 설정을 반환합니다.
    pub fn configuration(&self) -> &AnalysisConfiguration {
        &self.configuration
    }

    /// 허브에 등록된 애플리케이션을 반환합니다 (생성 확인 후에만 Some).
    pub fn application(&self) -> Option<&Application> {
        self.application.as_ref()
    }

    /// 열람한 리포트를 반환합니다 (`open_report` 후에만 Some).
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// `manage_credentials`가 호출된 적 있는지 여부를 반환합니다.
    ///
    /// `(None, None)` 호출도 기록됩니다. 호출 생략과 명시적 미연결을
    /// 구분하기 위한 플래그입니다.
    pub fn credentials_attached(&self) -> bool {
        self.credentials_attached
    }

    fn require_state(
        &self,
        operation: &str,
        expected: LifecycleState,
    ) -> Result<(), ScenarioError> {
        if self.state != expected {
            return Err(ScenarioError::Lifecycle {
                operation: operation.to_owned(),
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// 애플리케이션을 허브에 등록하고 반영을 확인합니다.
    ///
    /// 등록 요청 후 목록 조회에 반영될 때까지 폴링합니다. 원본 스위트가
    /// `GET /hub/application` 응답을 동기화 지점으로 기다리는 것과 같은
    /// 역할입니다. 시한 내에 반영되지 않으면 [`ScenarioError::PollTimeout`],
    /// 서버가 거부하면 허브 에러가 그대로 전파됩니다.
    pub async fn create(&mut self) -> Result<(), MigcheckError> {
        self.require_state("create", LifecycleState::Pending)?;

        let application = self.hub.create_application(&self.descriptor).await?;
        debug!(label = %self.label, id = application.id, "application submitted");

        let deadline = Instant::now() + self.poll.create_deadline;
        loop {
            if let Some(found) = self.hub.find_application(&self.descriptor.name).await? {
                if found.id == application.id {
                    info!(label = %self.label, id = found.id, "application creation confirmed");
                    self.application = Some(found);
                    self.state = LifecycleState::Created;
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(ScenarioError::PollTimeout {
                    label: self.label.clone(),
                    waited_secs: self.poll.create_deadline.as_secs(),
                    waiting_for: "application creation to be reflected".to_owned(),
                    last: "not visible".to_owned(),
                }
                .into());
            }

            tokio::time::sleep(CREATE_POLL_INTERVAL.min(self.poll.status_interval)).await;
        }
    }

    /// 자격 증명을 연결합니다.
    ///
    /// [`CredentialSelection::None`]은 해당 슬롯을 명시적으로 비워 두는
    /// 선택이며, 호출 자체를 생략하는 것과 구분되어 기록됩니다.
    /// 이름으로 지정한 자격 증명이 허브에 없으면 실패합니다.
    pub async fn manage_credentials(
        &mut self,
        source: CredentialSelection,
        maven: CredentialSelection,
    ) -> Result<(), MigcheckError> {
        self.require_state("manage_credentials", LifecycleState::Created)?;

        let application_id = self.application_id()?;
        let registered = self.hub.list_credentials().await?;
        let resolve = |selection: &CredentialSelection| -> Result<Option<u64>, MigcheckError> {
            match selection.name() {
                None => Ok(None),
                Some(name) => registered
                    .iter()
                    .find(|c| c.name == name)
                    .map(|c| Some(c.id))
                    .ok_or_else(|| {
                        migcheck_core::error::HubError::NotFound(format!("credential '{name}'"))
                            .into()
                    }),
            }
        };

        let source_id = resolve(&source)?;
        let maven_id = resolve(&maven)?;

        self.hub
            .attach_credentials(application_id, source_id, maven_id)
            .await?;
        self.credentials_attached = true;
        info!(
            label = %self.label,
            source = source.name().unwrap_or("<none>"),
            maven = maven.name().unwrap_or("<none>"),
            "credentials managed"
        );
        Ok(())
    }

    /// 분석 실행을 시작합니다. 완료를 기다리지 않습니다.
    ///
    /// 생성 확인([`create`](Self::create) 완료) 전에는 거부됩니다.
    pub async fn analyze(&mut self) -> Result<(), MigcheckError> {
        self.require_state("analyze", LifecycleState::Created)?;

        let application_id = self.application_id()?;
        let analysis = self
            .hub
            .start_analysis(application_id, &self.configuration)
            .await?;
        info!(label = %self.label, analysis_id = analysis.id, "analysis started");
        self.analysis = Some(analysis);
        self.state = LifecycleState::Running;
        Ok(())
    }

    /// 종료 상태까지 폴링하고 기대 상태와 비교합니다.
    ///
    /// - 종료 상태가 기대와 다르면 [`ScenarioError::StatusMismatch`]
    /// - 시한 내에 종료 상태에 도달하지 못하면 [`ScenarioError::PollTimeout`]
    ///
    /// 두 실패는 별개 사유로 보고됩니다. 기대값은 종료 상태여야 합니다.
    pub async fn verify_status(
        &mut self,
        expected: AnalysisStatus,
    ) -> Result<(), MigcheckError> {
        if !expected.is_terminal() {
            return Err(ScenarioError::Lifecycle {
                operation: format!("verify_status({expected})"),
                state: "expected status must be terminal".to_owned(),
            }
            .into());
        }
        self.require_state("verify_status", LifecycleState::Running)?;

        let analysis_id = self.analysis_id()?;
        let deadline = Instant::now() + self.poll.analysis_deadline;

        loop {
            let status = self.hub.get_analysis(analysis_id).await?.status;
            debug!(label = %self.label, %status, "polled analysis status");

            if status.is_terminal() {
                self.state = match status {
                    AnalysisStatus::Completed => LifecycleState::Completed,
                    _ => LifecycleState::Failed,
                };
                if status != expected {
                    return Err(ScenarioError::StatusMismatch {
                        label: self.label.clone(),
                        expected: expected.to_string(),
                        actual: status.to_string(),
                    }
                    .into());
                }
                info!(label = %self.label, %status, "analysis reached expected status");
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ScenarioError::PollTimeout {
                    label: self.label.clone(),
                    waited_secs: self.poll.analysis_deadline.as_secs(),
                    waiting_for: "a terminal analysis status".to_owned(),
                    last: status.to_string(),
                }
                .into());
            }

            tokio::time::sleep(self.poll.status_interval).await;
        }
    }

    /// 생성된 리포트를 열람합니다.
    ///
    /// 분석이 `Completed`로 끝난 뒤에만 허용됩니다.
    pub async fn open_report(&mut self) -> Result<(), MigcheckError> {
        self.require_state("open_report", LifecycleState::Completed)?;

        let analysis_id = self.analysis_id()?;
        let report = self.hub.get_report(analysis_id).await?;
        info!(
            label = %self.label,
            story_points = report.story_points,
            "report opened"
        );
        self.report = Some(report);
        Ok(())
    }

    /// 리포트를 지정 형식으로 내려받습니다.
    ///
    /// 해당 형식의 다운로드가 허브에서 비활성화되어 있으면 조용히
    /// 넘어가지 않고 [`HubError::Disabled`](migcheck_core::error::HubError)로
    /// 실패합니다.
    pub async fn download_report(&self, format: ReportFormat) -> Result<Bytes, MigcheckError> {
        self.require_state("download_report", LifecycleState::Completed)?;
        let analysis_id = self.analysis_id()?;
        let bytes = self.hub.download_report(analysis_id, format).await?;
        info!(label = %self.label, %format, size = bytes.len(), "report downloaded");
        Ok(bytes)
    }

    /// 리포트의 스토리 포인트를 기대값과 비교합니다.
    pub fn validate_story_points(&self) -> Result<(), MigcheckError> {
        let report = self.opened_report()?;
        report::validate_story_points(
            &self.label,
            report,
            self.configuration.expectations.story_points,
        )
        .map_err(Into::into)
    }

    /// 범주별 인시던트 수를 기대값과 비교합니다.
    pub fn validate_incidents(&self) -> Result<(), MigcheckError> {
        let report = self.opened_report()?;
        report::validate_incidents(
            &self.label,
            report,
            &self.configuration.expectations.incidents,
        )
        .map_err(Into::into)
    }

    /// 트랜잭션 리포트를 기대값과 비교합니다.
    pub fn validate_transactions(&self) -> Result<(), MigcheckError> {
        let report = self.opened_report()?;
        report::validate_transactions(
            &self.label,
            report,
            self.configuration.expectations.transactions,
        )
        .map_err(Into::into)
    }

    /// 지정한 태그가 모두 리포트에 존재하는지 검증합니다.
    pub fn tags_exist(&self, tags: &[String]) -> Result<(), MigcheckError> {
        let report = self.opened_report()?;
        report::validate_tags_exist(&self.label, report, tags).map_err(Into::into)
    }

    /// 리포트에 태그가 하나도 부여되지 않았는지 검증합니다.
    ///
    /// 자동 태깅 비활성화 시나리오에서 사용합니다.
    pub fn tags_absent(&self) -> Result<(), MigcheckError> {
        let report = self.opened_report()?;
        report::validate_tags_absent(&self.label, report).map_err(Into::into)
    }

    fn application_id(&self) -> Result<u64, MigcheckError> {
        self.application
            .as_ref()
            .map(|a| a.id)
            .ok_or_else(|| {
                ScenarioError::Lifecycle {
                    operation: "application_id".to_owned(),
                    state: self.state.to_string(),
                }
                .into()
            })
    }

    fn analysis_id(&self) -> Result<u64, MigcheckError> {
        self.analysis
            .as_ref()
            .map(|a| a.id)
            .ok_or_else(|| {
                ScenarioError::Lifecycle {
                    operation: "analysis_id".to_owned(),
                    state: self.state.to_string(),
                }
                .into()
            })
    }

    fn opened_report(&self) -> Result<&AnalysisReport, MigcheckError> {
        self.report.as_ref().ok_or_else(|| {
            ScenarioError::Lifecycle {
                operation: "validate report".to_owned(),
                state: format!("{} (report not opened)", self.state),
            }
            .into()
        })
    }
}
