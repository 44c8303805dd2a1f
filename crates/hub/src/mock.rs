//! 모의 허브 — 설정 가능한 인메모리 구현
//!
//! [`MockHubClient`]는 허브 없이 시나리오 계층을 검증하기 위한 구현입니다.
//! 분석 상태 진행, 생성 반영 지연, 다운로드 토글, 실패 주입을 스크립트할 수
//! 있습니다. 상태 진행 모델: [`get_analysis`](crate::client::HubClient::get_analysis)
//! 호출마다 상태 스크립트를 한 단계씩 소비하고, 스크립트가 끝나면 지정된
//! 최종 상태에 머뭅니다.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use migcheck_core::types::{
    AnalysisConfiguration, AnalysisRef, AnalysisReport, AnalysisStatus, Application,
    ApplicationDescriptor, CredentialRecord, ProxyRecord, ReportFormat, SETTING_CSV_DOWNLOAD,
    SETTING_HTML_DOWNLOAD,
};

use crate::client::{CredentialRequest, HubClient};
use crate::error::HubApiError;

/// 상태 진행 중인 모의 분석
#[derive(Debug, Clone)]
struct MockAnalysis {
    application_id: u64,
    current: AnalysisStatus,
    pending: VecDeque<AnalysisStatus>,
    outcome: AnalysisStatus,
}

#[derive(Debug)]
struct MockState {
    next_id: u64,
    applications: Vec<Application>,
    /// 애플리케이션 ID → 검색에 반영되기까지 남은 find 호출 수
    visibility: HashMap<u64, u32>,
    credentials: Vec<CredentialRecord>,
    attach_calls: Vec<(u64, Option<u64>, Option<u64>)>,
    analyses: HashMap<u64, MockAnalysis>,
    settings: HashMap<String, bool>,
    proxies: Vec<ProxyRecord>,
}

impl MockState {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn application(&self, id: u64) -> Result<&Application, HubApiError> {
        self.applications
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| HubApiError::NotFound(format!("application {id}")))
    }
}

impl Default for MockState {
    fn default() -> Self {
        let mut settings = HashMap::new();
        settings.insert(SETTING_CSV_DOWNLOAD.to_owned(), true);
        settings.insert(SETTING_HTML_DOWNLOAD.to_owned(), true);

        Self {
            next_id: 0,
            applications: Vec::new(),
            visibility: HashMap::new(),
            credentials: Vec::new(),
            attach_calls: Vec::new(),
            analyses: HashMap::new(),
            settings,
            proxies: vec![
                ProxyRecord {
                    id: 1,
                    kind: "http".to_owned(),
                    enabled: true,
                },
                ProxyRecord {
                    id: 2,
                    kind: "https".to_owned(),
                    enabled: true,
                },
            ],
        }
    }
}

/// 설정 가능한 모의 허브 클라이언트
///
/// `Clone`은 내부 상태를 공유하므로, 테스트가 핸들을 보관한 채
/// 시나리오 계층에 넘겨 호출 내역을 검증할 수 있습니다.
#[derive(Clone, Debug)]
pub struct MockHubClient {
    state: Arc<Mutex<MockState>>,
    status_script: Vec<AnalysisStatus>,
    default_outcome: AnalysisStatus,
    outcome_overrides: Vec<(String, AnalysisStatus)>,
    report_template: AnalysisReport,
    report_overrides: Vec<(String, AnalysisReport)>,
    visibility_lag: u32,
    fail_ping: bool,
    reject_create: Option<String>,
}

impl MockHubClient {
    /// 기본 모의 허브를 생성합니다.
    ///
    /// 기본 동작: 생성 즉시 검색에 반영, 상태 스크립트
    /// `[Queued, InProgress]` 후 `Completed`, 다운로드 토글 모두 허용.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            status_script: vec![AnalysisStatus::Queued, AnalysisStatus::InProgress],
            default_outcome: AnalysisStatus::Completed,
            outcome_overrides: Vec::new(),
            report_template: AnalysisReport {
                story_points: 5,
                ..AnalysisReport::default()
            },
            report_overrides: Vec::new(),
            visibility_lag: 0,
            fail_ping: false,
            reject_create: None,
        }
    }

    /// 모든 분석의 최종 상태를 지정합니다.
    pub fn with_outcome(mut self, outcome: AnalysisStatus) -> Self {
        self.default_outcome = outcome;
        self
    }

    /// 이름이 `prefix`로 시작하는 애플리케이션의 최종 상태를 지정합니다.
    pub fn with_outcome_for(mut self, prefix: &str, outcome: AnalysisStatus) -> Self {
        self.outcome_overrides.push((prefix.to_owned(), outcome));
        self
    }

    /// 종료 전의 상태 진행 스크립트를 지정합니다.
    ///
    /// 빈 스크립트는 첫 조회부터 최종 상태를 반환합니다.
    pub fn with_status_script(mut self, script: Vec<AnalysisStatus>) -> Self {
        self.status_script = script;
        self
    }

    /// 완료된 분석이 반환할 리포트를 지정합니다.
    pub fn with_report(mut self, report: AnalysisReport) -> Self {
        self.report_template = report;
        self
    }

    /// 이름이 `prefix`로 시작하는 애플리케이션의 리포트를 지정합니다.
    pub fn with_report_for(mut self, prefix: &str, report: AnalysisReport) -> Self {
        self.report_overrides.push((prefix.to_owned(), report));
        self
    }

    /// 생성된 애플리케이션이 검색에 반영되기까지의 find 호출 수를 지정합니다.
    ///
    /// 생성 확인 폴링(eventual consistency) 경로를 검증할 때 사용합니다.
    pub fn with_visibility_lag(mut self, lag: u32) -> Self {
        self.visibility_lag = lag;
        self
    }

    /// `ping`이 실패하도록 설정합니다.
    pub fn with_ping_failure(mut self) -> Self {
        self.fail_ping = true;
        self
    }

    /// 애플리케이션 생성이 거부되도록 설정합니다.
    pub fn with_create_rejection(mut self, message: &str) -> Self {
        self.reject_create = Some(message.to_owned());
        self
    }

    // --- 테스트 검증용 조회 ---

    /// 등록된 애플리케이션 수를 반환합니다.
    pub fn application_count(&self) -> usize {
        self.lock().applications.len()
    }

    /// 등록된 자격 증명 수를 반환합니다.
    pub fn credential_count(&self) -> usize {
        self.lock().credentials.len()
    }

    /// 자격 증명 연결 호출 내역을 반환합니다.
    pub fn attach_calls(&self) -> Vec<(u64, Option<u64>, Option<u64>)> {
        self.lock().attach_calls.clone()
    }

    /// 설정 값을 직접 조회합니다 (없으면 `None`).
    pub fn setting(&self, key: &str) -> Option<bool> {
        self.lock().settings.get(key).copied()
    }

    /// 활성화된 프록시 수를 반환합니다.
    pub fn enabled_proxy_count(&self) -> usize {
        self.lock().proxies.iter().filter(|p| p.enabled).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock hub state lock poisoned")
    }

    fn outcome_for(&self, application_name: &str) -> AnalysisStatus {
        self.outcome_overrides
            .iter()
            .find(|(prefix, _)| application_name.starts_with(prefix.as_str()))
            .map(|(_, outcome)| *outcome)
            .unwrap_or(self.default_outcome)
    }

    fn report_for(&self, application_name: &str) -> AnalysisReport {
        self.report_overrides
            .iter()
            .find(|(prefix, _)| application_name.starts_with(prefix.as_str()))
            .map(|(_, report)| report.clone())
            .unwrap_or_else(|| self.report_template.clone())
    }

    /// 완료 상태 검증을 포함해 리포트 대상 분석을 조회합니다.
    fn completed_analysis(
        state: &MockState,
        analysis_id: u64,
    ) -> Result<MockAnalysis, HubApiError> {
        let analysis = state
            .analyses
            .get(&analysis_id)
            .cloned()
            .ok_or_else(|| HubApiError::NotFound(format!("analysis {analysis_id}")))?;
        if analysis.current != AnalysisStatus::Completed {
            return Err(HubApiError::Rejected {
                status: 409,
                message: format!(
                    "report not available: analysis {analysis_id} is {}",
                    analysis.current
                ),
            });
        }
        Ok(analysis)
    }
}

impl Default for MockHubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HubClient for MockHubClient {
    async fn ping(&self) -> Result<(), HubApiError> {
        if self.fail_ping {
            return Err(HubApiError::Connection("mock ping failure".to_owned()));
        }
        Ok(())
    }

    async fn create_application(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> Result<Application, HubApiError> {
        if let Some(message) = &self.reject_create {
            return Err(HubApiError::Rejected {
                status: 422,
                message: message.clone(),
            });
        }

        let mut state = self.lock();
        if state.applications.iter().any(|a| a.name == descriptor.name) {
            return Err(HubApiError::Rejected {
                status: 409,
                message: format!("duplicate application name '{}'", descriptor.name),
            });
        }

        let id = state.alloc_id();
        let application = Application {
            id,
            name: descriptor.name.clone(),
        };
        state.applications.push(application.clone());
        if self.visibility_lag > 0 {
            state.visibility.insert(id, self.visibility_lag);
        }
        Ok(application)
    }

    async fn find_application(&self, name: &str) -> Result<Option<Application>, HubApiError> {
        let mut state = self.lock();
        let Some(application) = state
            .applications
            .iter()
            .find(|a| a.name == name)
            .cloned()
        else {
            return Ok(None);
        };

        // 반영 지연 시뮬레이션: 남은 카운트가 있으면 아직 보이지 않음
        if let Some(remaining) = state.visibility.get_mut(&application.id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }
        Ok(Some(application))
    }

    async fn list_applications(&self) -> Result<Vec<Application>, HubApiError> {
        Ok(self.lock().applications.clone())
    }

    async fn delete_application(&self, id: u64) -> Result<(), HubApiError> {
        let mut state = self.lock();
        let before = state.applications.len();
        state.applications.retain(|a| a.id != id);
        if state.applications.len() == before {
            return Err(HubApiError::NotFound(format!("application {id}")));
        }
        state.analyses.retain(|_, a| a.application_id != id);
        Ok(())
    }

    async fn create_credential(
        &self,
        request: &CredentialRequest,
    ) -> Result<CredentialRecord, HubApiError> {
        let mut state = self.lock();
        if state.credentials.iter().any(|c| c.name == request.name) {
            return Err(HubApiError::Rejected {
                status: 409,
                message: format!("duplicate credential name '{}'", request.name),
            });
        }
        let id = state.alloc_id();
        let record = CredentialRecord {
            id,
            name: request.name.clone(),
            kind: request.kind,
        };
        state.credentials.push(record.clone());
        Ok(record)
    }

    async fn list_credentials(&self) -> Result<Vec<CredentialRecord>, HubApiError> {
        Ok(self.lock().credentials.clone())
    }

    async fn delete_credential(&self, id: u64) -> Result<(), HubApiError> {
        let mut state = self.lock();
        let before = state.credentials.len();
        state.credentials.retain(|c| c.id != id);
        if state.credentials.len() == before {
            return Err(HubApiError::NotFound(format!("credential {id}")));
        }
        Ok(())
    }

    async fn attach_credentials(
        &self,
        application_id: u64,
        source: Option<u64>,
        maven: Option<u64>,
    ) -> Result<(), HubApiError> {
        let mut state = self.lock();
        state.application(application_id)?;
        for credential_id in [source, maven].into_iter().flatten() {
            if !state.credentials.iter().any(|c| c.id == credential_id) {
                return Err(HubApiError::NotFound(format!("credential {credential_id}")));
            }
        }
        state.attach_calls.push((application_id, source, maven));
        Ok(())
    }

    async fn start_analysis(
        &self,
        application_id: u64,
        _configuration: &AnalysisConfiguration,
    ) -> Result<AnalysisRef, HubApiError> {
        let mut state = self.lock();
        let application_name = state.application(application_id)?.name.clone();
        let outcome = self.outcome_for(&application_name);

        let mut pending: VecDeque<AnalysisStatus> = self.status_script.iter().copied().collect();
        let current = pending.pop_front().unwrap_or(outcome);

        let id = state.alloc_id();
        state.analyses.insert(
            id,
            MockAnalysis {
                application_id,
                current,
                pending,
                outcome,
            },
        );

        Ok(AnalysisRef {
            id,
            application_id,
            status: current,
        })
    }

    async fn get_analysis(&self, analysis_id: u64) -> Result<AnalysisRef, HubApiError> {
        let mut state = self.lock();
        let analysis = state
            .analyses
            .get_mut(&analysis_id)
            .ok_or_else(|| HubApiError::NotFound(format!("analysis {analysis_id}")))?;

        // 조회마다 스크립트를 한 단계씩 진행
        if !analysis.current.is_terminal() {
            analysis.current = analysis.pending.pop_front().unwrap_or(analysis.outcome);
        }

        Ok(AnalysisRef {
            id: analysis_id,
            application_id: analysis.application_id,
            status: analysis.current,
        })
    }

    async fn get_report(&self, analysis_id: u64) -> Result<AnalysisReport, HubApiError> {
        let state = self.lock();
        let analysis = Self::completed_analysis(&state, analysis_id)?;
        let name = state.application(analysis.application_id)?.name.clone();
        drop(state);
        Ok(self.report_for(&name))
    }

    async fn download_report(
        &self,
        analysis_id: u64,
        format: ReportFormat,
    ) -> Result<Bytes, HubApiError> {
        let state = self.lock();
        let enabled = state
            .settings
            .get(format.setting_key())
            .copied()
            .unwrap_or(false);
        if !enabled {
            return Err(HubApiError::Disabled(format!("{format} report download")));
        }

        let analysis = Self::completed_analysis(&state, analysis_id)?;
        let name = state.application(analysis.application_id)?.name.clone();
        drop(state);

        let report = self.report_for(&name);
        let total_incidents: u64 = report.incidents.iter().map(|c| c.incidents).sum();
        let body = match format {
            ReportFormat::Csv => format!(
                "Application,Story Points,Incidents\n{name},{},{total_incidents}\n",
                report.story_points
            ),
            ReportFormat::Html => format!(
                "<html><body><h1>{name}</h1><p>Story Points: {}</p></body></html>",
                report.story_points
            ),
        };
        Ok(Bytes::from(body))
    }

    async fn get_setting(&self, key: &str) -> Result<bool, HubApiError> {
        self.lock()
            .settings
            .get(key)
            .copied()
            .ok_or_else(|| HubApiError::NotFound(format!("setting {key}")))
    }

    async fn set_setting(&self, key: &str, value: bool) -> Result<(), HubApiError> {
        self.lock().settings.insert(key.to_owned(), value);
        Ok(())
    }

    async fn list_proxies(&self) -> Result<Vec<ProxyRecord>, HubApiError> {
        Ok(self.lock().proxies.clone())
    }

    async fn set_proxy_enabled(&self, id: u64, enabled: bool) -> Result<(), HubApiError> {
        let mut state = self.lock();
        let proxy = state
            .proxies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| HubApiError::NotFound(format!("proxy {id}")))?;
        proxy.enabled = enabled;
        Ok(())
    }
}
