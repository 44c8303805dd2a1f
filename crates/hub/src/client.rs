//! 허브 API trait — 테스트 가능한 경계
//!
//! 모든 허브 호출은 [`HubClient`] trait을 거치며, 운영 코드는
//! [`HttpHubClient`](crate::http::HttpHubClient)를, 테스트는
//! [`MockHubClient`](crate::mock::MockHubClient)를 사용합니다.
//!
//! # 에러 처리
//!
//! - **404**: [`HubApiError::NotFound`]로 변환
//! - **403**: 기능 비활성화로 간주하여 [`HubApiError::Disabled`]로 변환
//! - **연결 실패**: [`HubApiError::Connection`]으로 래핑

use std::future::Future;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use migcheck_core::types::{
    AnalysisConfiguration, AnalysisRef, AnalysisReport, Application, ApplicationDescriptor,
    CredentialKind, CredentialRecord, ProxyRecord, ReportFormat,
};

use crate::error::HubApiError;

/// 자격 증명 등록 요청
///
/// 종류에 따라 사용하는 필드가 다릅니다.
/// - `SourceUserPass`: `username` + `password`
/// - `SourceKey`: `key`
/// - `Maven`: `settings` (settings.xml 본문)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// 자격 증명 이름 (스위트 실행 내에서 유일)
    pub name: String,
    /// 종류
    pub kind: CredentialKind,
    /// 사용자명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 비밀번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// 개인 키 본문
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Maven settings.xml 본문
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

/// 허브 API 작업을 추상화하는 trait
///
/// 모든 허브 호출이 이 trait을 거치므로 모의 구현으로 대체할 수 있습니다.
/// `Send + Sync + 'static`으로 비동기 컨텍스트 간 안전하게 공유됩니다.
pub trait HubClient: Send + Sync + 'static {
    /// 허브 연결과 로그인 자격을 확인합니다.
    ///
    /// 스위트 셋업 단계에서 호출되며, 실패는 셋업 실패(전체 중단)입니다.
    fn ping(&self) -> impl Future<Output = Result<(), HubApiError>> + Send;

    /// 애플리케이션을 등록합니다.
    ///
    /// 등록 요청이 수락되었다고 해서 목록 조회에 즉시 반영된다는 보장은
    /// 없습니다. 호출자는 [`find_application`](Self::find_application)으로
    /// 반영을 확인해야 합니다.
    fn create_application(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> impl Future<Output = Result<Application, HubApiError>> + Send;

    /// 이름으로 애플리케이션을 검색합니다.
    fn find_application(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Application>, HubApiError>> + Send;

    /// 등록된 모든 애플리케이션을 조회합니다.
    fn list_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<Application>, HubApiError>> + Send;

    /// 애플리케이션을 삭제합니다.
    fn delete_application(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<(), HubApiError>> + Send;

    /// 자격 증명을 등록합니다.
    fn create_credential(
        &self,
        request: &CredentialRequest,
    ) -> impl Future<Output = Result<CredentialRecord, HubApiError>> + Send;

    /// 등록된 모든 자격 증명을 조회합니다.
    fn list_credentials(
        &self,
    ) -> impl Future<Output = Result<Vec<CredentialRecord>, HubApiError>> + Send;

    /// 자격 증명을 삭제합니다.
    fn delete_credential(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<(), HubApiError>> + Send;

    /// 애플리케이션에 자격 증명을 연결합니다.
    ///
    /// `None`은 해당 슬롯을 명시적으로 비워 두는 요청이며,
    /// 호출 자체를 생략하는 것과 서버 측 효과는 같지만 기록이 남습니다.
    fn attach_credentials(
        &self,
        application_id: u64,
        source: Option<u64>,
        maven: Option<u64>,
    ) -> impl Future<Output = Result<(), HubApiError>> + Send;

    /// 분석 실행을 시작합니다.
    ///
    /// 완료를 기다리지 않고 허브가 부여한 분석 참조만 반환합니다.
    fn start_analysis(
        &self,
        application_id: u64,
        configuration: &AnalysisConfiguration,
    ) -> impl Future<Output = Result<AnalysisRef, HubApiError>> + Send;

    /// 분석 실행 상태를 조회합니다.
    fn get_analysis(
        &self,
        analysis_id: u64,
    ) -> impl Future<Output = Result<AnalysisRef, HubApiError>> + Send;

    /// 완료된 분석의 리포트 내용을 조회합니다.
    fn get_report(
        &self,
        analysis_id: u64,
    ) -> impl Future<Output = Result<AnalysisReport, HubApiError>> + Send;

    /// 리포트를 지정한 형식으로 내려받습니다.
    ///
    /// 해당 형식의 다운로드 토글이 꺼져 있으면
    /// [`HubApiError::Disabled`]로 실패합니다.
    fn download_report(
        &self,
        analysis_id: u64,
        format: ReportFormat,
    ) -> impl Future<Output = Result<Bytes, HubApiError>> + Send;

    /// 허브 전역 설정 값을 조회합니다.
    fn get_setting(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<bool, HubApiError>> + Send;

    /// 허브 전역 설정 값을 변경합니다.
    fn set_setting(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), HubApiError>> + Send;

    /// 프록시 설정 레코드를 조회합니다.
    fn list_proxies(
        &self,
    ) -> impl Future<Output = Result<Vec<ProxyRecord>, HubApiError>> + Send;

    /// 프록시 활성화 여부를 변경합니다.
    fn set_proxy_enabled(
        &self,
        id: u64,
        enabled: bool,
    ) -> impl Future<Output = Result<(), HubApiError>> + Send;
}

impl CredentialRequest {
    /// 사용자명/비밀번호 소스 자격 증명 요청을 생성합니다.
    pub fn source_userpass(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: CredentialKind::SourceUserPass,
            username: Some(username.into()),
            password: Some(password.into()),
            key: None,
            settings: None,
        }
    }

    /// 개인 키 소스 자격 증명 요청을 생성합니다.
    pub fn source_key(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CredentialKind::SourceKey,
            username: None,
            password: None,
            key: Some(key.into()),
            settings: None,
        }
    }

    /// Maven 자격 증명 요청을 생성합니다.
    pub fn maven(name: impl Into<String>, settings_xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CredentialKind::Maven,
            username: None,
            password: None,
            key: None,
            settings: Some(settings_xml.into()),
        }
    }
}
