//! HTTP 허브 클라이언트 — reqwest 기반 운영 구현
//!
//! 모든 요청은 설정된 타임아웃과 Basic 인증을 사용하며,
//! 응답 상태를 도메인 에러로 변환합니다.
//!
//! # 상태 코드 변환 규칙
//!
//! - 404 → [`HubApiError::NotFound`]
//! - 403 → [`HubApiError::Disabled`] (다운로드 토글 등 서버 측 비활성화)
//! - 기타 실패 → [`HubApiError::Rejected`]
//! - 전송 실패 → [`HubApiError::Connection`]

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use migcheck_core::config::HubConfig;
use migcheck_core::types::{
    AnalysisConfiguration, AnalysisRef, AnalysisReport, AnalysisStatus, Application,
    ApplicationDescriptor, CredentialKind, CredentialRecord, ProxyRecord, ReportFormat,
    SourceLocation,
};

use crate::client::{CredentialRequest, HubClient};
use crate::error::HubApiError;

/// 에러 메시지에 포함할 응답 본문 최대 길이
const MAX_ERROR_BODY: usize = 200;

/// reqwest 기반 허브 클라이언트
///
/// [`HubConfig`]에서 기본 URL, 로그인 자격, 요청 타임아웃을 가져옵니다.
pub struct HttpHubClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpHubClient {
    /// 설정으로부터 클라이언트를 생성합니다.
    ///
    /// # Errors
    /// TLS 백엔드 초기화 등 클라이언트 구성이 실패하면
    /// [`HubApiError::Connection`]을 반환합니다.
    pub fn new(config: &HubConfig) -> Result<Self, HubApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| HubApiError::Connection(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }
}

/// 전송 에러를 도메인 에러로 변환합니다.
fn transport_error(err: reqwest::Error) -> HubApiError {
    HubApiError::Connection(err.to_string())
}

/// 응답 상태를 검사하고 실패를 도메인 에러로 변환합니다.
async fn check(response: Response, context: &str) -> Result<Response, HubApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        // 멀티바이트 경계를 피해서 자름
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }

    match status.as_u16() {
        404 => Err(HubApiError::NotFound(context.to_owned())),
        403 => Err(HubApiError::Disabled(format!("{context}: {body}"))),
        code => Err(HubApiError::Rejected {
            status: code,
            message: body,
        }),
    }
}

/// JSON 응답 본문을 디코딩합니다.
async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, HubApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| HubApiError::Decode(format!("{context}: {e}")))
}

// --- 와이어 페이로드 ---
// 허브 API의 요청/응답 스키마입니다. 도메인 타입과는 의도적으로 분리합니다.

#[derive(Debug, Serialize)]
struct ApplicationPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "businessService", skip_serializing_if = "Option::is_none")]
    business_service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<RepositoryPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary: Option<String>,
}

#[derive(Debug, Serialize)]
struct RepositoryPayload<'a> {
    kind: String,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

impl<'a> ApplicationPayload<'a> {
    fn from_descriptor(descriptor: &'a ApplicationDescriptor) -> Self {
        let (repository, binary) = match &descriptor.location {
            SourceLocation::Repository {
                kind,
                url,
                branch,
                root_path,
            } => (
                Some(RepositoryPayload {
                    kind: kind.to_string(),
                    url,
                    branch: branch.as_deref(),
                    path: root_path.as_deref(),
                }),
                None,
            ),
            SourceLocation::Binary {
                group,
                artifact,
                version,
                packaging,
            } => (None, Some(format!("{group}:{artifact}:{version}:{packaging}"))),
        };

        Self {
            name: &descriptor.name,
            description: descriptor.description.as_deref(),
            business_service: descriptor.business_service.as_deref(),
            repository,
            binary,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationResponse {
    id: u64,
    name: String,
}

impl From<ApplicationResponse> for Application {
    fn from(resp: ApplicationResponse) -> Self {
        Self {
            id: resp.id,
            name: resp.name,
        }
    }
}

#[derive(Debug, Serialize)]
struct IdentityPayload<'a> {
    name: &'a str,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    id: u64,
    name: String,
    kind: String,
}

impl IdentityResponse {
    fn into_record(self) -> Result<CredentialRecord, HubApiError> {
        let kind = CredentialKind::from_str_loose(&self.kind).ok_or_else(|| {
            HubApiError::Decode(format!("unknown credential kind '{}'", self.kind))
        })?;
        Ok(CredentialRecord {
            id: self.id,
            name: self.name,
            kind,
        })
    }
}

#[derive(Debug, Serialize)]
struct AttachPayload {
    source: Option<u64>,
    maven: Option<u64>,
}

#[derive(Debug, Serialize)]
struct AnalysisPayload<'a> {
    #[serde(rename = "applicationId")]
    application_id: u64,
    targets: &'a [String],
    #[serde(rename = "enableTagging")]
    enable_tagging: bool,
    #[serde(rename = "detectKnownLibraries")]
    detect_known_libraries: bool,
    #[serde(rename = "customRules", skip_serializing_if = "<[_]>::is_empty")]
    custom_rules: &'a [String],
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    id: u64,
    #[serde(rename = "applicationId")]
    application_id: u64,
    status: String,
}

impl AnalysisResponse {
    fn into_ref(self) -> Result<AnalysisRef, HubApiError> {
        let status = AnalysisStatus::from_str_loose(&self.status).ok_or_else(|| {
            HubApiError::Decode(format!("unknown analysis status '{}'", self.status))
        })?;
        Ok(AnalysisRef {
            id: self.id,
            application_id: self.application_id,
            status,
        })
    }
}

#[derive(Debug, Serialize)]
struct ProxyPayload {
    enabled: bool,
}

impl HubClient for HttpHubClient {
    async fn ping(&self) -> Result<(), HubApiError> {
        let response = self
            .get("applications")
            .send()
            .await
            .map_err(transport_error)?;
        check(response, "ping").await?;
        Ok(())
    }

    async fn create_application(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> Result<Application, HubApiError> {
        debug!(name = %descriptor.name, location = %descriptor.location, "creating application");
        let payload = ApplicationPayload::from_descriptor(descriptor);
        let response = self
            .post("applications")
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "create application").await?;
        let created: ApplicationResponse = decode(response, "create application").await?;
        Ok(created.into())
    }

    async fn find_application(&self, name: &str) -> Result<Option<Application>, HubApiError> {
        let response = self
            .get("applications")
            .query(&[("name", name)])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "find application").await?;
        let matches: Vec<ApplicationResponse> = decode(response, "find application").await?;
        Ok(matches
            .into_iter()
            .find(|a| a.name == name)
            .map(Application::from))
    }

    async fn list_applications(&self) -> Result<Vec<Application>, HubApiError> {
        let response = self
            .get("applications")
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "list applications").await?;
        let apps: Vec<ApplicationResponse> = decode(response, "list applications").await?;
        Ok(apps.into_iter().map(Application::from).collect())
    }

    async fn delete_application(&self, id: u64) -> Result<(), HubApiError> {
        let response = self
            .delete(&format!("applications/{id}"))
            .send()
            .await
            .map_err(transport_error)?;
        check(response, &format!("delete application {id}")).await?;
        Ok(())
    }

    async fn create_credential(
        &self,
        request: &CredentialRequest,
    ) -> Result<CredentialRecord, HubApiError> {
        debug!(name = %request.name, kind = %request.kind, "creating credential");
        let payload = IdentityPayload {
            name: &request.name,
            kind: request.kind.to_string(),
            user: request.username.as_deref(),
            password: request.password.as_deref(),
            key: request.key.as_deref(),
            settings: request.settings.as_deref(),
        };
        let response = self
            .post("identities")
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "create credential").await?;
        let created: IdentityResponse = decode(response, "create credential").await?;
        created.into_record()
    }

    async fn list_credentials(&self) -> Result<Vec<CredentialRecord>, HubApiError> {
        let response = self
            .get("identities")
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "list credentials").await?;
        let identities: Vec<IdentityResponse> = decode(response, "list credentials").await?;
        identities.into_iter().map(IdentityResponse::into_record).collect()
    }

    async fn delete_credential(&self, id: u64) -> Result<(), HubApiError> {
        let response = self
            .delete(&format!("identities/{id}"))
            .send()
            .await
            .map_err(transport_error)?;
        check(response, &format!("delete credential {id}")).await?;
        Ok(())
    }

    async fn attach_credentials(
        &self,
        application_id: u64,
        source: Option<u64>,
        maven: Option<u64>,
    ) -> Result<(), HubApiError> {
        let payload = AttachPayload { source, maven };
        let response = self
            .put(&format!("applications/{application_id}/identities"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        check(response, &format!("attach credentials to {application_id}")).await?;
        Ok(())
    }

    async fn start_analysis(
        &self,
        application_id: u64,
        configuration: &AnalysisConfiguration,
    ) -> Result<AnalysisRef, HubApiError> {
        debug!(
            application_id,
            preset = %configuration.preset,
            "starting analysis"
        );
        let payload = AnalysisPayload {
            application_id,
            targets: &configuration.targets,
            enable_tagging: configuration.enable_tagging,
            detect_known_libraries: configuration.detect_known_libraries,
            custom_rules: &configuration.custom_rules,
        };
        let response = self
            .post("analyses")
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "start analysis").await?;
        let started: AnalysisResponse = decode(response, "start analysis").await?;
        started.into_ref()
    }

    async fn get_analysis(&self, analysis_id: u64) -> Result<AnalysisRef, HubApiError> {
        let response = self
            .get(&format!("analyses/{analysis_id}"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, &format!("analysis {analysis_id}")).await?;
        let analysis: AnalysisResponse = decode(response, "get analysis").await?;
        analysis.into_ref()
    }

    async fn get_report(&self, analysis_id: u64) -> Result<AnalysisReport, HubApiError> {
        let response = self
            .get(&format!("analyses/{analysis_id}/report"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, &format!("report for analysis {analysis_id}")).await?;
        decode(response, "get report").await
    }

    async fn download_report(
        &self,
        analysis_id: u64,
        format: ReportFormat,
    ) -> Result<Bytes, HubApiError> {
        let format_param = format.to_string().to_ascii_lowercase();
        let response = self
            .get(&format!("analyses/{analysis_id}/report/export"))
            .query(&[("format", format_param.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, &format!("{format} report download")).await?;
        response
            .bytes()
            .await
            .map_err(|e| HubApiError::Decode(format!("report download body: {e}")))
    }

    async fn get_setting(&self, key: &str) -> Result<bool, HubApiError> {
        let response = self
            .get(&format!("settings/{key}"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, &format!("setting {key}")).await?;
        decode(response, "get setting").await
    }

    async fn set_setting(&self, key: &str, value: bool) -> Result<(), HubApiError> {
        let response = self
            .put(&format!("settings/{key}"))
            .json(&value)
            .send()
            .await
            .map_err(transport_error)?;
        check(response, &format!("update setting {key}")).await?;
        Ok(())
    }

    async fn list_proxies(&self) -> Result<Vec<ProxyRecord>, HubApiError> {
        let response = self
            .get("proxies")
            .send()
            .await
            .map_err(transport_error)?;
        let response = check(response, "list proxies").await?;
        decode(response, "list proxies").await
    }

    async fn set_proxy_enabled(&self, id: u64, enabled: bool) -> Result<(), HubApiError> {
        let response = self
            .put(&format!("proxies/{id}"))
            .json(&ProxyPayload { enabled })
            .send()
            .await
            .map_err(transport_error)?;
        check(response, &format!("update proxy {id}")).await?;
        Ok(())
    }
}
