//! 픽스처 로더 — JSON 픽스처 파일을 디스크에서 로드합니다.
//!
//! 픽스처 디렉토리는 두 파일을 담습니다.
//!
//! - `application.json`: 키 → 애플리케이션 소스 위치/메타데이터
//! - `analysis.json`: 키 → 분석 프리셋 (대상 기술, 플래그, 리포트 기대값)
//!
//! 로딩은 시나리오 셋업 시점에 동기적으로 한 번 일어나며,
//! 존재하지 않는 키 조회는 [`FixtureError::UnknownKey`]로 실패합니다.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use migcheck_core::error::FixtureError;
use migcheck_core::types::{
    AnalysisConfiguration, ApplicationDescriptor, ReportExpectations, SourceLocation,
};

use crate::data::unique_name;

/// 픽스처 파일 크기 상한
const MAX_FIXTURE_FILE_SIZE: u64 = 4 * 1024 * 1024; // 4MB

/// 애플리케이션 픽스처 레코드
///
/// 이름은 픽스처에 포함되지 않습니다. 실행마다 유일한 이름을
/// [`FixtureSet::descriptor`]가 부여합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationFixture {
    /// 소스 위치 (저장소 또는 바이너리 좌표)
    pub location: SourceLocation,
    /// 소속 비즈니스 서비스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_service: Option<String>,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 분석 프리셋 픽스처 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisFixture {
    /// 대상 기술 스택
    pub targets: Vec<String>,
    /// 자동 태깅 활성화
    #[serde(default)]
    pub enable_tagging: bool,
    /// 알려진 오픈소스 라이브러리 탐지 활성화
    #[serde(default)]
    pub detect_known_libraries: bool,
    /// 커스텀 룰셋 파일 목록
    #[serde(default)]
    pub custom_rules: Vec<String>,
    /// 리포트 기대값
    #[serde(default)]
    pub expectations: ReportExpectations,
}

/// 로드된 픽스처 집합
///
/// 한 스위트 실행 동안 불변으로 공유됩니다.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    applications: HashMap<String, ApplicationFixture>,
    analyses: HashMap<String, AnalysisFixture>,
}

impl FixtureSet {
    /// 픽스처 디렉토리에서 `application.json`과 `analysis.json`을 로드합니다.
    ///
    /// # Errors
    /// - 파일이 없거나 읽을 수 없는 경우
    /// - JSON 파싱에 실패한 경우
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();
        let applications = load_file(&dir.join("application.json")).await?;
        let analyses = load_file(&dir.join("analysis.json")).await?;

        info!(
            dir = %dir.display(),
            applications = applications.len(),
            analyses = analyses.len(),
            "loaded fixture set"
        );

        Ok(Self {
            applications,
            analyses,
        })
    }

    /// JSON 문자열 쌍에서 픽스처 집합을 생성합니다 (테스트용).
    pub fn parse(application_json: &str, analysis_json: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            applications: parse_map(application_json, "application.json")?,
            analyses: parse_map(analysis_json, "analysis.json")?,
        })
    }

    /// 키로 애플리케이션 픽스처를 조회합니다.
    pub fn application(&self, key: &str) -> Result<&ApplicationFixture, FixtureError> {
        self.applications
            .get(key)
            .ok_or_else(|| FixtureError::UnknownKey {
                kind: "application".to_owned(),
                key: key.to_owned(),
            })
    }

    /// 키로 분석 프리셋 픽스처를 조회합니다.
    pub fn analysis(&self, key: &str) -> Result<&AnalysisFixture, FixtureError> {
        self.analyses
            .get(key)
            .ok_or_else(|| FixtureError::UnknownKey {
                kind: "analysis".to_owned(),
                key: key.to_owned(),
            })
    }

    /// 애플리케이션 픽스처로부터 실행마다 유일한 서술자를 생성합니다.
    ///
    /// `base_name`에 유일 접미사를 붙여 이전 실행의 잔재와 충돌하지 않게 합니다.
    pub fn descriptor(
        &self,
        key: &str,
        base_name: &str,
    ) -> Result<ApplicationDescriptor, FixtureError> {
        let fixture = self.application(key)?;
        Ok(ApplicationDescriptor {
            name: unique_name(base_name),
            location: fixture.location.clone(),
            business_service: fixture.business_service.clone(),
            description: fixture.description.clone(),
        })
    }

    /// 분석 프리셋으로부터 분석 설정을 생성합니다.
    pub fn configuration(&self, preset: &str) -> Result<AnalysisConfiguration, FixtureError> {
        let fixture = self.analysis(preset)?;
        Ok(AnalysisConfiguration {
            preset: preset.to_owned(),
            targets: fixture.targets.clone(),
            enable_tagging: fixture.enable_tagging,
            detect_known_libraries: fixture.detect_known_libraries,
            custom_rules: fixture.custom_rules.clone(),
            expectations: fixture.expectations.clone(),
        })
    }

    /// 정렬된 애플리케이션 키 목록을 반환합니다.
    pub fn application_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.applications.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// 정렬된 분석 프리셋 키 목록을 반환합니다.
    pub fn analysis_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.analyses.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// 단일 픽스처 파일을 로드하고 파싱합니다.
async fn load_file<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<HashMap<String, T>, FixtureError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| FixtureError::FileNotFound {
            path: path.display().to_string(),
        })?;

    if metadata.len() > MAX_FIXTURE_FILE_SIZE {
        return Err(FixtureError::ParseFailed {
            path: path.display().to_string(),
            reason: format!(
                "file too large: {} bytes (max: {MAX_FIXTURE_FILE_SIZE})",
                metadata.len()
            ),
        });
    }

    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FixtureError::ParseFailed {
                path: path.display().to_string(),
                reason: format!("failed to read file: {e}"),
            })?;

    parse_map(&content, &path.display().to_string())
}

/// JSON 문자열을 키 맵으로 파싱합니다.
fn parse_map<T: serde::de::DeserializeOwned>(
    json_str: &str,
    source: &str,
) -> Result<HashMap<String, T>, FixtureError> {
    serde_json::from_str(json_str).map_err(|e| FixtureError::ParseFailed {
        path: source.to_owned(),
        reason: e.to_string(),
    })
}
