//! 설정 관리 — migcheck.toml 파싱 및 런타임 설정
//!
//! [`MigcheckConfig`]는 하네스 전체의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`MIGCHECK_HUB_BASE_URL=...` 형식)
//! 3. 설정 파일 (`migcheck.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), migcheck_core::error::MigcheckError> {
//! use migcheck_core::config::MigcheckConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = MigcheckConfig::load("migcheck.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = MigcheckConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, MigcheckError};

/// Migcheck 통합 설정
///
/// `migcheck.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigcheckConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 허브 연결 설정
    #[serde(default)]
    pub hub: HubConfig,
    /// 상태 폴링 설정
    #[serde(default)]
    pub polling: PollingConfig,
    /// 픽스처 설정
    #[serde(default)]
    pub fixtures: FixtureConfig,
    /// 생성 아티팩트 설정
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

impl MigcheckConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MigcheckError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, MigcheckError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MigcheckError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                MigcheckError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, MigcheckError> {
        toml::from_str(toml_str).map_err(|e| {
            MigcheckError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `MIGCHECK_{SECTION}_{FIELD}`
    /// 예: `MIGCHECK_HUB_BASE_URL=http://hub.local:8080/hub`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "MIGCHECK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "MIGCHECK_GENERAL_LOG_FORMAT");

        // Hub
        override_string(&mut self.hub.base_url, "MIGCHECK_HUB_BASE_URL");
        override_string(&mut self.hub.username, "MIGCHECK_HUB_USERNAME");
        override_string(&mut self.hub.password, "MIGCHECK_HUB_PASSWORD");
        override_u64(
            &mut self.hub.request_timeout_secs,
            "MIGCHECK_HUB_REQUEST_TIMEOUT_SECS",
        );

        // Polling
        override_u64(
            &mut self.polling.interval_secs,
            "MIGCHECK_POLLING_INTERVAL_SECS",
        );
        override_u64(
            &mut self.polling.analysis_timeout_secs,
            "MIGCHECK_POLLING_ANALYSIS_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.polling.create_timeout_secs,
            "MIGCHECK_POLLING_CREATE_TIMEOUT_SECS",
        );

        // Fixtures
        override_string(&mut self.fixtures.dir, "MIGCHECK_FIXTURES_DIR");

        // Artifacts
        override_string(&mut self.artifacts.dir, "MIGCHECK_ARTIFACTS_DIR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), MigcheckError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // base_url 검증
        if !self.hub.base_url.starts_with("http://") && !self.hub.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "hub.base_url".to_owned(),
                reason: "must start with http:// or https://".to_owned(),
            }
            .into());
        }

        if self.hub.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "hub.request_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        // 폴링 간격 검증
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.polling.analysis_timeout_secs < self.polling.interval_secs {
            return Err(ConfigError::InvalidValue {
                field: "polling.analysis_timeout_secs".to_owned(),
                reason: "must be at least polling.interval_secs".to_owned(),
            }
            .into());
        }

        if self.fixtures.dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fixtures.dir".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 허브 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// 허브 API 기본 URL
    pub base_url: String,
    /// 로그인 사용자명
    pub username: String,
    /// 로그인 비밀번호
    pub password: String,
    /// 요청별 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl HubConfig {
    /// 요청 타임아웃을 `Duration`으로 반환합니다.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/hub".to_owned(),
            username: "admin".to_owned(),
            password: String::new(),
            request_timeout_secs: 30,
        }
    }
}

/// 상태 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// 상태 조회 간격 (초)
    pub interval_secs: u64,
    /// 분석 종료 대기 시한 (초)
    pub analysis_timeout_secs: u64,
    /// 생성 확인 대기 시한 (초)
    pub create_timeout_secs: u64,
}

impl PollingConfig {
    /// 상태 조회 간격을 `Duration`으로 반환합니다.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// 분석 종료 대기 시한을 `Duration`으로 반환합니다.
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// 생성 확인 대기 시한을 `Duration`으로 반환합니다.
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            analysis_timeout_secs: 1800, // 30분 — 의존성 포함 소스 분석 기준
            create_timeout_secs: 120,
        }
    }
}

/// 픽스처 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// 픽스처 파일 디렉토리
    pub dir: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            dir: "fixtures".to_owned(),
        }
    }
}

/// 생성 아티팩트 설정
///
/// Maven settings.xml, SSH 키 파일 등 셋업 단계가 쓰는 파일의 위치입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// 아티팩트 출력 디렉토리
    pub dir: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: "/tmp/migcheck".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
