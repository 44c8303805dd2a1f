//! 에러 타입 — 도메인별 에러 정의

/// Migcheck 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum MigcheckError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 픽스처 로딩 에러
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),

    /// 허브 API 에러
    #[error("hub error: {0}")]
    Hub(#[from] HubError),

    /// 시나리오 실행 에러
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 픽스처 데이터 에러
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// 픽스처 파일을 찾을 수 없음
    #[error("fixture file not found: {path}")]
    FileNotFound { path: String },

    /// 픽스처 파싱 실패
    #[error("failed to parse fixture {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    /// 존재하지 않는 픽스처 키
    #[error("unknown {kind} fixture key: '{key}'")]
    UnknownKey { kind: String, key: String },
}

/// 허브 API 통신 에러
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// 연결 실패 (DNS, TCP, TLS 등)
    #[error("hub connection failed: {0}")]
    Connection(String),

    /// 허브가 에러 상태 코드를 반환
    #[error("hub rejected request: status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// 응답 본문 디코딩 실패
    #[error("failed to decode hub response: {0}")]
    Decode(String),

    /// 대상 리소스 없음
    #[error("hub resource not found: {0}")]
    NotFound(String),

    /// 서버 측에서 비활성화된 기능 호출
    #[error("hub feature disabled: {0}")]
    Disabled(String),
}

/// 시나리오 실행 에러
///
/// 실패 범주가 구분됩니다:
/// - `Setup`은 스위트 전체를 중단시킵니다.
/// - 나머지는 해당 시나리오만 실패시키고 스위트는 계속 진행합니다.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// 셋업/티어다운 실패 — 스위트 전체 중단
    #[error("suite setup failed: {0}")]
    Setup(String),

    /// 생명주기 순서 위반 (예: 생성 확인 전 분석 시작)
    #[error("operation '{operation}' not allowed in state '{state}'")]
    Lifecycle { operation: String, state: String },

    /// 최종 상태가 기대값과 불일치
    #[error("analysis '{label}' finished with status '{actual}', expected '{expected}'")]
    StatusMismatch {
        label: String,
        expected: String,
        actual: String,
    },

    /// 폴링 시한 초과 — 상태 불일치와 구분되는 별도 실패
    #[error("'{label}' timed out after {waited_secs}s waiting for {waiting_for} (last seen: '{last}')")]
    PollTimeout {
        label: String,
        waited_secs: u64,
        waiting_for: String,
        last: String,
    },

    /// 리포트 내용 검증 실패
    #[error("assertion failed for '{label}': {reason}")]
    Assertion { label: String, reason: String },

    /// 시나리오 계약 위반 (예: 레지스트리 미소비 항목)
    #[error("scenario contract violated: {0}")]
    Contract(String),
}

impl ScenarioError {
    /// 이 에러가 스위트 전체를 중단시켜야 하는지 여부를 반환합니다.
    pub fn aborts_suite(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}
