//! 허브 클라이언트 에러 타입
//!
//! [`HubApiError`]는 허브 통신에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<HubApiError> for MigcheckError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.

use migcheck_core::error::{HubError, MigcheckError};

/// 허브 API 도메인 에러
///
/// # 에러 변환
///
/// `From<HubApiError> for MigcheckError` 구현으로
/// 시나리오 계층에서 사용하는 최상위 에러 타입으로 자동 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum HubApiError {
    /// 연결 실패 (DNS, TCP, TLS, 타임아웃)
    #[error("connection failed: {0}")]
    Connection(String),

    /// 허브가 거부 상태 코드를 반환
    #[error("request rejected: status {status}: {message}")]
    Rejected {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문 요약
        message: String,
    },

    /// 응답 본문 디코딩 실패
    #[error("response decode failed: {0}")]
    Decode(String),

    /// 대상 리소스 없음 (404)
    #[error("resource not found: {0}")]
    NotFound(String),

    /// 서버 측에서 비활성화된 기능 (403)
    #[error("feature disabled: {0}")]
    Disabled(String),
}

impl From<HubApiError> for MigcheckError {
    fn from(err: HubApiError) -> Self {
        match err {
            HubApiError::Connection(msg) => MigcheckError::Hub(HubError::Connection(msg)),
            HubApiError::Rejected { status, message } => {
                MigcheckError::Hub(HubError::Rejected { status, message })
            }
            HubApiError::Decode(msg) => MigcheckError::Hub(HubError::Decode(msg)),
            HubApiError::NotFound(msg) => MigcheckError::Hub(HubError::NotFound(msg)),
            HubApiError::Disabled(msg) => MigcheckError::Hub(HubError::Disabled(msg)),
        }
    }
}
