//! 허브 전역 토글과 데이터 정리 — 셋업/티어다운 전용 헬퍼
//!
//! 프록시, 리포트 다운로드 허용 같은 전역 설정은 스위트 실행 중
//! before/after 훅에서만 변경하고 나머지 구간에서는 읽기 전용으로
//! 취급합니다. 시나리오가 순차 실행되므로 별도 잠금은 필요 없습니다.

use tracing::{info, warn};

use migcheck_core::error::MigcheckError;
use migcheck_core::types::ReportFormat;
use migcheck_hub::HubClient;

/// 모든 프록시를 비활성화합니다.
///
/// 분석이 프록시 설정에 좌우되지 않도록 셋업에서 호출합니다.
/// 비활성화한 프록시 수를 반환합니다.
pub async fn disable_all_proxies<H: HubClient>(hub: &H) -> Result<usize, MigcheckError> {
    let proxies = hub.list_proxies().await?;
    let mut disabled = 0usize;
    for proxy in proxies {
        if proxy.enabled {
            hub.set_proxy_enabled(proxy.id, false).await?;
            disabled += 1;
        }
    }
    info!(disabled, "proxies disabled");
    Ok(disabled)
}

/// 리포트 다운로드 토글을 설정합니다.
pub async fn set_report_download<H: HubClient>(
    hub: &H,
    format: ReportFormat,
    enabled: bool,
) -> Result<(), MigcheckError> {
    hub.set_setting(format.setting_key(), enabled).await?;
    info!(%format, enabled, "report download toggle updated");
    Ok(())
}

/// 리포트 다운로드 토글 상태를 조회합니다.
pub async fn report_download_enabled<H: HubClient>(
    hub: &H,
    format: ReportFormat,
) -> Result<bool, MigcheckError> {
    Ok(hub.get_setting(format.setting_key()).await?)
}

/// 등록된 모든 애플리케이션을 삭제합니다.
///
/// 이전 실행의 잔재 정리(셋업)와 실행 후 일괄 정리(티어다운)에서
/// 호출합니다. 개별 삭제 실패는 경고 로그만 남기고 계속 진행합니다.
/// 삭제한 애플리케이션 수를 반환합니다.
pub async fn delete_all_applications<H: HubClient>(hub: &H) -> Result<usize, MigcheckError> {
    let applications = hub.list_applications().await?;
    let mut deleted = 0usize;
    for application in applications {
        match hub.delete_application(application.id).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!(
                name = %application.name,
                error = %e,
                "failed to delete application during cleanup"
            ),
        }
    }
    info!(deleted, "applications deleted");
    Ok(deleted)
}
