//! 자격 증명 관리 — 이름 붙은 자격 증명 레코드의 생성/선택/정리
//!
//! 자격 증명은 스위트 실행당 한 번 셋업 단계에서 만들어지고,
//! 여러 분석 인스턴스가 이름으로 참조한 뒤 티어다운에서 일괄 삭제됩니다.

use tracing::{info, warn};

use migcheck_core::error::MigcheckError;
use migcheck_core::types::{CredentialKind, CredentialRecord};
use migcheck_hub::{CredentialRequest, HubClient};

/// 자격 증명 선택
///
/// 원본 스위트의 `"None"` 문자열 센티널을 대체하는 명시적 variant입니다.
/// `None`은 "이 슬롯을 명시적으로 비워 둔다"는 뜻이며,
/// `manage_credentials` 호출 자체를 생략하는 것과 구분됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSelection {
    /// 명시적으로 연결하지 않음
    None,
    /// 이름으로 자격 증명을 지정
    Named(String),
}

impl CredentialSelection {
    /// 이름 지정 선택을 생성합니다.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// 지정된 이름을 반환합니다 (`None` 선택이면 `Option::None`).
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Named(name) => Some(name),
        }
    }
}

/// 스위트 실행 동안 만들어진 자격 증명의 장부
///
/// 티어다운에서 [`delete_all`](Self::delete_all)로 일괄 정리합니다.
#[derive(Debug, Default)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// 빈 장부를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 허브에 자격 증명을 등록하고 장부에 기록합니다.
    pub async fn create<H: HubClient>(
        &mut self,
        hub: &H,
        request: CredentialRequest,
    ) -> Result<CredentialRecord, MigcheckError> {
        let record = hub.create_credential(&request).await?;
        info!(name = %record.name, kind = %record.kind, "credential created");
        self.records.push(record.clone());
        Ok(record)
    }

    /// 이름으로 기록된 자격 증명을 찾습니다.
    pub fn find(&self, name: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// 종류별 첫 자격 증명을 반환합니다.
    pub fn first_of(&self, kind: CredentialKind) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.kind == kind)
    }

    /// 기록된 자격 증명 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 장부가 비었는지 여부를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 기록된 모든 자격 증명을 허브에서 삭제합니다.
    ///
    /// 개별 삭제 실패는 경고 로그만 남기고 계속 진행합니다.
    /// 티어다운에서 쓰이므로 가능한 한 많이 정리하는 쪽을 택합니다.
    pub async fn delete_all<H: HubClient>(&mut self, hub: &H) -> Result<(), MigcheckError> {
        for record in self.records.drain(..) {
            if let Err(e) = hub.delete_credential(record.id).await {
                warn!(
                    name = %record.name,
                    error = %e,
                    "failed to delete credential during teardown"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migcheck_hub::MockHubClient;

    #[test]
    fn selection_none_has_no_name() {
        assert_eq!(CredentialSelection::None.name(), None);
        assert_eq!(
            CredentialSelection::named("sc-cred").name(),
            Some("sc-cred")
        );
    }

    #[tokio::test]
    async fn create_records_in_store() {
        let hub = MockHubClient::new();
        let mut store = CredentialStore::new();

        store
            .create(&hub, CredentialRequest::source_userpass("sc", "u", "p"))
            .await
            .unwrap();
        store
            .create(&hub, CredentialRequest::maven("mvn", "<settings/>"))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.find("sc").is_some());
        assert_eq!(
            store.first_of(CredentialKind::Maven).unwrap().name,
            "mvn"
        );
        assert_eq!(hub.credential_count(), 2);
    }

    #[tokio::test]
    async fn delete_all_empties_store_and_hub() {
        let hub = MockHubClient::new();
        let mut store = CredentialStore::new();
        store
            .create(&hub, CredentialRequest::source_key("ssh", "KEY"))
            .await
            .unwrap();

        store.delete_all(&hub).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(hub.credential_count(), 0);
    }

    #[tokio::test]
    async fn delete_all_tolerates_missing_records() {
        let hub = MockHubClient::new();
        let mut store = CredentialStore::new();
        let record = store
            .create(&hub, CredentialRequest::source_key("ssh", "KEY"))
            .await
            .unwrap();

        // 허브에서 먼저 지워진 경우에도 티어다운은 성공
        hub.delete_credential(record.id).await.unwrap();
        store.delete_all(&hub).await.unwrap();
        assert!(store.is_empty());
    }
}
