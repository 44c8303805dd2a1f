//! 분석 레지스트리 — 레이블로 연결되는 생성/검증 시나리오 계약
//!
//! 생성 시나리오가 레이블을 붙여 [`insert`](AnalysisRegistry::insert)하고,
//! 이후의 검증 시나리오가 같은 레이블로 정확히 한 번
//! [`claim`](AnalysisRegistry::claim)합니다. 중복 삽입, 중복 claim,
//! 실행 종료 시점의 미소비 항목은 모두 시나리오 계약 위반입니다.
//!
//! 레지스트리는 전역 상태가 아니라 [`SuiteContext`](crate::suite::SuiteContext)를
//! 통해 각 시나리오에 명시적으로 주입됩니다.

use std::collections::HashMap;

use migcheck_core::error::ScenarioError;
use migcheck_hub::HubClient;

use crate::analysis::Analysis;

/// claim 여부를 추적하는 레지스트리 항목
enum Entry<H: HubClient> {
    /// 삽입되었고 아직 검증 시나리오가 가져가지 않음
    Pending(Box<Analysis<H>>),
    /// 검증 시나리오가 가져감
    Claimed,
}

/// 레이블 → 분석 인스턴스 레지스트리
///
/// 수명은 한 스위트 실행과 같습니다. 삽입 순서는 의미가 없습니다.
pub struct AnalysisRegistry<H: HubClient> {
    entries: HashMap<String, Entry<H>>,
}

impl<H: HubClient> AnalysisRegistry<H> {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 분석 인스턴스를 레이블로 등록합니다.
    ///
    /// # Errors
    /// 같은 레이블이 이미 등록되어 있으면 [`ScenarioError::Contract`].
    pub fn insert(&mut self, analysis: Analysis<H>) -> Result<(), ScenarioError> {
        let label = analysis.label().to_owned();
        if self.entries.contains_key(&label) {
            return Err(ScenarioError::Contract(format!(
                "label '{label}' registered twice"
            )));
        }
        self.entries.insert(label, Entry::Pending(Box::new(analysis)));
        Ok(())
    }

    /// 레이블로 분석 인스턴스를 가져갑니다 (정확히 한 번만 가능).
    ///
    /// # Errors
    /// - 등록된 적 없는 레이블: [`ScenarioError::Contract`]
    /// - 이미 claim된 레이블: [`ScenarioError::Contract`] (별도 메시지)
    pub fn claim(&mut self, label: &str) -> Result<Analysis<H>, ScenarioError> {
        let Some(entry) = self.entries.get_mut(label) else {
            return Err(ScenarioError::Contract(format!(
                "label '{label}' was never registered"
            )));
        };
        match std::mem::replace(entry, Entry::Claimed) {
            Entry::Pending(analysis) => Ok(*analysis),
            Entry::Claimed => Err(ScenarioError::Contract(format!(
                "label '{label}' already claimed by another scenario"
            ))),
        }
    }

    /// 아직 claim되지 않은 레이블을 정렬해 반환합니다.
    ///
    /// 스위트 종료 시 이 목록이 비어 있지 않으면 시나리오 계약 위반입니다.
    pub fn unclaimed(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|(label, entry)| match entry {
                Entry::Pending(_) => Some(label.as_str()),
                Entry::Claimed => None,
            })
            .collect();
        labels.sort_unstable();
        labels
    }

    /// 등록된 전체 레이블 수를 반환합니다 (claim 여부 무관).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 레지스트리가 비었는지 여부를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: HubClient> Default for AnalysisRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PollSettings;
    use migcheck_core::types::{
        AnalysisConfiguration, ApplicationDescriptor, RepositoryKind, SourceLocation,
    };
    use migcheck_hub::MockHubClient;
    use std::sync::Arc;

    fn sample_analysis(label: &str) -> Analysis<MockHubClient> {
        let descriptor = ApplicationDescriptor {
            name: format!("{label}-app"),
            location: SourceLocation::Repository {
                kind: RepositoryKind::Git,
                url: "https://example.com/repo.git".to_owned(),
                branch: None,
                root_path: None,
            },
            business_service: None,
            description: None,
        };
        let configuration = AnalysisConfiguration {
            preset: "source_analysis".to_owned(),
            targets: vec!["eap7".to_owned()],
            enable_tagging: false,
            detect_known_libraries: false,
            custom_rules: Vec::new(),
            expectations: Default::default(),
        };
        Analysis::new(
            Arc::new(MockHubClient::new()),
            label,
            descriptor,
            configuration,
            PollSettings::fast(),
        )
    }

    #[test]
    fn insert_then_claim_once() {
        let mut registry = AnalysisRegistry::new();
        registry.insert(sample_analysis("bookserverApp")).unwrap();

        let analysis = registry.claim("bookserverApp").unwrap();
        assert_eq!(analysis.label(), "bookserverApp");
    }

    #[test]
    fn duplicate_insert_is_contract_error() {
        let mut registry = AnalysisRegistry::new();
        registry.insert(sample_analysis("app")).unwrap();
        let err = registry.insert(sample_analysis("app")).unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn double_claim_is_contract_error() {
        let mut registry = AnalysisRegistry::new();
        registry.insert(sample_analysis("app")).unwrap();
        registry.claim("app").unwrap();

        let err = registry.claim("app").unwrap_err();
        assert!(err.to_string().contains("already claimed"));
    }

    #[test]
    fn claim_of_unknown_label_is_contract_error() {
        let mut registry: AnalysisRegistry<MockHubClient> = AnalysisRegistry::new();
        let err = registry.claim("ghost").unwrap_err();
        assert!(err.to_string().contains("never registered"));
    }

    #[test]
    fn unclaimed_lists_only_pending_labels() {
        let mut registry = AnalysisRegistry::new();
        registry.insert(sample_analysis("a")).unwrap();
        registry.insert(sample_analysis("b")).unwrap();
        registry.insert(sample_analysis("c")).unwrap();

        registry.claim("b").unwrap();

        assert_eq!(registry.unclaimed(), vec!["a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_registry_has_no_unclaimed() {
        let registry: AnalysisRegistry<MockHubClient> = AnalysisRegistry::new();
        assert!(registry.unclaimed().is_empty());
        assert!(registry.is_empty());
    }
}
