//! Migcheck 시나리오 크레이트 — 분석 생명주기와 스위트 오케스트레이션
//!
//! 허브를 상대로 하는 검증 흐름의 전부를 담습니다.
//!
//! - [`Analysis`]: 애플리케이션 서술자 + 분석 설정 한 쌍의 생명주기 모델.
//!   생성 확인, 자격 증명 연결, 분석 시작, 상태 폴링, 리포트 검증.
//! - [`AnalysisRegistry`]: 레이블 → 분석 인스턴스 레지스트리.
//!   생성 시나리오가 넣고 검증 시나리오가 정확히 한 번 꺼냅니다.
//! - [`Suite`]: 셋업 → 시나리오 순차 실행 → 티어다운 → 레지스트리 감사.
//! - [`suites`]: 소스/바이너리 분석 스위트 정의.
//!
//! # 내부 아키텍처
//! ```text
//! FixtureSet ──> Analysis ──> HubClient ──> (외부 허브)
//!                  │
//!            AnalysisRegistry
//!                  │
//!       creation / verification scenarios ──> SuiteReport
//! ```

pub mod admin;
pub mod analysis;
pub mod credentials;
pub mod registry;
pub mod report;
pub mod suite;
pub mod suites;

pub use analysis::{Analysis, LifecycleState, PollSettings};
pub use credentials::{CredentialSelection, CredentialStore};
pub use registry::AnalysisRegistry;
pub use suite::{
    Scenario, ScenarioOutcome, ScenarioStatus, Suite, SuiteContext, SuiteReport, scenario,
};
