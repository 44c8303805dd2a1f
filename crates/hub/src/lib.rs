//! Migcheck 허브 클라이언트 크레이트
//!
//! 마이그레이션 평가 허브의 HTTP API를 [`HubClient`] trait 뒤로 추상화합니다.
//! 운영 코드는 [`HttpHubClient`]를, 테스트는 [`MockHubClient`]를 사용합니다.
//!
//! ```text
//! ┌──────────────────┐
//! │     Analysis     │ (migcheck-scenario)
//! └────────┬─────────┘
//!          │
//!          ▼
//!    ┌───────────┐
//!    │ HubClient │ (trait)
//!    └───────────┘
//!        │     │
//!        ▼     ▼
//!    ┌──────┐ ┌──────┐
//!    │ Http │ │ Mock │
//!    └───┬──┘ └──────┘
//!        │
//!        ▼
//!    Hub REST API
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod mock;

pub use client::{CredentialRequest, HubClient};
pub use error::HubApiError;
pub use http::HttpHubClient;
pub use mock::MockHubClient;
