//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 허브 API와 시나리오 계층이 공유하는 데이터 구조를 정의합니다.
//! 애플리케이션 서술자와 분석 설정은 생성 후 불변이며,
//! 런타임 상태는 시나리오 계층의 Analysis 집합체가 별도로 관리합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

// --- 허브 설정 키 상수 ---

/// CSV 리포트 다운로드 허용 토글
pub const SETTING_CSV_DOWNLOAD: &str = "download.csv.enabled";
/// HTML 리포트 다운로드 허용 토글
pub const SETTING_HTML_DOWNLOAD: &str = "download.html.enabled";

/// 분석 실행 상태
///
/// 허브가 보고하는 분석 작업의 상태입니다.
/// `Completed`와 `Failed`는 종료 상태이며 이후 전이가 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    /// 대기열에 등록됨
    Queued,
    /// 실행 중
    InProgress,
    /// 정상 완료
    Completed,
    /// 실패
    Failed,
}

impl AnalysisStatus {
    /// 종료 상태 여부를 반환합니다.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// 느슨한 문자열 매칭으로 상태를 파싱합니다.
    ///
    /// 허브 UI 표기("In Progress")와 API 표기("in-progress")를 모두 허용합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "not started" => Some(Self::Queued),
            "in progress" | "in-progress" | "inprogress" | "running" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "Queued"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// 리포트 내보내기 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// CSV 내보내기
    Csv,
    /// HTML 아카이브 내보내기
    Html,
}

impl ReportFormat {
    /// 해당 형식의 다운로드 허용 설정 키를 반환합니다.
    pub fn setting_key(self) -> &'static str {
        match self {
            Self::Csv => SETTING_CSV_DOWNLOAD,
            Self::Html => SETTING_HTML_DOWNLOAD,
        }
    }

    /// 느슨한 문자열 매칭으로 형식을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Html => write!(f, "HTML"),
        }
    }
}

/// 자격 증명 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialKind {
    /// 소스 저장소 사용자명/비밀번호
    SourceUserPass,
    /// 소스 저장소 개인 키
    SourceKey,
    /// Maven 저장소 자격 증명 (settings.xml)
    Maven,
}

impl CredentialKind {
    /// 느슨한 문자열 매칭으로 종류를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source-userpass" | "source_userpass" => Some(Self::SourceUserPass),
            "source-key" | "source_key" => Some(Self::SourceKey),
            "maven" => Some(Self::Maven),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUserPass => write!(f, "source-userpass"),
            Self::SourceKey => write!(f, "source-key"),
            Self::Maven => write!(f, "maven"),
        }
    }
}

/// 소스 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepositoryKind {
    /// Git 저장소
    Git,
    /// Subversion 저장소
    Subversion,
}

impl RepositoryKind {
    /// 느슨한 문자열 매칭으로 종류를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Some(Self::Git),
            "svn" | "subversion" => Some(Self::Subversion),
            _ => None,
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git => write!(f, "git"),
            Self::Subversion => write!(f, "svn"),
        }
    }
}

/// 분석 대상 소스 위치
///
/// 저장소 URL 기반 소스 분석과 Maven 좌표 기반 바이너리 분석을 구분합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceLocation {
    /// 소스 저장소 (git/svn)
    Repository {
        /// 저장소 종류
        kind: RepositoryKind,
        /// 저장소 URL (http/ssh)
        url: String,
        /// 브랜치 (미지정 시 기본 브랜치)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        /// 저장소 내 루트 경로
        #[serde(default, skip_serializing_if = "Option::is_none")]
        root_path: Option<String>,
    },
    /// Maven 바이너리 좌표
    Binary {
        /// 그룹 ID
        group: String,
        /// 아티팩트 ID
        artifact: String,
        /// 버전
        version: String,
        /// 패키징 (jar, war, ear)
        packaging: String,
    },
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository { kind, url, .. } => write!(f, "{kind}:{url}"),
            Self::Binary {
                group,
                artifact,
                version,
                ..
            } => write!(f, "{group}:{artifact}:{version}"),
        }
    }
}

/// 애플리케이션 서술자
///
/// 허브에 등록할 애플리케이션의 정의입니다. 생성 후 불변이며
/// 정확히 하나의 분석 인스턴스가 소유합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    /// 애플리케이션 이름 (스위트 실행 내에서 유일)
    pub name: String,
    /// 소스 위치
    pub location: SourceLocation,
    /// 소속 비즈니스 서비스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_service: Option<String>,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 분석 설정
///
/// 픽스처에 정의된 프리셋 하나를 선택해 구성하며, 선택 후 불변입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfiguration {
    /// 프리셋 키 (픽스처 식별용)
    pub preset: String,
    /// 대상 기술 스택 (예: "eap7", "cloud-readiness")
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

/// 리포트 기대값
///
/// 픽스처에서 파생되며, 검증 시나리오가 리포트 내용과 비교합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportExpectations {
    /// 기대 스토리 포인트 (None이면 "0보다 큼"만 검증)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u64>,
    /// 범주별 기대 인시던트 수
    #[serde(default)]
    pub incidents: Vec<IncidentCategory>,
    /// 기대 트랜잭션 수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<u64>,
    /// 기대 기술 태그
    #[serde(default)]
    pub tech_tags: Vec<String>,
}

/// 범주별 인시던트 수
///
/// 리포트 내용과 기대값 양쪽에서 같은 형태로 사용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentCategory {
    /// 범주 이름 (mandatory, optional, potential, information)
    pub category: String,
    /// 인시던트 수
    pub incidents: u64,
}

/// 트랜잭션 리포트 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// 트랜잭션 이름 (진입점 클래스/메서드)
    pub name: String,
    /// 해당 트랜잭션의 스토리 포인트
    pub story_points: u64,
}

/// 분석 리포트 내용
///
/// 허브가 생성한 리포트에서 검증에 필요한 부분만 담습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 총 스토리 포인트
    pub story_points: u64,
    /// 범주별 인시던트
    #[serde(default)]
    pub incidents: Vec<IncidentCategory>,
    /// 트랜잭션 리포트
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// 부여된 태그
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AnalysisReport {
    /// 범주 이름으로 인시던트 수를 조회합니다.
    pub fn incidents_in(&self, category: &str) -> Option<u64> {
        self.incidents
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.incidents)
    }
}

/// 허브에 등록된 애플리케이션
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// 허브가 부여한 ID
    pub id: u64,
    /// 애플리케이션 이름
    pub name: String,
}

/// 허브에 등록된 자격 증명
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// 허브가 부여한 ID
    pub id: u64,
    /// 자격 증명 이름 (스위트 실행 내에서 유일)
    pub name: String,
    /// 종류
    pub kind: CredentialKind,
}

/// 허브에 등록된 분석 실행
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRef {
    /// 허브가 부여한 분석 ID
    pub id: u64,
    /// 대상 애플리케이션 ID
    pub application_id: u64,
    /// 현재 상태
    pub status: AnalysisStatus,
}

/// 허브 프록시 설정 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRecord {
    /// 허브가 부여한 ID
    pub id: u64,
    /// 프록시 종류 (http, https)
    pub kind: String,
    /// 활성화 여부
    pub enabled: bool,
}
