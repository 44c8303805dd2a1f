//! 리포트 검증 — 리포트 내용과 픽스처 기대값의 비교
//!
//! 각 검증은 독립적으로 실패하며, 무엇이 얼마나 다른지 서술하는
//! [`ScenarioError::Assertion`]을 반환합니다. 내려받은 CSV/HTML 내보내기의
//! 형식 점검도 여기서 담당합니다.

use migcheck_core::error::ScenarioError;
use migcheck_core::types::{AnalysisReport, IncidentCategory};

fn assertion(label: &str, reason: String) -> ScenarioError {
    ScenarioError::Assertion {
        label: label.to_owned(),
        reason,
    }
}

/// 스토리 포인트를 검증합니다.
///
/// 기대값이 지정되면 정확히 일치해야 하고, 지정되지 않으면
/// 0보다 커야 합니다 (분석이 실제로 무언가를 산출했는지 확인).
pub fn validate_story_points(
    label: &str,
    report: &AnalysisReport,
    expected: Option<u64>,
) -> Result<(), ScenarioError> {
    match expected {
        Some(expected) if report.story_points != expected => Err(assertion(
            label,
            format!(
                "story points: expected {expected}, got {}",
                report.story_points
            ),
        )),
        None if report.story_points == 0 => Err(assertion(
            label,
            "story points: expected a non-zero figure, got 0".to_owned(),
        )),
        _ => Ok(()),
    }
}

/// 범주별 인시던트 수를 검증합니다.
///
/// 기대 목록의 각 범주가 리포트에 존재하고 수가 일치해야 합니다.
/// 기대 목록에 없는 범주는 검사하지 않습니다.
pub fn validate_incidents(
    label: &str,
    report: &AnalysisReport,
    expected: &[IncidentCategory],
) -> Result<(), ScenarioError> {
    for expectation in expected {
        match report.incidents_in(&expectation.category) {
            None => {
                return Err(assertion(
                    label,
                    format!("incidents: category '{}' missing from report", expectation.category),
                ));
            }
            Some(actual) if actual != expectation.incidents => {
                return Err(assertion(
                    label,
                    format!(
                        "incidents in '{}': expected {}, got {actual}",
                        expectation.category, expectation.incidents
                    ),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// 트랜잭션 리포트를 검증합니다.
///
/// 기대 수가 지정되면 정확히 일치해야 하고, 지정되지 않으면
/// 트랜잭션이 하나 이상 있어야 합니다.
pub fn validate_transactions(
    label: &str,
    report: &AnalysisReport,
    expected: Option<u64>,
) -> Result<(), ScenarioError> {
    let actual = report.transactions.len() as u64;
    match expected {
        Some(expected) if actual != expected => Err(assertion(
            label,
            format!("transactions: expected {expected}, got {actual}"),
        )),
        None if actual == 0 => Err(assertion(
            label,
            "transactions: expected a non-empty transaction report".to_owned(),
        )),
        _ => Ok(()),
    }
}

/// 지정한 태그가 전부 리포트에 존재하는지 검증합니다.
pub fn validate_tags_exist(
    label: &str,
    report: &AnalysisReport,
    tags: &[String],
) -> Result<(), ScenarioError> {
    let missing: Vec<&str> = tags
        .iter()
        .filter(|t| !report.tags.iter().any(|have| have == *t))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(assertion(
            label,
            format!("tags missing from report: {}", missing.join(", ")),
        ))
    }
}

/// 리포트에 태그가 하나도 없는지 검증합니다.
pub fn validate_tags_absent(label: &str, report: &AnalysisReport) -> Result<(), ScenarioError> {
    if report.tags.is_empty() {
        Ok(())
    } else {
        Err(assertion(
            label,
            format!("expected no tags, found: {}", report.tags.join(", ")),
        ))
    }
}

/// 내려받은 CSV 내보내기의 형식을 점검합니다.
///
/// UTF-8 헤더 행과 하나 이상의 데이터 행을 요구합니다.
pub fn verify_csv_export(label: &str, bytes: &[u8]) -> Result<(), ScenarioError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| assertion(label, "csv export is not valid UTF-8".to_owned()))?;

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Err(assertion(label, "csv export is empty".to_owned()));
    };
    if !header.contains(',') {
        return Err(assertion(
            label,
            "csv export header has no columns".to_owned(),
        ));
    }

    let columns = header.split(',').count();
    let mut rows = 0usize;
    for line in lines {
        if line.split(',').count() != columns {
            return Err(assertion(
                label,
                format!("csv export row has wrong column count: '{line}'"),
            ));
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(assertion(label, "csv export has no data rows".to_owned()));
    }
    Ok(())
}

/// 내려받은 HTML 내보내기의 형식을 점검합니다.
pub fn verify_html_export(label: &str, bytes: &[u8]) -> Result<(), ScenarioError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| assertion(label, "html export is not valid UTF-8".to_owned()))?;
    if text.to_ascii_lowercase().contains("<html") {
        Ok(())
    } else {
        Err(assertion(
            label,
            "html export does not look like an HTML document".to_owned(),
        ))
    }
}
