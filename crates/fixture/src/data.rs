//! 테스트 데이터 생성 — 실행마다 유일한 이름과 비밀값
//!
//! 스위트는 같은 허브를 반복해서 상대하므로, 애플리케이션/자격 증명 이름이
//! 이전 실행의 잔재와 충돌하지 않아야 합니다. 별도 난수 의존성 없이
//! UUID v4에서 접미사를 잘라 씁니다.

use uuid::Uuid;

/// 8자리 유일 접미사를 생성합니다.
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_owned()
}

/// `base`에 유일 접미사를 붙인 이름을 생성합니다.
///
/// 예: `unique_name("bookserverApp")` → `"bookserverApp-3fa85f64"`
pub fn unique_name(base: &str) -> String {
    format!("{base}-{}", unique_suffix())
}

/// 자격 증명용 비밀값을 생성합니다.
///
/// 실제 비밀이 아니라 허브에 등록할 임의 값입니다.
pub fn random_secret() -> String {
    Uuid::new_v4().simple().to_string()
}
