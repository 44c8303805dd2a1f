#![no_main]

use libfuzzer_sys::fuzz_target;
use migcheck_core::types::{AnalysisStatus, CredentialKind, RepositoryKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = AnalysisStatus::from_str_loose(content);
        let _ = CredentialKind::from_str_loose(content);
        let _ = RepositoryKind::from_str_loose(content);
    }
});
