#![no_main]

use libfuzzer_sys::fuzz_target;
use migcheck_fixture::FixtureSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = FixtureSet::parse(content, content);
    }
});
