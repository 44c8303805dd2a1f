#![no_main]

use libfuzzer_sys::fuzz_target;
use migcheck_scenario::report;

fuzz_target!(|data: &[u8]| {
    let _ = report::verify_csv_export("fuzz", data);
    let _ = report::verify_html_export("fuzz", data);
});
