#![no_main]

use coldpage::compare::compare_reader;
use coldpage::filter::BenchmarkFilter;
use coldpage::page_log::BaselineTags;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 surfaces as an io::Error, never a panic
    let baseline = BaselineTags::from_reader(data).unwrap_or_default();
    if let Ok(cmp) = compare_reader(&baseline, data) {
        assert!(cmp.result.cold_accesses <= cmp.result.total_accesses);
    }

    if let Ok(expr) = std::str::from_utf8(data) {
        let _ = BenchmarkFilter::from_expr(expr);
    }
});
