//! Fuzz target for publication of parsed tables.
//!
//! Whatever the parser accepts must publish into memory with the source
//! row count and without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabextract::{CsvParser, ExtractConfig, ExtractTable, MemorySink, Publisher};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(frame) = CsvParser::new().parse_bytes(data, b',') else {
        return;
    };
    let rows = frame.row_count();

    let mut sink = MemorySink::new();
    let report = Publisher::with_config("fuzz", ExtractConfig::default().with_index(true))
        .with_table(ExtractTable::from_frame(frame))
        .publish(&mut sink)
        .expect("publication into memory cannot fail");
    assert_eq!(report.total_rows(), rows);
});
