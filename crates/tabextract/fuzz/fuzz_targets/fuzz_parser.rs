//! Fuzz target for the delimited-file parser.
//!
//! This fuzzer tests that the CSV/TSV parser:
//! 1. Never panics on malformed input
//! 2. Handles every supported delimiter
//! 3. Always yields rectangular frames

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabextract::CsvParser;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = CsvParser::new();
    for delimiter in [b'\t', b',', b';', b'|'] {
        if let Ok(frame) = parser.parse_bytes(data, delimiter) {
            for column in frame.columns() {
                assert_eq!(column.len(), frame.row_count());
            }
        }
    }
});
