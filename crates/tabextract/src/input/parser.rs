//! CSV/TSV reader with delimiter detection and column typing.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{ExtractError, Result};
use super::frame::{Column, DataFrame};
use super::source::SourceMetadata;
use super::value::Value;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Cell contents read as missing values (compared case-insensitively).
const NULL_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "nil"];

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d{1,9})?)?$").unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads delimited files into typed [`DataFrame`]s.
pub struct CsvParser {
    config: ParserConfig,
}

impl CsvParser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the frame and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataFrame, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let frame = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            frame.row_count(),
            frame.column_count(),
        );

        tracing::info!(
            file = %metadata.file,
            hash = %metadata.hash,
            rows = metadata.row_count,
            columns = metadata.column_count,
            "read source file"
        );

        Ok((frame, metadata))
    }

    /// Parse delimited bytes into a frame.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataFrame> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|s| s.trim().to_string()).collect(),
                None => return Err(ExtractError::Config("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for result in records {
            if let Some(max) = self.config.max_rows {
                if raw_rows.len() >= max {
                    break;
                }
            }
            let record = result?;
            raw_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let headers = if self.config.has_header {
            headers
        } else {
            let width = raw_rows.first().map_or(0, Vec::len);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(ExtractError::Config("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut raw_columns: Vec<Vec<String>> =
            vec![Vec::with_capacity(raw_rows.len()); expected_cols];
        for mut row in raw_rows {
            // Pad short rows, drop extra cells
            row.resize(expected_cols, String::new());
            for (col, cell) in raw_columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column::new(name, type_column(&raw)))
            .collect();

        DataFrame::new(columns)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw cell represents a missing value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Type a column of raw cells as a whole.
///
/// The narrowest representation every non-missing cell parses as wins:
/// integer, then float, boolean, date, datetime, and finally text.
fn type_column(raw: &[String]) -> Vec<Value> {
    let cells: Vec<Option<&str>> = raw
        .iter()
        .map(|s| if is_null_token(s) { None } else { Some(s.trim()) })
        .collect();

    if cells.iter().all(Option::is_none) {
        return vec![Value::Null; cells.len()];
    }

    let parsers: [fn(&str) -> Option<Value>; 5] = [
        |s| s.parse::<i64>().ok().map(Value::Integer),
        |s| s.parse::<f64>().ok().map(Value::Float),
        parse_boolean,
        |s| parse_date(s).map(Value::Date),
        |s| parse_datetime(s).map(Value::DateTime),
    ];

    for parse in parsers {
        if let Some(values) = parse_all(&cells, parse) {
            return values;
        }
    }

    raw.iter()
        .zip(&cells)
        .map(|(original, cell)| match cell {
            Some(_) => Value::Text(original.clone()),
            None => Value::Null,
        })
        .collect()
}

fn parse_all(cells: &[Option<&str>], parse: fn(&str) -> Option<Value>) -> Option<Vec<Value>> {
    cells
        .iter()
        .map(|cell| match cell {
            Some(s) => parse(s),
            None => Some(Value::Null),
        })
        .collect()
}

fn parse_boolean(s: &str) -> Option<Value> {
    if s.eq_ignore_ascii_case("true") {
        Some(Value::Boolean(true))
    } else if s.eq_ignore_ascii_case("false") {
        Some(Value::Boolean(false))
    } else {
        None
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an ISO datetime; bare dates are accepted at midnight.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Some(date) = parse_date(s) {
        return date.and_hms_opt(0, 0, 0);
    }
    if !DATETIME_PATTERN.is_match(s) {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ExtractError::Config("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_typed_columns() {
        let parser = CsvParser::new();
        let data =
            b"id,name,score,active,day\n1,Alice,1.5,true,2024-01-02\n2,NA,2,false,2024-01-03";
        let frame = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(frame.column_names(), vec!["id", "name", "score", "active", "day"]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.get(0, 0), Some(&Value::Integer(1)));
        assert_eq!(frame.get(1, 1), Some(&Value::Null));
        assert_eq!(frame.get(1, 2), Some(&Value::Float(2.0)));
        assert_eq!(frame.get(0, 3), Some(&Value::Boolean(true)));
        assert_eq!(
            frame.get(1, 4),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()))
        );
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let parser = CsvParser::new();
        let frame = parser.parse_bytes(b"code\n1\nA7\n", b',').unwrap();
        assert_eq!(frame.get(0, 0), Some(&Value::Text("1".into())));
        assert_eq!(frame.get(1, 0), Some(&Value::Text("A7".into())));
    }

    #[test]
    fn test_dates_and_datetimes_widen() {
        let parser = CsvParser::new();
        let frame = parser
            .parse_bytes(b"ts\n2024-01-02\n2024-01-02T10:30:00.5\n", b',')
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(10, 30, 0, 500)
            .unwrap();
        assert_eq!(frame.get(1, 0), Some(&Value::DateTime(expected)));
        assert!(matches!(frame.get(0, 0), Some(Value::DateTime(_))));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let parser = CsvParser::new();
        let frame = parser.parse_bytes(b"a,b\n1\n2,3,4\n", b',').unwrap();
        assert_eq!(frame.get(0, 1), Some(&Value::Null));
        assert_eq!(frame.get(1, 1), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_generated_headers() {
        let parser = CsvParser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let frame = parser.parse_bytes(b"1,x\n2,y\n", b',').unwrap();
        assert_eq!(frame.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn test_is_null_token() {
        assert!(is_null_token(""));
        assert!(is_null_token("NA"));
        assert!(is_null_token("n/a"));
        assert!(is_null_token("NULL"));
        assert!(is_null_token("NaN"));
        assert!(!is_null_token("value"));
        assert!(!is_null_token("0"));
    }
}
