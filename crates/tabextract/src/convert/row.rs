//! Destination rows and their typed fields.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Fields of a destination datetime, written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub microsecond: u32,
}

impl From<&NaiveDateTime> for DateTimeParts {
    fn from(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            // chrono encodes a leap second as nanosecond >= 1_000_000_000
            second: dt.second(),
            microsecond: (dt.nanosecond() % 1_000_000_000) / 1_000,
        }
    }
}

/// Fields of a destination date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<&NaiveDate> for DateParts {
    fn from(d: &NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
            day: d.day(),
        }
    }
}

/// Fields of a destination duration.
///
/// `days` carries the sign; the sub-day fields are always non-negative, so
/// minus one second is `-1 days 23:59:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationParts {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub microseconds: u32,
}

impl DurationParts {
    /// Split a time delta, or `None` if it does not fit in microseconds.
    pub fn from_delta(delta: &TimeDelta) -> Option<Self> {
        let total = delta.num_microseconds()?;
        let days = total.div_euclid(MICROS_PER_DAY);
        let rem = total.rem_euclid(MICROS_PER_DAY);

        let seconds_of_day = rem / MICROS_PER_SECOND;
        Some(Self {
            days,
            hours: (seconds_of_day / 3600) as u32,
            minutes: (seconds_of_day % 3600 / 60) as u32,
            seconds: (seconds_of_day % 60) as u32,
            microseconds: (rem % MICROS_PER_SECOND) as u32,
        })
    }
}

/// One field of a destination row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Field {
    /// Not written yet.
    Unset,
    Null,
    Text(String),
    CharString(String),
    Boolean(bool),
    Double(f64),
    Integer(i64),
    DateTime(DateTimeParts),
    Date(DateParts),
    Duration(DurationParts),
    Spatial(Vec<u8>),
}

/// A write-only destination row of fixed width.
///
/// Rows are built once per source row, handed to the sink, and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    /// Create a row with every field unset.
    pub fn new(width: usize) -> Self {
        Self {
            fields: vec![Field::Unset; width],
        }
    }

    /// Number of fields.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn set_null(&mut self, index: usize) {
        self.fields[index] = Field::Null;
    }

    pub fn set_string(&mut self, index: usize, value: String) {
        self.fields[index] = Field::Text(value);
    }

    pub fn set_char_string(&mut self, index: usize, value: String) {
        self.fields[index] = Field::CharString(value);
    }

    pub fn set_boolean(&mut self, index: usize, value: bool) {
        self.fields[index] = Field::Boolean(value);
    }

    pub fn set_double(&mut self, index: usize, value: f64) {
        self.fields[index] = Field::Double(value);
    }

    pub fn set_integer(&mut self, index: usize, value: i64) {
        self.fields[index] = Field::Integer(value);
    }

    pub fn set_datetime(&mut self, index: usize, value: DateTimeParts) {
        self.fields[index] = Field::DateTime(value);
    }

    pub fn set_date(&mut self, index: usize, value: DateParts) {
        self.fields[index] = Field::Date(value);
    }

    pub fn set_duration(&mut self, index: usize, value: DurationParts) {
        self.fields[index] = Field::Duration(value);
    }

    pub fn set_spatial(&mut self, index: usize, value: Vec<u8>) {
        self.fields[index] = Field::Spatial(value);
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// Number of fields that have been written (null included).
    pub fn set_count(&self) -> usize {
        self.fields.iter().filter(|f| **f != Field::Unset).count()
    }

    /// Whether every field has been written.
    pub fn is_complete(&self) -> bool {
        self.set_count() == self.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_is_unset() {
        let row = Row::new(3);
        assert_eq!(row.width(), 3);
        assert_eq!(row.set_count(), 0);
        assert!(!row.is_complete());
    }

    #[test]
    fn test_setters_fill_fields() {
        let mut row = Row::new(3);
        row.set_integer(0, 7);
        row.set_null(1);
        row.set_string(2, "x".into());
        assert!(row.is_complete());
        assert_eq!(
            row.into_fields(),
            vec![Field::Integer(7), Field::Null, Field::Text("x".into())]
        );
    }

    #[test]
    fn test_duration_parts_positive() {
        let delta = TimeDelta::days(2) + TimeDelta::seconds(3723) + TimeDelta::microseconds(42);
        let parts = DurationParts::from_delta(&delta).unwrap();
        assert_eq!(
            parts,
            DurationParts {
                days: 2,
                hours: 1,
                minutes: 2,
                seconds: 3,
                microseconds: 42
            }
        );
    }

    #[test]
    fn test_duration_parts_negative() {
        let parts = DurationParts::from_delta(&TimeDelta::seconds(-1)).unwrap();
        assert_eq!(parts.days, -1);
        assert_eq!((parts.hours, parts.minutes, parts.seconds), (23, 59, 59));
    }

    #[test]
    fn test_datetime_parts() {
        let dt = NaiveDate::from_ymd_opt(2021, 12, 31)
            .unwrap()
            .and_hms_micro_opt(23, 58, 7, 123_456)
            .unwrap();
        let parts = DateTimeParts::from(&dt);
        assert_eq!(
            (parts.year, parts.month, parts.day, parts.hour, parts.minute, parts.second),
            (2021, 12, 31, 23, 58, 7)
        );
        assert_eq!(parts.microsecond, 123_456);
    }
}
