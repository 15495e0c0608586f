//! Per-type conversion functions from source values to row fields.
//!
//! Every function either writes exactly one field of the row or returns a
//! [`CellError`] without touching it. The caller decides what a failure
//! means; [`super::RowConverter`] turns it into a null.

use thiserror::Error;

use crate::input::{Value, ValueKind};
use crate::schema::TargetType;

use super::row::{DateParts, DateTimeParts, DurationParts, Row};

/// Why a single cell could not be written as its column's type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    /// The value's kind has no conversion to the target type.
    #[error("cannot write a {kind} value as {target}")]
    Unsupported { kind: ValueKind, target: TargetType },

    /// A float with a fractional part was written to an integer column.
    #[error("{0} is not an integral value")]
    NotIntegral(f64),

    /// The value does not fit the target representation.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: TargetType },

    /// Text that could not be parsed as the target type.
    #[error("cannot parse '{text}' as {target}")]
    Parse { text: String, target: TargetType },

    /// Failure raised by a caller-supplied conversion function.
    #[error("{0}")]
    Custom(String),
}

/// Writes one non-missing value into a row at a column position.
pub type ConversionFn = fn(&mut Row, usize, &Value) -> Result<(), CellError>;

/// The conversion function bound to a destination type.
pub fn conversion_for(target: TargetType) -> ConversionFn {
    match target {
        TargetType::StringUnicode => write_unicode_string,
        TargetType::StringFixed => write_char_string,
        TargetType::Boolean => write_boolean,
        TargetType::Double => write_double,
        TargetType::Integer => write_integer,
        TargetType::DateTime => write_datetime,
        TargetType::Date => write_date,
        TargetType::Duration => write_duration,
        TargetType::Spatial => write_spatial,
    }
}

fn unsupported(value: &Value, target: TargetType) -> CellError {
    CellError::Unsupported {
        kind: value.kind(),
        target,
    }
}

pub fn write_unicode_string(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    row.set_string(index, value.to_string());
    Ok(())
}

pub fn write_char_string(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    row.set_char_string(index, value.to_string());
    Ok(())
}

/// Booleans as-is; bytes, integers and floats by truthiness.
pub fn write_boolean(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let b = match value {
        Value::Boolean(b) => *b,
        Value::Bytes(bytes) => !bytes.is_empty(),
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        _ => return Err(unsupported(value, TargetType::Boolean)),
    };
    row.set_boolean(index, b);
    Ok(())
}

pub fn write_double(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let f = match value {
        Value::Float(f) => *f,
        Value::Integer(i) => *i as f64,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::Decimal(s) => s.trim().parse::<f64>().map_err(|_| CellError::Parse {
            text: s.clone(),
            target: TargetType::Double,
        })?,
        _ => return Err(unsupported(value, TargetType::Double)),
    };
    if !f.is_finite() {
        return Err(CellError::OutOfRange {
            value: f.to_string(),
            target: TargetType::Double,
        });
    }
    row.set_double(index, f);
    Ok(())
}

/// Integers, integral floats, booleans and integer text.
pub fn write_integer(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let i = match value {
        Value::Integer(i) => *i,
        Value::Boolean(b) => i64::from(*b),
        Value::Float(f) => float_to_integer(*f)?,
        Value::Text(s) => s.trim().parse::<i64>().map_err(|_| CellError::Parse {
            text: s.clone(),
            target: TargetType::Integer,
        })?,
        _ => return Err(unsupported(value, TargetType::Integer)),
    };
    row.set_integer(index, i);
    Ok(())
}

fn float_to_integer(f: f64) -> Result<i64, CellError> {
    if f.fract() != 0.0 {
        return Err(CellError::NotIntegral(f));
    }
    // 2^63 itself is not representable as i64
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) {
        return Err(CellError::OutOfRange {
            value: f.to_string(),
            target: TargetType::Integer,
        });
    }
    Ok(f as i64)
}

/// Datetimes as seven fields; dates at midnight.
pub fn write_datetime(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let parts = match value {
        Value::DateTime(dt) => DateTimeParts::from(dt),
        Value::Date(d) => DateTimeParts::from(&d.and_time(chrono::NaiveTime::MIN)),
        _ => return Err(unsupported(value, TargetType::DateTime)),
    };
    row.set_datetime(index, parts);
    Ok(())
}

pub fn write_date(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let parts = match value {
        Value::Date(d) => DateParts::from(d),
        Value::DateTime(dt) => DateParts::from(&dt.date()),
        _ => return Err(unsupported(value, TargetType::Date)),
    };
    row.set_date(index, parts);
    Ok(())
}

/// Durations, and the span of periods, as five fields.
pub fn write_duration(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    let delta = match value {
        Value::Duration(d) => d,
        Value::Period(p) => &p.span,
        _ => return Err(unsupported(value, TargetType::Duration)),
    };
    let parts = DurationParts::from_delta(delta).ok_or_else(|| CellError::OutOfRange {
        value: value.to_string(),
        target: TargetType::Duration,
    })?;
    row.set_duration(index, parts);
    Ok(())
}

/// Geometry text (e.g. WKT) as its UTF-8 bytes.
pub fn write_spatial(row: &mut Row, index: usize, value: &Value) -> Result<(), CellError> {
    match value {
        Value::Text(s) => {
            row.set_spatial(index, s.as_bytes().to_vec());
            Ok(())
        }
        _ => Err(unsupported(value, TargetType::Spatial)),
    }
}
