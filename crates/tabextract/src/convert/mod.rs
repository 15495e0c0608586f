//! Conversion of source values into destination rows.

mod converter;
mod functions;
mod row;

pub use converter::{NoProgress, Progress, RowConverter, DEFAULT_PROGRESS_INTERVAL};
pub use functions::{conversion_for, CellError, ConversionFn};
pub use row::{DateParts, DateTimeParts, DurationParts, Field, Row};
