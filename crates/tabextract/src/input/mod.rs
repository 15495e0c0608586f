//! Source data: cell values, columns, frames and file reading.

mod frame;
mod parser;
mod source;
mod value;

pub use frame::{Column, ColumnKind, DataFrame, RowView};
pub use parser::{is_null_token, CsvParser, ParserConfig};
pub use source::SourceMetadata;
pub use value::{Period, Value, ValueKind};
