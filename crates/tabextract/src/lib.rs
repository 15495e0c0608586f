//! tabextract: typed columnar extracts from tabular data.
//!
//! tabextract takes in-memory tables (or CSV/TSV files), infers a semantic
//! category for every column, maps it to a destination column type and
//! streams the rows into an extract made of named, typed tables.
//!
//! # Core Principles
//!
//! - **Lossless structure**: row count and order always match the source
//! - **Lossy cells**: a value that cannot be converted becomes null
//! - **Stored schemas win**: appending to an existing table uses its schema
//!
//! # Example
//!
//! ```no_run
//! use tabextract::{CsvParser, ExtractConfig, ExtractTable, NoProgress, Publisher};
//!
//! let (frame, source) = CsvParser::new().parse_file("sites.csv").unwrap();
//! let mut table = ExtractTable::new("sites", frame).with_source(source);
//! table.set_spatial("location", true).unwrap();
//!
//! let config = ExtractConfig::default().with_output_dir("out");
//! let publisher = Publisher::with_config("sites", config).with_table(table);
//! let report = publisher.publish_to_file(&mut NoProgress).unwrap();
//!
//! println!("Rows written: {}", report.total_rows());
//! ```

pub mod convert;
pub mod error;
pub mod inference;
pub mod input;
pub mod schema;
pub mod sink;

mod extract;
mod publisher;

pub use convert::{CellError, Field, NoProgress, Progress, Row, RowConverter};
pub use error::{ExtractError, Result};
pub use extract::{ColumnSelector, ExtractTable};
pub use input::{Column, ColumnKind, CsvParser, DataFrame, SourceMetadata, Value};
pub use publisher::{check_alignment, ExtractConfig, PublishReport, Publisher, TableReport};
pub use schema::{ColumnProfile, Schema, SchemaBuilder, SemanticCategory, TargetType};
pub use sink::{ExtractSink, JsonExtractSink, MemorySink, TableHandle};
