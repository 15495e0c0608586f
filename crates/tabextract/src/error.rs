//! Error types for the tabextract library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extract operations.
///
/// Every variant here is fatal for the table being converted. Per-cell
/// conversion failures use [`crate::convert::CellError`] instead and never
/// surface through this type.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input structure or publication state.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column selector did not match any column.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A semantic category or target type name outside the known set.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A synthetic column name could not be placed.
    #[error("Name collision: {0}")]
    NameCollision(String),

    /// The destination table's committed schema does not line up with the source.
    #[error("Schema mismatch for table '{table}': {message}")]
    SchemaMismatch { table: String, message: String },

    /// Failure reported by the destination sink.
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type alias for extract operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
