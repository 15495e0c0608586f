//! Destination extracts that receive converted rows.
//!
//! An [`ExtractSink`] holds named tables. Each table is reached through a
//! [`TableHandle`], which borrows the sink for as long as rows are inserted.
//!
//! Two sinks ship with the crate:
//!
//! - [`MemorySink`] keeps tables in memory, mostly for tests and previews
//! - [`JsonExtractSink`] persists tables to a `.extract.json` file

mod json;
mod memory;

use crate::convert::Row;
use crate::error::Result;
use crate::schema::Schema;

pub use json::{
    extract_path, ExtractDocument, JsonExtractSink, JsonTableHandle, StoredTable, EXTRACT_EXTENSION,
    EXTRACT_FORMAT_VERSION,
};
pub use memory::{MemorySink, MemoryTable, MemoryTableHandle};

/// One open table of an extract.
pub trait TableHandle {
    /// The table's stored schema, which is authoritative for its rows.
    fn schema(&self) -> &Schema;

    /// Append one row.
    fn insert(&mut self, row: Row) -> Result<()>;

    /// Finish writing to the table.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// A destination extract made of named tables.
pub trait ExtractSink {
    /// Handle type for a table of this sink.
    type Table<'a>: TableHandle
    where
        Self: 'a;

    /// Whether a table with this name already exists.
    fn table_exists(&self, name: &str) -> bool;

    /// Create a new, empty table.
    fn create_table<'a>(&'a mut self, name: &str, schema: &Schema) -> Result<Self::Table<'a>>;

    /// Open an existing table for appending.
    fn open_table<'a>(&'a mut self, name: &str) -> Result<Self::Table<'a>>;

    /// Flush and close the extract.
    fn close(&mut self) -> Result<()>;
}

/// Reject a row whose width does not match the table schema.
pub(crate) fn check_row_width(table: &str, schema: &Schema, row: &Row) -> Result<()> {
    if row.width() != schema.len() {
        return Err(crate::error::ExtractError::Sink(format!(
            "row of {} fields inserted into table '{}' of {} columns",
            row.width(),
            table,
            schema.len()
        )));
    }
    Ok(())
}
