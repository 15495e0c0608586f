//! In-memory extract sink.

use indexmap::IndexMap;

use crate::convert::Row;
use crate::error::{ExtractError, Result};
use crate::schema::Schema;

use super::{check_row_width, ExtractSink, TableHandle};

/// A table held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    schema: Schema,
    rows: Vec<Row>,
}

impl MemoryTable {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Extract sink that keeps every table in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: IndexMap<String, MemoryTable>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing, empty table, as if left by an earlier run.
    pub fn with_table(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.tables.insert(
            name.into(),
            MemoryTable {
                schema,
                rows: Vec::new(),
            },
        );
        self
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    /// Table names in creation order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ExtractError::Sink("extract is closed".to_string()));
        }
        Ok(())
    }
}

/// Handle to a [`MemoryTable`] being written.
#[derive(Debug)]
pub struct MemoryTableHandle<'a> {
    name: String,
    table: &'a mut MemoryTable,
}

impl TableHandle for MemoryTableHandle<'_> {
    fn schema(&self) -> &Schema {
        &self.table.schema
    }

    fn insert(&mut self, row: Row) -> Result<()> {
        check_row_width(&self.name, &self.table.schema, &row)?;
        self.table.rows.push(row);
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

impl ExtractSink for MemorySink {
    type Table<'a> = MemoryTableHandle<'a>;

    fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    fn create_table<'a>(&'a mut self, name: &str, schema: &Schema) -> Result<Self::Table<'a>> {
        self.ensure_open()?;
        if self.tables.contains_key(name) {
            return Err(ExtractError::Sink(format!("table '{}' already exists", name)));
        }
        let table = self.tables.entry(name.to_string()).or_insert(MemoryTable {
            schema: schema.clone(),
            rows: Vec::new(),
        });
        Ok(MemoryTableHandle {
            name: name.to_string(),
            table,
        })
    }

    fn open_table<'a>(&'a mut self, name: &str) -> Result<Self::Table<'a>> {
        self.ensure_open()?;
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| ExtractError::Sink(format!("table '{}' does not exist", name)))?;
        Ok(MemoryTableHandle {
            name: name.to_string(),
            table,
        })
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TargetType;

    fn schema() -> Schema {
        Schema::new().with_column("a", TargetType::Integer).unwrap()
    }

    #[test]
    fn test_create_and_insert() {
        let mut sink = MemorySink::new();
        assert!(!sink.table_exists("t"));

        let mut table = sink.create_table("t", &schema()).unwrap();
        let mut row = Row::new(1);
        row.set_integer(0, 9);
        table.insert(row).unwrap();
        table.close().unwrap();

        assert!(sink.table_exists("t"));
        assert_eq!(sink.table("t").unwrap().row_count(), 1);
    }

    #[test]
    fn test_create_existing_fails() {
        let mut sink = MemorySink::new().with_table("t", schema());
        assert!(sink.create_table("t", &schema()).is_err());
    }

    #[test]
    fn test_open_missing_fails() {
        let mut sink = MemorySink::new();
        assert!(matches!(sink.open_table("t"), Err(ExtractError::Sink(_))));
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut sink = MemorySink::new();
        let mut table = sink.create_table("t", &schema()).unwrap();
        assert!(table.insert(Row::new(2)).is_err());
    }

    #[test]
    fn test_closed_sink_rejects_tables() {
        let mut sink = MemorySink::new();
        sink.close().unwrap();
        assert!(sink.is_closed());
        assert!(sink.create_table("t", &schema()).is_err());
    }

    #[test]
    fn test_close_twice_fails() {
        let mut sink = MemorySink::new();
        sink.close().unwrap();
        assert!(matches!(sink.close(), Err(ExtractError::Sink(_))));
    }
}
