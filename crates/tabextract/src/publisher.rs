//! Publication of source tables into an extract.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::convert::{NoProgress, Progress, RowConverter, DEFAULT_PROGRESS_INTERVAL};
use crate::error::{ExtractError, Result};
use crate::extract::ExtractTable;
use crate::schema::Schema;
use crate::sink::{extract_path, ExtractSink, JsonExtractSink, TableHandle};

/// Configuration for publishing an extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory the extract file is written to.
    pub output_dir: PathBuf,
    /// Prepend a row counter column to every new table.
    pub add_index: bool,
    /// Log every cell written as null at debug level.
    pub diagnostic_logging: bool,
    /// Rows between progress log lines (0 = none).
    pub progress_interval: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
            add_index: false,
            diagnostic_logging: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ExtractConfig {
    /// Load a configuration from a JSON file. Missing keys keep defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ExtractError::Config(format!("invalid config '{}': {}", path.display(), e))
        })
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_index(mut self, add_index: bool) -> Self {
        self.add_index = add_index;
        self
    }

    pub fn with_diagnostic_logging(mut self, enabled: bool) -> Self {
        self.diagnostic_logging = enabled;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Outcome of publishing one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub name: String,
    /// Whether the table was created by this run.
    pub created: bool,
    pub rows_written: usize,
    /// Cells written as null because their value could not be converted.
    pub degraded_cells: usize,
    /// The schema rows were written under.
    pub schema: Schema,
}

/// Outcome of a publication.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub extract: String,
    pub tables: Vec<TableReport>,
}

impl PublishReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows_written).sum()
    }

    pub fn degraded_cells(&self) -> usize {
        self.tables.iter().map(|t| t.degraded_cells).sum()
    }
}

/// Publishes an ordered list of tables into one extract.
///
/// Tables are written one at a time, in the order they were added. A table
/// that already exists in the sink keeps its stored schema; the source must
/// line up with it or publication stops with a schema mismatch.
///
/// # Example
///
/// ```
/// use tabextract::{DataFrame, ExtractTable, MemorySink, Publisher, Value};
///
/// let frame = DataFrame::from_rows(
///     vec!["id".into(), "name".into()],
///     vec![
///         vec![Value::from(1), Value::from("a")],
///         vec![Value::from(2), Value::Null],
///     ],
/// )
/// .unwrap();
///
/// let publisher = Publisher::new("people").with_table(ExtractTable::new("people", frame));
/// let mut sink = MemorySink::new();
/// let report = publisher.publish(&mut sink).unwrap();
///
/// assert_eq!(report.total_rows(), 2);
/// assert!(sink.is_closed());
/// ```
#[derive(Debug, Clone)]
pub struct Publisher {
    name: String,
    config: ExtractConfig,
    tables: Vec<ExtractTable>,
}

impl Publisher {
    /// Create a publisher with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, ExtractConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: ExtractConfig) -> Self {
        Self {
            name: name.into(),
            config,
            tables: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn tables(&self) -> &[ExtractTable] {
        &self.tables
    }

    pub fn add_table(&mut self, table: ExtractTable) {
        self.tables.push(table);
    }

    pub fn with_table(mut self, table: ExtractTable) -> Self {
        self.add_table(table);
        self
    }

    /// Path of the extract file in the configured output directory.
    pub fn output_path(&self) -> PathBuf {
        extract_path(&self.config.output_dir, &self.name)
    }

    /// Check that there is something to publish.
    pub fn validate_state(&self) -> Result<()> {
        match self.tables.len() {
            0 => Err(ExtractError::Config(format!(
                "extract '{}' has no tables to publish",
                self.name
            ))),
            1 => {
                tracing::info!(extract = %self.name, "publishing single-table extract");
                Ok(())
            }
            n => {
                tracing::info!(extract = %self.name, tables = n, "publishing multi-table extract");
                Ok(())
            }
        }
    }

    /// Publish every table into a sink, then close it.
    pub fn publish<S: ExtractSink>(&self, sink: &mut S) -> Result<PublishReport> {
        self.publish_with_progress(sink, &mut NoProgress)
    }

    /// [`Publisher::publish`] with a progress observer.
    pub fn publish_with_progress<S: ExtractSink>(
        &self,
        sink: &mut S,
        progress: &mut dyn Progress,
    ) -> Result<PublishReport> {
        self.validate_state()?;

        let mut reports = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            reports.push(self.publish_table(sink, table, progress)?);
        }

        sink.close()?;
        tracing::info!(extract = %self.name, tables = reports.len(), "extract published");

        Ok(PublishReport {
            extract: self.name.clone(),
            tables: reports,
        })
    }

    /// Publish into the JSON extract at [`Publisher::output_path`].
    pub fn publish_to_file(&self, progress: &mut dyn Progress) -> Result<PublishReport> {
        let mut sink = JsonExtractSink::open(self.output_path())?;
        self.publish_with_progress(&mut sink, progress)
    }

    fn publish_table<S: ExtractSink>(
        &self,
        sink: &mut S,
        table: &ExtractTable,
        progress: &mut dyn Progress,
    ) -> Result<TableReport> {
        if table.frame().column_count() == 0 {
            return Err(ExtractError::Config(format!(
                "table '{}' has no columns",
                table.name()
            )));
        }

        let created = !sink.table_exists(table.name());
        let mut handle = if created {
            tracing::info!(
                table = table.name(),
                extract = %self.name,
                "table does not exist in extract, creating it"
            );
            let schema = table.schema(self.config.add_index)?;
            sink.create_table(table.name(), &schema)?
        } else {
            tracing::info!(
                table = table.name(),
                extract = %self.name,
                "appending to existing table"
            );
            sink.open_table(table.name())?
        };

        let schema = handle.schema().clone();
        check_alignment(table, &schema, self.config.add_index)?;

        let mut converter = RowConverter::new(&schema)
            .with_diagnostics(self.config.diagnostic_logging)
            .with_progress_interval(self.config.progress_interval);

        tracing::info!(table = table.name(), rows = table.frame().row_count(), "populating table");
        let rows_written = converter.populate(table.name(), table.frame(), &mut handle, progress)?;
        handle.close()?;

        let degraded_cells = converter.degraded_cells();
        tracing::info!(table = table.name(), rows_written, degraded_cells, "table populated");

        Ok(TableReport {
            name: table.name().to_string(),
            created,
            rows_written,
            degraded_cells,
            schema,
        })
    }
}

/// Check that a destination schema can receive the rows of a table.
///
/// Widths, column names in order, and index presence must all agree.
pub fn check_alignment(table: &ExtractTable, schema: &Schema, add_index: bool) -> Result<()> {
    let mismatch = |message: String| ExtractError::SchemaMismatch {
        table: table.name().to_string(),
        message,
    };

    if schema.is_indexed() != add_index {
        return Err(mismatch(if add_index {
            "index column requested but the stored schema has none".to_string()
        } else {
            format!(
                "stored schema has index column '{}' but none was requested",
                schema.index_column().unwrap_or_default()
            )
        }));
    }

    let frame = table.frame();
    let expected = frame.column_count() + usize::from(add_index);
    if schema.len() != expected {
        return Err(mismatch(format!(
            "stored schema has {} columns, source needs {}",
            schema.len(),
            expected
        )));
    }

    for (position, ((stored, _), source)) in schema
        .data_columns()
        .zip(frame.column_names())
        .enumerate()
    {
        if stored != source {
            return Err(mismatch(format!(
                "column {} is '{}' in the stored schema but '{}' in the source",
                position, stored, source
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Field;
    use crate::input::{DataFrame, Value};
    use crate::schema::TargetType;
    use crate::sink::MemorySink;

    fn people() -> ExtractTable {
        let frame = DataFrame::from_rows(
            vec!["id".into(), "name".into(), "score".into()],
            vec![
                vec![Value::from(1), Value::from("a"), Value::from(1.5)],
                vec![Value::from(2), Value::Null, Value::from(2)],
            ],
        )
        .unwrap();
        ExtractTable::new("people", frame)
    }

    #[test]
    fn test_config_defaults() {
        let config: ExtractConfig = serde_json::from_str(r#"{"add_index": true}"#).unwrap();
        assert!(config.add_index);
        assert!(!config.diagnostic_logging);
        assert_eq!(config.progress_interval, 100_000);
        assert_eq!(config.output_dir, std::env::temp_dir());
    }

    #[test]
    fn test_output_path() {
        let publisher = Publisher::with_config(
            "survey",
            ExtractConfig::default().with_output_dir("/data/out"),
        );
        assert_eq!(
            publisher.output_path(),
            PathBuf::from("/data/out/survey.extract.json")
        );
    }

    #[test]
    fn test_no_tables_is_config_error() {
        let err = Publisher::new("empty").validate_state().unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
        assert!(Publisher::new("empty").publish(&mut MemorySink::new()).is_err());
    }

    #[test]
    fn test_publish_creates_table() {
        let mut sink = MemorySink::new();
        let report = Publisher::new("x").with_table(people()).publish(&mut sink).unwrap();

        assert!(report.tables[0].created);
        assert_eq!(report.tables[0].rows_written, 2);
        let stored = sink.table("people").unwrap();
        assert_eq!(
            stored.rows()[1].fields(),
            &[Field::Integer(2), Field::Null, Field::Double(2.0)]
        );
    }

    #[test]
    fn test_existing_schema_is_authoritative() {
        let stored = Schema::new()
            .with_column("id", TargetType::StringUnicode)
            .and_then(|s| s.with_column("name", TargetType::StringUnicode))
            .and_then(|s| s.with_column("score", TargetType::StringUnicode))
            .unwrap();
        let mut sink = MemorySink::new().with_table("people", stored.clone());

        let report = Publisher::new("x").with_table(people()).publish(&mut sink).unwrap();
        assert!(!report.tables[0].created);
        assert_eq!(report.tables[0].schema, stored);
        assert_eq!(
            sink.table("people").unwrap().rows()[0].get(0),
            Some(&Field::Text("1".into()))
        );
    }

    #[test]
    fn test_misaligned_schema_rejected() {
        let stored = Schema::new().with_column("other", TargetType::Integer).unwrap();
        let mut sink = MemorySink::new().with_table("people", stored);
        let err = Publisher::new("x").with_table(people()).publish(&mut sink).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch { .. }));
        assert_eq!(sink.table("people").unwrap().row_count(), 0);
    }

    #[test]
    fn test_table_without_columns_is_config_error() {
        let empty = || ExtractTable::new("t", DataFrame::default());

        let mut sink = MemorySink::new();
        let err = Publisher::new("x").with_table(empty()).publish(&mut sink).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));

        let mut sink = MemorySink::new().with_table("t", Schema::new());
        let err = Publisher::new("x").with_table(empty()).publish(&mut sink).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));

        let stored = Schema::new().with_column("id", TargetType::Integer).unwrap();
        let mut sink = MemorySink::new().with_table("t", stored);
        let err = Publisher::new("x").with_table(empty()).publish(&mut sink).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
        assert!(!sink.is_closed());
    }

    #[test]
    fn test_index_presence_must_match() {
        let table = people();
        let plain = table.schema(false).unwrap();
        let indexed = table.schema(true).unwrap();

        assert!(check_alignment(&table, &plain, false).is_ok());
        assert!(check_alignment(&table, &indexed, true).is_ok());
        assert!(check_alignment(&table, &plain, true).is_err());
        assert!(check_alignment(&table, &indexed, false).is_err());
    }

    #[test]
    fn test_renamed_column_rejected() {
        let table = people();
        let stored = Schema::new()
            .with_column("id", TargetType::Integer)
            .and_then(|s| s.with_column("label", TargetType::StringUnicode))
            .and_then(|s| s.with_column("score", TargetType::Double))
            .unwrap();
        let err = check_alignment(&table, &stored, false).unwrap_err();
        assert!(err.to_string().contains("label"));
    }
}
