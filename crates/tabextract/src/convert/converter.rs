//! Row-by-row conversion of a source frame into destination rows.

use crate::error::{ExtractError, Result};
use crate::input::{DataFrame, Value};
use crate::schema::{Schema, TargetType};
use crate::sink::TableHandle;

use super::functions::{conversion_for, ConversionFn};
use super::row::Row;

/// Rows between progress log lines when none is configured.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// Receives progress while a table is populated.
pub trait Progress {
    /// Called once before the first row.
    fn start(&mut self, _table: &str, _total: usize) {}

    /// Called after every inserted row with the number written so far.
    fn advance(&mut self, written: usize);

    /// Called once after the last row.
    fn finish(&mut self) {}
}

/// Progress sink that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&mut self, _written: usize) {}
}

/// Converts source rows into destination rows for one schema.
///
/// The conversion function for each data column is fixed when the converter
/// is built. A missing value, or a value its function rejects, is written as
/// null; the row is still emitted. With an index column, the first field of
/// each row is a counter starting at zero.
pub struct RowConverter {
    functions: Vec<ConversionFn>,
    targets: Vec<TargetType>,
    names: Vec<String>,
    indexed: bool,
    counter: i64,
    degraded: usize,
    diagnostics: bool,
    progress_interval: usize,
}

impl RowConverter {
    /// Bind the conversion function of every data column in a schema.
    pub fn new(schema: &Schema) -> Self {
        let functions = schema
            .data_columns()
            .map(|(_, target)| conversion_for(target))
            .collect();
        Self::build(schema, functions)
    }

    /// Use caller-supplied conversion functions, one per data column.
    pub fn with_functions(schema: &Schema, functions: Vec<ConversionFn>) -> Result<Self> {
        let expected = schema.data_columns().count();
        if functions.len() != expected {
            return Err(ExtractError::Config(format!(
                "{} conversion functions given for {} data columns",
                functions.len(),
                expected
            )));
        }
        Ok(Self::build(schema, functions))
    }

    fn build(schema: &Schema, functions: Vec<ConversionFn>) -> Self {
        let (names, targets) = schema
            .data_columns()
            .map(|(name, target)| (name.to_string(), target))
            .unzip();
        Self {
            functions,
            targets,
            names,
            indexed: schema.is_indexed(),
            counter: 0,
            degraded: 0,
            diagnostics: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Log each rejected cell at debug level instead of trace.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Rows between progress log lines; zero disables them.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Width of the rows this converter emits.
    pub fn width(&self) -> usize {
        self.functions.len() + usize::from(self.indexed)
    }

    /// Number of cells written as null because conversion failed.
    pub fn degraded_cells(&self) -> usize {
        self.degraded
    }

    /// Restart the index counter and the degraded-cell count.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.degraded = 0;
    }

    /// Convert one source row.
    ///
    /// Cells beyond the schema's data columns are ignored; columns the
    /// source row does not reach are written as null.
    pub fn convert<'a, I>(&mut self, cells: I) -> Row
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut row = Row::new(self.width());
        let offset = usize::from(self.indexed);
        if self.indexed {
            row.set_integer(0, self.counter);
            self.counter += 1;
        }

        let mut cells = cells.into_iter();
        for (i, function) in self.functions.iter().enumerate() {
            let position = i + offset;
            let value = match cells.next() {
                Some(value) if !value.is_missing() => value,
                _ => {
                    row.set_null(position);
                    continue;
                }
            };

            if let Err(err) = function(&mut row, position, value) {
                self.degraded += 1;
                if self.diagnostics {
                    tracing::debug!(
                        column = %self.names[i],
                        target = %self.targets[i],
                        %err,
                        "cell written as null"
                    );
                } else {
                    tracing::trace!(column = %self.names[i], %err, "cell written as null");
                }
                row.set_null(position);
            }
        }

        row
    }

    /// Convert every row of a frame, in order, into a table handle.
    ///
    /// Returns the number of rows inserted. Sink errors stop the pass.
    pub fn populate<T: TableHandle>(
        &mut self,
        name: &str,
        frame: &DataFrame,
        table: &mut T,
        progress: &mut dyn Progress,
    ) -> Result<usize> {
        let total = frame.row_count();
        progress.start(name, total);

        let mut written = 0;
        for source in frame.rows() {
            let row = self.convert(source.iter());
            table.insert(row)?;
            written += 1;
            progress.advance(written);

            if self.progress_interval > 0 && written % self.progress_interval == 0 {
                tracing::info!(table = name, written, total, "conversion progress");
            }
        }

        progress.finish();
        Ok(written)
    }
}
