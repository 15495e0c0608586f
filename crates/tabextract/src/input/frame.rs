//! In-memory tabular data: named columns of source values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

use super::value::{Value, ValueKind};

/// Storage hint for a column, used before any per-value inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Values of any kind, inspected one by one.
    #[default]
    Object,
    /// Enumerated values drawn from a small set of labels.
    Categorical,
    /// Natively stored timestamps.
    Datetime64,
    /// Natively stored time deltas.
    Timedelta64,
}

impl ColumnKind {
    /// Whether a non-missing value of the given kind may be stored in this column.
    fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            ColumnKind::Object | ColumnKind::Categorical => true,
            ColumnKind::Datetime64 => kind == ValueKind::DateTime,
            ColumnKind::Timedelta64 => kind == ValueKind::Duration,
        }
    }
}

/// A named, ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Value>,
}

impl Column {
    /// Create an object column.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Object,
            values,
        }
    }

    /// Create a categorical column.
    pub fn categorical(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
            values,
        }
    }

    /// Create a column with an explicit storage kind.
    ///
    /// Typed kinds only accept matching values (or missing values).
    pub fn with_kind(
        name: impl Into<String>,
        kind: ColumnKind,
        values: Vec<Value>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(bad) = values
            .iter()
            .find(|v| !v.is_missing() && !kind.accepts(v.kind()))
        {
            return Err(ExtractError::Config(format!(
                "column '{}' of kind {:?} cannot hold a {} value",
                name,
                kind,
                bad.kind()
            )));
        }
        Ok(Self { name, kind, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Iterate over the non-missing values.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}

/// Ordered collection of equal-length columns with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Build a frame from columns.
    ///
    /// Fails if two columns share a name or the columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ExtractError::Config(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        let row_count = columns.first().map_or(0, Column::len);
        if let Some(ragged) = columns.iter().find(|c| c.len() != row_count) {
            return Err(ExtractError::Config(format!(
                "column '{}' has {} values, expected {}",
                ragged.name(),
                ragged.len(),
                row_count
            )));
        }

        Ok(Self { columns, row_count })
    }

    /// Build an object-column frame from row-major data.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<Value>> = (0..width)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(ExtractError::Config(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }

        Self::new(
            headers
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Position of the column with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.values().get(row))
    }

    /// Iterate over rows in order. Each call starts a fresh pass.
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.row_count).map(move |index| RowView { frame: self, index })
    }
}

/// Borrowed view of one row of a [`DataFrame`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    frame: &'a DataFrame,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Cells of this row in column order.
    pub fn iter(self) -> impl Iterator<Item = &'a Value> {
        let frame: &'a DataFrame = self.frame;
        let index = self.index;
        frame.columns.iter().map(move |c| &c.values()[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id", vec![Value::from(1), Value::from(2)]),
            Column::new("name", vec![Value::from("a"), Value::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_frame_shape() {
        let frame = sample_frame();
        assert_eq!(frame.column_count(), 2);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.column_names(), vec!["id", "name"]);
        assert_eq!(frame.position("name"), Some(1));
        assert_eq!(frame.get(1, 1), Some(&Value::Null));
    }

    #[test]
    fn test_rows_preserve_order() {
        let frame = sample_frame();
        let rows: Vec<Vec<&Value>> = frame.rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows[0], vec![&Value::Integer(1), &Value::Text("a".into())]);
        assert_eq!(rows[1], vec![&Value::Integer(2), &Value::Null]);

        // A second pass sees the same rows.
        assert_eq!(frame.rows().count(), 2);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = DataFrame::new(vec![
            Column::new("a", vec![]),
            Column::new("a", vec![]),
        ]);
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = DataFrame::new(vec![
            Column::new("a", vec![Value::from(1)]),
            Column::new("b", vec![]),
        ]);
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_from_rows_checks_width() {
        let result = DataFrame::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Value::from(1)]],
        );
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_typed_kind_validation() {
        let ok = Column::with_kind("d", ColumnKind::Timedelta64, vec![Value::Null]);
        assert!(ok.is_ok());

        let bad = Column::with_kind("d", ColumnKind::Datetime64, vec![Value::from("x")]);
        assert!(matches!(bad, Err(ExtractError::Config(_))));
    }
}
