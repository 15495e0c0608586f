//! Table-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

use super::types::TargetType;

/// Ordered mapping from column name to destination type for one table.
///
/// When an index column was injected it is always the first entry, and its
/// name is recorded so it can be told apart from a source column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: IndexMap<String, TargetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_column: Option<String>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn push(&mut self, name: impl Into<String>, target: TargetType) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(ExtractError::Config(format!(
                "duplicate column name '{}' in schema",
                name
            )));
        }
        self.columns.insert(name, target);
        Ok(())
    }

    /// Builder-style [`Schema::push`].
    pub fn with_column(mut self, name: impl Into<String>, target: TargetType) -> Result<Self> {
        self.push(name, target)?;
        Ok(self)
    }

    /// Prepend a synthetic integer index column.
    ///
    /// A schema accepts at most one index column.
    pub fn with_index(self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Some(existing) = &self.index_column {
            return Err(ExtractError::NameCollision(format!(
                "schema already has index column '{}'",
                existing
            )));
        }
        if self.columns.contains_key(&name) {
            return Err(ExtractError::NameCollision(format!(
                "index column '{}' collides with an existing column",
                name
            )));
        }

        let mut columns = IndexMap::with_capacity(self.columns.len() + 1);
        columns.insert(name.clone(), TargetType::Integer);
        columns.extend(self.columns);

        Ok(Self {
            columns,
            index_column: Some(name),
        })
    }

    /// Name of the injected index column, if any.
    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.index_column.is_some()
    }

    /// Get the number of columns, including an index column.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column type by name.
    pub fn get(&self, name: &str) -> Option<TargetType> {
        self.columns.get(name).copied()
    }

    /// Get a column by position.
    pub fn get_index(&self, position: usize) -> Option<(&str, TargetType)> {
        self.columns
            .get_index(position)
            .map(|(name, target)| (name.as_str(), *target))
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Iterate over `(name, type)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetType)> {
        self.columns.iter().map(|(name, target)| (name.as_str(), *target))
    }

    /// Iterate over the columns that carry source data, skipping the index.
    pub fn data_columns(&self) -> impl Iterator<Item = (&str, TargetType)> {
        self.iter().skip(usize::from(self.is_indexed()))
    }
}
