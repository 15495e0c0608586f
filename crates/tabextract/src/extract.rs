//! Source tables prepared for publication.

use std::fmt;

use crate::error::{ExtractError, Result};
use crate::inference::TypeInferrer;
use crate::input::{DataFrame, SourceMetadata};
use crate::schema::{ColumnProfile, Overrides, Schema, SchemaBuilder, TargetType};

/// Identifies a column by ordinal position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for ColumnSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{}", i),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// A named source table plus its manual column types.
///
/// Overrides are keyed by column position. They are read when a schema is
/// built, so changing them afterwards leaves earlier schemas untouched.
///
/// # Example
///
/// ```
/// use tabextract::{DataFrame, ExtractTable, TargetType, Value};
///
/// let frame = DataFrame::from_rows(
///     vec!["id".into(), "location".into()],
///     vec![vec![Value::from(1), Value::from("POINT (0 0)")]],
/// )
/// .unwrap();
///
/// let mut table = ExtractTable::new("sites", frame);
/// table.set_spatial("location", true).unwrap();
///
/// let schema = table.schema(false).unwrap();
/// assert_eq!(schema.get("location"), Some(TargetType::Spatial));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractTable {
    name: String,
    frame: DataFrame,
    overrides: Overrides,
    source: Option<SourceMetadata>,
}

impl ExtractTable {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
            overrides: Overrides::new(),
            source: None,
        }
    }

    /// Create a table named `table_<rows>x<cols>`.
    pub fn from_frame(frame: DataFrame) -> Self {
        let name = format!("table_{}x{}", frame.row_count(), frame.column_count());
        Self::new(name, frame)
    }

    /// Record where the frame was read from.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Resolve a selector to a column position.
    pub fn resolve(&self, selector: &ColumnSelector) -> Result<usize> {
        match selector {
            ColumnSelector::Index(i) if *i < self.frame.column_count() => Ok(*i),
            ColumnSelector::Index(i) => Err(ExtractError::Lookup(format!(
                "column {} out of range for table '{}' with {} columns",
                i,
                self.name,
                self.frame.column_count()
            ))),
            ColumnSelector::Name(name) => self.frame.position(name).ok_or_else(|| {
                ExtractError::Lookup(format!(
                    "no column named '{}' in table '{}'",
                    name, self.name
                ))
            }),
        }
    }

    /// Set or clear the manual type of a column.
    ///
    /// `None` removes the override, so the next schema build infers the
    /// column again.
    pub fn set_type(
        &mut self,
        selector: impl Into<ColumnSelector>,
        target: Option<TargetType>,
    ) -> Result<()> {
        let selector = selector.into();
        let position = self.resolve(&selector)?;
        match target {
            Some(target) => {
                tracing::debug!(table = %self.name, column = %selector, %target, "set column type");
                self.overrides.insert(position, target);
            }
            None => {
                tracing::debug!(table = %self.name, column = %selector, "cleared column type");
                self.overrides.remove(&position);
            }
        }
        Ok(())
    }

    /// Mark a column as spatial, or clear the mark.
    ///
    /// Clearing removes any override on the column, spatial or not.
    pub fn set_spatial(
        &mut self,
        selector: impl Into<ColumnSelector>,
        indicator: bool,
    ) -> Result<()> {
        self.set_type(selector, indicator.then_some(TargetType::Spatial))
    }

    /// The manual type of a column, if one is set.
    pub fn column_type(&self, selector: impl Into<ColumnSelector>) -> Result<Option<TargetType>> {
        let position = self.resolve(&selector.into())?;
        Ok(self.overrides.get(&position).copied())
    }

    /// Build the schema from the current overrides.
    pub fn schema(&self, add_index: bool) -> Result<Schema> {
        SchemaBuilder::new(&self.frame)
            .overrides(&self.overrides)
            .add_index(add_index)
            .build()
    }

    /// Inference report for every column.
    pub fn profile(&self) -> Vec<ColumnProfile> {
        let inferrer = TypeInferrer::new();
        self.frame
            .columns()
            .iter()
            .enumerate()
            .map(|(position, column)| {
                inferrer.profile(column, position, self.overrides.get(&position).copied())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Column, Value};

    fn table() -> ExtractTable {
        let frame = DataFrame::new(vec![
            Column::new("id", vec![Value::from(1), Value::from(2)]),
            Column::new("location", vec![Value::from("POINT (1 2)"), Value::Null]),
        ])
        .unwrap();
        ExtractTable::new("t", frame)
    }

    #[test]
    fn test_default_name() {
        let frame = DataFrame::new(vec![Column::new("a", vec![Value::Null; 4])]).unwrap();
        assert_eq!(ExtractTable::from_frame(frame).name(), "table_4x1");
    }

    #[test]
    fn test_resolve() {
        let table = table();
        assert_eq!(table.resolve(&"location".into()).unwrap(), 1);
        assert_eq!(table.resolve(&0.into()).unwrap(), 0);
        assert!(matches!(table.resolve(&2.into()), Err(ExtractError::Lookup(_))));
        assert!(matches!(
            table.resolve(&"missing".into()),
            Err(ExtractError::Lookup(_))
        ));
    }

    #[test]
    fn test_set_spatial_by_name_and_position() {
        let mut table = table();
        table.set_spatial("location", true).unwrap();
        assert_eq!(table.column_type(1).unwrap(), Some(TargetType::Spatial));

        table.set_spatial(1, false).unwrap();
        assert_eq!(table.column_type("location").unwrap(), None);
        assert_eq!(
            table.schema(false).unwrap().get("location"),
            Some(TargetType::StringUnicode)
        );
    }

    #[test]
    fn test_set_spatial_unknown_column() {
        let mut table = table();
        assert!(matches!(
            table.set_spatial("nope", true),
            Err(ExtractError::Lookup(_))
        ));
        assert!(table.overrides().is_empty());
    }

    #[test]
    fn test_schema_is_a_snapshot() {
        let mut table = table();
        table.set_type("id", Some(TargetType::Double)).unwrap();
        let before = table.schema(false).unwrap();

        table.set_type("id", None).unwrap();
        assert_eq!(before.get("id"), Some(TargetType::Double));
        assert_eq!(table.schema(false).unwrap().get("id"), Some(TargetType::Integer));
    }

    #[test]
    fn test_profile_marks_overrides() {
        let mut table = table();
        table.set_spatial("location", true).unwrap();
        let profile = table.profile();
        assert!(!profile[0].overridden);
        assert!(profile[1].overridden);
        assert_eq!(profile[1].target, TargetType::Spatial);
    }
}
