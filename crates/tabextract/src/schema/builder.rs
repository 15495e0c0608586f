//! Builds destination schemas from source frames.

use std::collections::BTreeMap;

use crate::error::{ExtractError, Result};
use crate::inference::{map_category, TypeInferrer};
use crate::input::DataFrame;

use super::table::Schema;
use super::types::TargetType;

/// Manual column types keyed by source column position.
pub type Overrides = BTreeMap<usize, TargetType>;

/// Base name of the synthetic row counter column.
const INDEX_COLUMN: &str = "index";

/// Produces the [`Schema`] for one table-conversion pass.
///
/// The result depends only on the frame, the overrides and the index flag,
/// so building twice from the same inputs yields the same schema.
pub struct SchemaBuilder<'a> {
    frame: &'a DataFrame,
    overrides: Option<&'a Overrides>,
    add_index: bool,
    inferrer: TypeInferrer,
}

impl<'a> SchemaBuilder<'a> {
    /// Create a builder for a frame, with no overrides and no index.
    pub fn new(frame: &'a DataFrame) -> Self {
        Self {
            frame,
            overrides: None,
            add_index: false,
            inferrer: TypeInferrer::new(),
        }
    }

    /// Use explicit column types in place of inference.
    pub fn overrides(mut self, overrides: &'a Overrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Prepend a synthetic integer index column.
    pub fn add_index(mut self, add_index: bool) -> Self {
        self.add_index = add_index;
        self
    }

    /// Build the schema.
    pub fn build(&self) -> Result<Schema> {
        let column_count = self.frame.column_count();
        if column_count == 0 {
            return Err(ExtractError::Config(
                "cannot build a schema for a table without columns".to_string(),
            ));
        }

        if let Some(overrides) = self.overrides {
            if let Some((position, _)) = overrides.range(column_count..).next() {
                return Err(ExtractError::Lookup(format!(
                    "override for column {} but the table has {} columns",
                    position, column_count
                )));
            }
        }

        let mut schema = Schema::new();
        for (position, column) in self.frame.columns().iter().enumerate() {
            let target = match self.overrides.and_then(|o| o.get(&position)) {
                Some(target) => {
                    tracing::debug!(column = column.name(), %target, "using column override");
                    *target
                }
                None => {
                    let category = self.inferrer.infer(column);
                    let target = map_category(category);
                    tracing::debug!(
                        column = column.name(),
                        %category,
                        %target,
                        "inferred column type"
                    );
                    target
                }
            };
            schema.push(column.name(), target)?;
        }

        if self.add_index {
            schema = schema.with_index(index_column_name(self.frame))?;
        }

        Ok(schema)
    }
}

/// First of `index`, `index_1`, `index_2`, … not used by a frame column.
pub fn index_column_name(frame: &DataFrame) -> String {
    let mut candidate = INDEX_COLUMN.to_string();
    let mut suffix = 1;
    while frame.position(&candidate).is_some() {
        candidate = format!("{}_{}", INDEX_COLUMN, suffix);
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Column, Value};

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    fn scenario_frame() -> DataFrame {
        frame(vec![
            Column::new("id", vec![Value::from(1), Value::from(2)]),
            Column::new("name", vec![Value::from("a"), Value::Null]),
            Column::new("score", vec![Value::from(1.5), Value::from(2)]),
        ])
    }

    #[test]
    fn test_build_infers_types() {
        let schema = SchemaBuilder::new(&scenario_frame()).build().unwrap();
        let types: Vec<TargetType> = schema.iter().map(|(_, t)| t).collect();
        assert_eq!(
            types,
            vec![TargetType::Integer, TargetType::StringUnicode, TargetType::Double]
        );
        assert!(!schema.is_indexed());
    }

    #[test]
    fn test_build_with_index() {
        let schema = SchemaBuilder::new(&scenario_frame())
            .add_index(true)
            .build()
            .unwrap();
        assert_eq!(schema.column_names(), vec!["index", "id", "name", "score"]);
        assert_eq!(schema.get("index"), Some(TargetType::Integer));
    }

    #[test]
    fn test_override_bypasses_inference() {
        let frame = frame(vec![Column::new("location", vec![Value::from("POINT (1 2)")])]);
        let overrides = Overrides::from([(0, TargetType::Spatial)]);
        let schema = SchemaBuilder::new(&frame).overrides(&overrides).build().unwrap();
        assert_eq!(schema.get("location"), Some(TargetType::Spatial));
    }

    #[test]
    fn test_override_out_of_range() {
        let frame = scenario_frame();
        let overrides = Overrides::from([(7, TargetType::Spatial)]);
        let err = SchemaBuilder::new(&frame).overrides(&overrides).build().unwrap_err();
        assert!(matches!(err, ExtractError::Lookup(_)));
    }

    #[test]
    fn test_zero_columns_rejected() {
        let err = SchemaBuilder::new(&DataFrame::default()).build().unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_build_is_idempotent() {
        let frame = scenario_frame();
        let builder = SchemaBuilder::new(&frame).add_index(true);
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_index_name_avoids_collisions() {
        let frame = frame(vec![
            Column::new("index", vec![]),
            Column::new("index_1", vec![]),
        ]);
        assert_eq!(index_column_name(&frame), "index_2");

        let schema = SchemaBuilder::new(&frame).add_index(true).build().unwrap();
        assert_eq!(schema.column_names(), vec!["index_2", "index", "index_1"]);
    }
}
