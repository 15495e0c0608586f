//! Semantic category inference from column values.

use std::collections::BTreeSet;

use indexmap::IndexSet;

use crate::input::{Column, ColumnKind, Value, ValueKind};
use crate::schema::{ColumnProfile, SemanticCategory, TargetType};

use super::mapping::map_category;

/// Distinct values kept in a column profile.
const PROFILE_SAMPLES: usize = 5;

/// Infers the semantic category of source columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeInferrer;

impl TypeInferrer {
    pub fn new() -> Self {
        Self
    }

    /// Infer the category of a column from its non-missing values.
    ///
    /// Typed storage kinds decide the category before any value is looked at.
    pub fn infer(&self, column: &Column) -> SemanticCategory {
        match column.kind() {
            ColumnKind::Categorical => SemanticCategory::Categorical,
            ColumnKind::Datetime64 => SemanticCategory::Datetime64,
            ColumnKind::Timedelta64 => SemanticCategory::Timedelta64,
            ColumnKind::Object => infer_values(column.non_null()),
        }
    }

    /// Build the inference report for a column.
    ///
    /// `override_type` replaces the mapped target when present.
    pub fn profile(
        &self,
        column: &Column,
        position: usize,
        override_type: Option<TargetType>,
    ) -> ColumnProfile {
        let category = self.infer(column);
        let target = override_type.unwrap_or_else(|| map_category(category));

        let mut samples: IndexSet<String> = IndexSet::new();
        for value in column.non_null() {
            if samples.len() >= PROFILE_SAMPLES {
                break;
            }
            samples.insert(value.to_string());
        }

        ColumnProfile {
            name: column.name().to_string(),
            position,
            kind: column.kind(),
            category,
            target,
            overridden: override_type.is_some(),
            count: column.len(),
            null_count: column.null_count(),
            sample_values: samples.into_iter().collect(),
        }
    }
}

/// Infer a category from already filtered, non-missing values.
///
/// An empty input yields `Mixed`. Integers alongside floats only give
/// `MixedIntegerFloat`; integers alongside anything else give `MixedInteger`.
pub fn infer_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> SemanticCategory {
    let kinds: BTreeSet<ValueKind> = values
        .into_iter()
        .filter(|v| !v.is_missing())
        .map(Value::kind)
        .collect();

    let mut iter = kinds.iter();
    match (iter.next(), iter.next()) {
        (None, _) => SemanticCategory::Mixed,
        (Some(kind), None) => single_kind_category(*kind),
        _ => {
            if !kinds.contains(&ValueKind::Integer) {
                SemanticCategory::Mixed
            } else if kinds
                .iter()
                .all(|k| matches!(k, ValueKind::Integer | ValueKind::Float))
            {
                SemanticCategory::MixedIntegerFloat
            } else {
                SemanticCategory::MixedInteger
            }
        }
    }
}

fn single_kind_category(kind: ValueKind) -> SemanticCategory {
    match kind {
        ValueKind::Text => SemanticCategory::String,
        ValueKind::Bytes => SemanticCategory::Bytes,
        ValueKind::Boolean => SemanticCategory::Boolean,
        ValueKind::Integer => SemanticCategory::Integer,
        ValueKind::Float => SemanticCategory::Floating,
        ValueKind::Decimal => SemanticCategory::Decimal,
        ValueKind::Complex => SemanticCategory::Complex,
        ValueKind::Date => SemanticCategory::Date,
        ValueKind::DateTime => SemanticCategory::Datetime,
        ValueKind::Time => SemanticCategory::Time,
        ValueKind::Duration => SemanticCategory::Timedelta,
        ValueKind::Period => SemanticCategory::Period,
        // Filtered out before this point
        ValueKind::Null => SemanticCategory::Mixed,
    }
}
