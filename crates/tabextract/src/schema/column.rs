//! Per-column inference report.

use serde::{Deserialize, Serialize};

use crate::input::ColumnKind;

use super::types::{SemanticCategory, TargetType};

/// What was inferred for a single source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the source table.
    pub position: usize,
    /// Storage kind of the source column.
    pub kind: ColumnKind,
    /// Inferred category of the non-missing values.
    pub category: SemanticCategory,
    /// Destination type the column will be written as.
    pub target: TargetType,
    /// Whether `target` comes from a manual override rather than inference.
    pub overridden: bool,
    /// Total number of values (including nulls).
    pub count: usize,
    /// Number of missing values.
    pub null_count: usize,
    /// Sample of distinct values for display.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }
}
