//! Core type definitions: semantic categories and destination column types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Observed nature of a column's non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticCategory {
    /// Text values.
    String,
    /// Raw byte strings.
    Bytes,
    /// Floating-point numbers.
    Floating,
    /// Whole numbers.
    Integer,
    /// Integers mixed with non-numeric values.
    MixedInteger,
    /// Integers and floats together.
    MixedIntegerFloat,
    /// Exact decimals.
    Decimal,
    /// Complex numbers.
    Complex,
    /// Enumerated labels.
    Categorical,
    /// True/false values.
    Boolean,
    /// Natively stored timestamps.
    Datetime64,
    /// Timestamps held as individual values.
    Datetime,
    /// Calendar dates.
    Date,
    /// Natively stored time deltas.
    Timedelta64,
    /// Time deltas held as individual values.
    Timedelta,
    /// Times of day.
    Time,
    /// Anchored time spans.
    Period,
    /// No single kind dominates.
    Mixed,
}

impl SemanticCategory {
    /// Every category, in declaration order.
    pub const ALL: [SemanticCategory; 18] = [
        SemanticCategory::String,
        SemanticCategory::Bytes,
        SemanticCategory::Floating,
        SemanticCategory::Integer,
        SemanticCategory::MixedInteger,
        SemanticCategory::MixedIntegerFloat,
        SemanticCategory::Decimal,
        SemanticCategory::Complex,
        SemanticCategory::Categorical,
        SemanticCategory::Boolean,
        SemanticCategory::Datetime64,
        SemanticCategory::Datetime,
        SemanticCategory::Date,
        SemanticCategory::Timedelta64,
        SemanticCategory::Timedelta,
        SemanticCategory::Time,
        SemanticCategory::Period,
        SemanticCategory::Mixed,
    ];

    /// Canonical name, e.g. `mixed-integer-float`.
    pub fn name(&self) -> &'static str {
        match self {
            SemanticCategory::String => "string",
            SemanticCategory::Bytes => "bytes",
            SemanticCategory::Floating => "floating",
            SemanticCategory::Integer => "integer",
            SemanticCategory::MixedInteger => "mixed-integer",
            SemanticCategory::MixedIntegerFloat => "mixed-integer-float",
            SemanticCategory::Decimal => "decimal",
            SemanticCategory::Complex => "complex",
            SemanticCategory::Categorical => "categorical",
            SemanticCategory::Boolean => "boolean",
            SemanticCategory::Datetime64 => "datetime64",
            SemanticCategory::Datetime => "datetime",
            SemanticCategory::Date => "date",
            SemanticCategory::Timedelta64 => "timedelta64",
            SemanticCategory::Timedelta => "timedelta",
            SemanticCategory::Time => "time",
            SemanticCategory::Period => "period",
            SemanticCategory::Mixed => "mixed",
        }
    }

    /// Returns true if this category is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SemanticCategory::Floating
                | SemanticCategory::Integer
                | SemanticCategory::MixedInteger
                | SemanticCategory::MixedIntegerFloat
                | SemanticCategory::Decimal
        )
    }

    /// Returns true if this category is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            SemanticCategory::Datetime64
                | SemanticCategory::Datetime
                | SemanticCategory::Date
                | SemanticCategory::Timedelta64
                | SemanticCategory::Timedelta
                | SemanticCategory::Time
                | SemanticCategory::Period
        )
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticCategory {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SemanticCategory::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| ExtractError::UnknownType(format!("semantic category '{}'", s)))
    }
}

/// Column type understood by the destination format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Variable-length unicode text.
    #[serde(rename = "unicode_string")]
    StringUnicode,
    /// Fixed-width character text.
    #[serde(rename = "char_string")]
    StringFixed,
    #[serde(rename = "boolean")]
    Boolean,
    /// 64-bit float.
    #[serde(rename = "double")]
    Double,
    /// 64-bit signed integer.
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "duration")]
    Duration,
    /// Geometry, only reachable through an explicit override.
    #[serde(rename = "spatial")]
    Spatial,
}

impl TargetType {
    /// Every target type, in declaration order.
    pub const ALL: [TargetType; 9] = [
        TargetType::StringUnicode,
        TargetType::StringFixed,
        TargetType::Boolean,
        TargetType::Double,
        TargetType::Integer,
        TargetType::DateTime,
        TargetType::Date,
        TargetType::Duration,
        TargetType::Spatial,
    ];

    /// Canonical name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            TargetType::StringUnicode => "unicode_string",
            TargetType::StringFixed => "char_string",
            TargetType::Boolean => "boolean",
            TargetType::Double => "double",
            TargetType::Integer => "integer",
            TargetType::DateTime => "datetime",
            TargetType::Date => "date",
            TargetType::Duration => "duration",
            TargetType::Spatial => "spatial",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode_string" | "string" | "text" => Ok(TargetType::StringUnicode),
            "char_string" | "fixed_string" => Ok(TargetType::StringFixed),
            "boolean" | "bool" => Ok(TargetType::Boolean),
            "double" | "float" => Ok(TargetType::Double),
            "integer" | "int" => Ok(TargetType::Integer),
            "datetime" => Ok(TargetType::DateTime),
            "date" => Ok(TargetType::Date),
            "duration" => Ok(TargetType::Duration),
            "spatial" | "geometry" => Ok(TargetType::Spatial),
            _ => Err(ExtractError::UnknownType(format!("target type '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip() {
        for category in SemanticCategory::ALL {
            assert_eq!(category.name().parse::<SemanticCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_serde_matches_name() {
        let json = serde_json::to_string(&SemanticCategory::MixedIntegerFloat).unwrap();
        assert_eq!(json, "\"mixed-integer-float\"");
        let json = serde_json::to_string(&SemanticCategory::Datetime64).unwrap();
        assert_eq!(json, "\"datetime64\"");
    }

    #[test]
    fn test_unknown_category() {
        let err = "empty".parse::<SemanticCategory>().unwrap_err();
        assert!(matches!(err, ExtractError::UnknownType(_)));
    }

    #[test]
    fn test_numeric_categories_map_to_numbers() {
        for category in SemanticCategory::ALL {
            let numeric_target = matches!(
                crate::inference::map_category(category),
                TargetType::Double | TargetType::Integer
            );
            assert_eq!(category.is_numeric(), numeric_target, "{}", category);
        }
        assert!(SemanticCategory::MixedInteger.is_numeric());
        assert!(!SemanticCategory::Complex.is_numeric());
    }

    #[test]
    fn test_target_aliases() {
        assert_eq!("geometry".parse::<TargetType>().unwrap(), TargetType::Spatial);
        assert_eq!("Char_String".parse::<TargetType>().unwrap(), TargetType::StringFixed);
        assert_eq!("float".parse::<TargetType>().unwrap(), TargetType::Double);
        assert!(matches!(
            "blob".parse::<TargetType>(),
            Err(ExtractError::UnknownType(_))
        ));
    }

    #[test]
    fn test_target_serde_matches_name() {
        for target in TargetType::ALL {
            let json = serde_json::to_string(&target).unwrap();
            assert_eq!(json, format!("\"{}\"", target.name()));
        }
    }
}
