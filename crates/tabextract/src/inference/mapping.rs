//! Mapping from semantic categories to destination column types.

use crate::schema::{SemanticCategory, TargetType};

/// Destination type for a semantic category.
///
/// Lossy numeric categories widen to `Double`. `Spatial` is never produced
/// here; it is only reachable through a column override.
pub fn map_category(category: SemanticCategory) -> TargetType {
    match category {
        SemanticCategory::String | SemanticCategory::Complex | SemanticCategory::Mixed => {
            TargetType::StringUnicode
        }
        SemanticCategory::Bytes | SemanticCategory::Boolean => TargetType::Boolean,
        SemanticCategory::Floating
        | SemanticCategory::Decimal
        | SemanticCategory::MixedInteger
        | SemanticCategory::MixedIntegerFloat => TargetType::Double,
        SemanticCategory::Integer => TargetType::Integer,
        SemanticCategory::Categorical => TargetType::StringFixed,
        SemanticCategory::Datetime64
        | SemanticCategory::Datetime
        | SemanticCategory::Timedelta64
        | SemanticCategory::Timedelta
        | SemanticCategory::Time => TargetType::DateTime,
        SemanticCategory::Date => TargetType::Date,
        SemanticCategory::Period => TargetType::Duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        use SemanticCategory as C;
        use TargetType as T;

        let expected = [
            (C::String, T::StringUnicode),
            (C::Complex, T::StringUnicode),
            (C::Mixed, T::StringUnicode),
            (C::Bytes, T::Boolean),
            (C::Boolean, T::Boolean),
            (C::Floating, T::Double),
            (C::Decimal, T::Double),
            (C::MixedInteger, T::Double),
            (C::MixedIntegerFloat, T::Double),
            (C::Integer, T::Integer),
            (C::Categorical, T::StringFixed),
            (C::Datetime64, T::DateTime),
            (C::Datetime, T::DateTime),
            (C::Timedelta64, T::DateTime),
            (C::Timedelta, T::DateTime),
            (C::Time, T::DateTime),
            (C::Date, T::Date),
            (C::Period, T::Duration),
        ];

        assert_eq!(expected.len(), SemanticCategory::ALL.len());
        for (category, target) in expected {
            assert_eq!(map_category(category), target, "{}", category);
        }
    }

    #[test]
    fn test_spatial_never_inferred() {
        assert!(
            SemanticCategory::ALL
                .into_iter()
                .all(|c| map_category(c) != TargetType::Spatial)
        );
    }
}
