//! Schema types: categories, destination types and table schemas.

mod builder;
mod column;
mod table;
mod types;

pub use builder::{index_column_name, Overrides, SchemaBuilder};
pub use column::ColumnProfile;
pub use table::Schema;
pub use types::{SemanticCategory, TargetType};
