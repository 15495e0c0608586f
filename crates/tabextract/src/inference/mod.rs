//! Semantic category inference and type mapping.

mod category;
mod mapping;

pub use category::{infer_values, TypeInferrer};
pub use mapping::map_category;
