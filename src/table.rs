//! Column-oriented training tables, index sets and sample vectors.

mod index_set;
mod column;
mod sample_vector;
mod data_table;
mod reader;

pub use index_set::IndexSet;
pub use column::Column;
pub use sample_vector::{SampleVector, Storage};
pub use data_table::{DataTable, CacheStats};
