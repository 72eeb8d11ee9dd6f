//! Defines some common functions used in this library.

/// Defines some useful functions such as log-sum-exp normalization.
pub mod utils;

/// Defines some checker functions.
pub(crate) mod checker;

/// Defines machine learning tasks.
pub(crate) mod task;

/// Numeric tolerances.
pub(crate) mod constants;

pub use task::*;
