//! Defines the error type shared by the whole crate.
use thiserror::Error;

use crate::expression::Type;


/// Errors raised while building expressions, loading tables,
/// or running a boosting algorithm.
///
/// Violations of index-set or cache invariants are not represented here.
/// Those are programming errors and are asserted eagerly.
#[derive(Debug, Error)]
pub enum Error {
    /// A variable refers to an input column that the table does not hold.
    #[error("input column #{input} (`{name}`) is missing from the table")]
    MissingColumn {
        /// Name of the variable.
        name: String,
        /// Input index of the variable.
        input: usize,
    },

    /// A node received a sub-node (or a column) of the wrong type.
    #[error("type mismatch in {context}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Where the mismatch occurred.
        context: String,
        /// Expected type.
        expected: String,
        /// Type actually found.
        found: Type,
    },

    /// A function received the wrong number of arguments.
    #[error("function `{function}` expects {expected} argument(s), got {found}")]
    Arity {
        /// Function name.
        function: String,
        /// Expected number of arguments.
        expected: usize,
        /// Number of arguments actually given.
        found: usize,
    },

    /// Column lengths do not agree with the table.
    #[error("shape mismatch for `{name}`: expected {expected} rows, got {found}")]
    Shape {
        /// Name of the offending column.
        name: String,
        /// Number of rows of the table.
        expected: usize,
        /// Length of the column.
        found: usize,
    },

    /// The target column cannot be used for the requested task.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// An operation expected another kind of expression.
    #[error("expression #{id} is not {expected}")]
    NotAnExpression {
        /// Arena index of the expression.
        id: usize,
        /// Expected kind.
        expected: &'static str,
    },

    /// A builder was asked to build without one of its components.
    #[error("{0} is not specified")]
    Incomplete(&'static str),

    /// The weak learner returned no usable candidate.
    #[error("failed to find a weak learner")]
    WeakLearnerFailed,

    /// A weight, vote or log-ratio became NaN or infinite.
    #[error("non-finite {quantity}: {value}")]
    NonFinite {
        /// Name of the quantity.
        quantity: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A text cell could not be parsed.
    #[error("failed to parse `{cell}` at line {line}")]
    Parse {
        /// The cell content.
        cell: String,
        /// 1-based line number.
        line: usize,
    },

    /// I/O failure while reading a table or writing a log.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure raised by `polars` while converting a data frame.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}


/// Alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
