//! This file defines some functions that checks some pre-conditions
//! E.g., shape of data, validity of example weights.

use crate::{Error, Result};
use super::constants::{
    NUMERIC_TOLERANCE,
    SIMPLEX_TOLERANCE,
};


/// Check whether the training table is valid or not.
#[inline(always)]
pub(crate) fn table_shape(n_rows: usize, n_inputs: usize) {
    // The table must have at least one row.
    assert!(n_rows > 0, "the table has no rows");

    // The table must have an input column.
    assert!(n_inputs > 0, "the table has no input columns");
}


/// Check that `slice` is a probability vector:
/// all entries are non-negative and they sum up to `1`.
#[inline(always)]
pub(crate) fn simplex_condition(slice: &[f64]) {
    let sum = slice.iter().sum::<f64>();
    assert!((sum - 1f64).abs() < SIMPLEX_TOLERANCE, "sum(dist[..]) = {sum}");

    let ub = 1f64 + NUMERIC_TOLERANCE;
    assert!(
        slice.iter().all(|s| (0f64..=ub).contains(s)),
        "all weights must be in [0, 1]. slice = {slice:?}"
    );
}


/// Returns `value` if it is finite,
/// otherwise an error naming the `quantity` it represents.
#[inline(always)]
pub(crate) fn finite(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite { quantity, value })
    }
}
