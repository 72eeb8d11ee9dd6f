use std::sync::Arc;

use crate::expression::{Type, Value, FAILURE, SUCCESS, MISSING};
use crate::table::{Column, IndexSet, SampleVector};


/// Marks a row that the current predictions do not cover.
const INACTIVE: u8 = 3;


/// A statistic that scores a candidate prediction column
/// under the current example weights.
///
/// Implementors keep aggregates over the active rows
/// so that [`WeakObjective::flip_prediction`] runs
/// without rescanning the predictions.
pub trait WeakObjective {
    /// Returns the name of the objective.
    fn name(&self) -> &str;


    /// Replaces the example weights.
    fn set_weights(&mut self, weights: Vec<f64>);


    /// Returns the example weights.
    fn weights(&self) -> &[f64];


    /// Ingests a ternary prediction column
    /// and recomputes the aggregates over its rows.
    fn set_predictions(&mut self, predictions: &SampleVector);


    /// Toggles the prediction of `row` between failure and success.
    /// The row must be active and not missing.
    fn flip_prediction(&mut self, row: usize);


    /// Returns the score of the current predictions. Higher is better.
    fn compute_objective(&self) -> f64;


    /// Returns the weighted mean of the supervision over `indices`.
    fn compute_vote(&self, indices: &IndexSet) -> Value;


    /// Sets `predictions` and returns their score.
    fn compute(&mut self, predictions: &SampleVector) -> f64 {
        self.set_predictions(predictions);
        self.compute_objective()
    }


    /// Finds the threshold `t` such that the predictions `x >= t`
    /// over the non-missing values of `values` score best.
    /// Returns `(threshold, score)`.
    /// Among tied thresholds, the median one is returned.
    fn find_best_threshold(&mut self, values: &SampleVector) -> (f64, f64) {
        let n = values.len();
        let mut codes = Vec::with_capacity(n);
        let mut sorted = Vec::with_capacity(n);
        for (row, x) in values.raw_doubles() {
            if x.is_nan() {
                codes.push(MISSING);
            } else {
                codes.push(FAILURE);
                sorted.push((row, x));
            }
        }
        let predictions = SampleVector::owned(
            Arc::clone(values.indices()), Type::Boolean, Column::Boolean(codes)
        );
        self.set_predictions(&predictions);

        if sorted.is_empty() {
            return (0.0, self.compute_objective());
        }
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut best_score = f64::MIN;
        let mut best_thresholds = Vec::new();
        let mut previous = sorted[sorted.len() - 1].1;

        // Sweep from the largest value down,
        // turning one more row into a success at each step.
        for &(row, threshold) in sorted.iter().rev() {
            if threshold < previous {
                let score = self.compute_objective();
                if score >= best_score {
                    if score > best_score {
                        best_thresholds.clear();
                        best_score = score;
                    }
                    best_thresholds.push((threshold + previous) / 2.0);
                }
                previous = threshold;
            }
            self.flip_prediction(row);
        }

        if best_thresholds.is_empty() {
            // A single distinct value: every threshold splits the same way.
            return (previous, self.compute_objective());
        }
        (best_thresholds[best_thresholds.len() / 2], best_score)
    }
}


/// Per-row ternary predictions of the active rows.
#[derive(Debug, Clone)]
pub(crate) struct PredictionState {
    codes: Vec<u8>,
    active: Vec<usize>,
}


impl PredictionState {
    pub(crate) fn new(n_rows: usize) -> Self {
        Self { codes: vec![INACTIVE; n_rows], active: Vec::new() }
    }


    /// Replaces the active rows by those of `predictions`.
    pub(crate) fn reset(&mut self, predictions: &SampleVector) {
        for &row in &self.active {
            self.codes[row] = INACTIVE;
        }
        self.active.clear();
        for (row, code) in predictions.raw_booleans() {
            self.codes[row] = code;
            self.active.push(row);
        }
    }


    #[inline]
    pub(crate) fn code(&self, row: usize) -> u8 {
        self.codes[row]
    }


    /// Toggles `row` and returns its new code.
    #[inline]
    pub(crate) fn flip(&mut self, row: usize) -> u8 {
        let code = self.codes[row];
        assert!(
            code == FAILURE || code == SUCCESS,
            "cannot flip row {row}: it is missing or inactive"
        );
        let flipped = SUCCESS - code;
        self.codes[row] = flipped;
        flipped
    }
}
