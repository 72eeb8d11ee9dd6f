//! The AdaBoost edge over a two-class target.
use crate::expression::{Value, FAILURE, SUCCESS};
use crate::table::{IndexSet, SampleVector};

use super::weak_objective::{PredictionState, WeakObjective};


/// Scores a prediction column by the larger of its correct and error
/// weight fractions.
///
/// Labels are `+1` / `-1`; a prediction of success means `+1`.
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// let labels = vec![1.0, -1.0, 1.0, -1.0];
/// let mut objective = BinaryClassificationObjective::new(labels);
/// objective.set_weights(vec![0.25; 4]);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryClassificationObjective {
    positive: Vec<bool>,
    weights: Vec<f64>,
    state: PredictionState,
    correct: f64,
    error: f64,
    missing: f64,
}


impl BinaryClassificationObjective {
    /// Creates an objective over `labels` with uniform weights.
    pub fn new(labels: Vec<f64>) -> Self {
        let n_sample = labels.len();
        let positive = labels.into_iter()
            .map(|y| y > 0.0)
            .collect::<Vec<_>>();
        let weights = vec![1.0 / n_sample as f64; n_sample];
        Self {
            positive,
            weights,
            state: PredictionState::new(n_sample),
            correct: 0.0,
            error: 0.0,
            missing: 0.0,
        }
    }


    /// Total weight of the active rows predicted correctly.
    pub fn correct_weight(&self) -> f64 {
        self.correct
    }


    /// Total weight of the active rows predicted wrongly.
    pub fn error_weight(&self) -> f64 {
        self.error
    }


    /// Total weight of the active rows with a missing prediction.
    pub fn missing_weight(&self) -> f64 {
        self.missing
    }
}


impl WeakObjective for BinaryClassificationObjective {
    fn name(&self) -> &str {
        "AdaBoost edge"
    }


    fn set_weights(&mut self, weights: Vec<f64>) {
        assert_eq!(weights.len(), self.positive.len());
        self.weights = weights;
    }


    fn weights(&self) -> &[f64] {
        &self.weights[..]
    }


    fn set_predictions(&mut self, predictions: &SampleVector) {
        self.correct = 0.0;
        self.error = 0.0;
        self.missing = 0.0;

        self.state.reset(predictions);
        for (row, code) in predictions.raw_booleans() {
            let w = self.weights[row];
            match code {
                FAILURE | SUCCESS => {
                    if (code == SUCCESS) == self.positive[row] {
                        self.correct += w;
                    } else {
                        self.error += w;
                    }
                },
                _ => { self.missing += w; },
            }
        }
    }


    fn flip_prediction(&mut self, row: usize) {
        let predicted = self.state.flip(row) == SUCCESS;
        let w = self.weights[row];
        if predicted == self.positive[row] {
            self.error -= w;
            self.correct += w;
        } else {
            self.correct -= w;
            self.error += w;
        }
    }


    fn compute_objective(&self) -> f64 {
        let total = self.correct + self.error + self.missing;
        // Weights can underflow to zero on a small partition.
        if total <= 0.0 {
            return 0.0;
        }
        self.correct.max(self.error) / total
    }


    fn compute_vote(&self, indices: &IndexSet) -> Value {
        let (mass, total) = indices.iter()
            .fold((0.0, 0.0), |(mass, total), row| {
                let w = self.weights[row];
                let y = if self.positive[row] { 1.0 } else { 0.0 };
                (mass + w * y, total + w)
            });
        if total > 0.0 {
            Value::Double(mass / total)
        } else {
            Value::Double(0.5)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::expression::{Type, MISSING};
    use crate::table::Column;

    fn predictions(codes: Vec<u8>) -> SampleVector {
        let indices = Arc::new(IndexSet::all(codes.len()));
        SampleVector::owned(indices, Type::Boolean, Column::Boolean(codes))
    }

    #[test]
    fn test_binary_aggregates_01() {
        let mut objective = BinaryClassificationObjective::new(
            vec![1.0, -1.0, 1.0, -1.0]
        );
        objective.set_weights(vec![0.5, 0.25, 0.125, 0.125]);
        let score = objective.compute(
            &predictions(vec![SUCCESS, SUCCESS, FAILURE, MISSING])
        );
        assert_eq!(objective.correct_weight(), 0.5);
        assert_eq!(objective.error_weight(), 0.375);
        assert_eq!(objective.missing_weight(), 0.125);
        assert_eq!(score, 0.5);
    }

    #[test]
    fn test_flip_round_trip() {
        let mut objective = BinaryClassificationObjective::new(
            vec![1.0, -1.0, 1.0, -1.0]
        );
        objective.set_weights(vec![0.5, 0.25, 0.125, 0.125]);
        objective.set_predictions(
            &predictions(vec![SUCCESS, SUCCESS, FAILURE, FAILURE])
        );
        let before = (objective.correct_weight(), objective.error_weight());

        objective.flip_prediction(1);
        assert_eq!(objective.correct_weight(), 0.875);
        assert_eq!(objective.error_weight(), 0.125);

        objective.flip_prediction(1);
        assert_eq!((objective.correct_weight(), objective.error_weight()), before);
    }

    #[test]
    fn test_best_threshold_01() {
        let mut objective = BinaryClassificationObjective::new(
            vec![-1.0, -1.0, 1.0, 1.0]
        );
        let indices = Arc::new(IndexSet::all(4));
        let values = SampleVector::owned(
            indices, Type::Double, Column::Double(vec![0.0, 1.0, 3.0, 4.0])
        );
        let (threshold, score) = objective.find_best_threshold(&values);
        assert_eq!(threshold, 2.0);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_best_threshold_ignores_missing() {
        let mut objective = BinaryClassificationObjective::new(
            vec![-1.0, 1.0, 1.0]
        );
        let indices = Arc::new(IndexSet::all(3));
        let values = SampleVector::owned(
            indices, Type::Double, Column::Double(vec![0.0, f64::NAN, 2.0])
        );
        let (threshold, _) = objective.find_best_threshold(&values);
        assert_eq!(threshold, 1.0);
        assert!((objective.missing_weight() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weightless_rows_score_zero() {
        let mut objective = BinaryClassificationObjective::new(
            vec![1.0, -1.0, 1.0, -1.0]
        );
        objective.set_weights(vec![0.5, 0.5, 0.0, 0.0]);
        let indices = Arc::new([2, 3].into_iter().collect::<IndexSet>());
        let predictions = SampleVector::owned(
            Arc::clone(&indices), Type::Boolean, Column::Boolean(vec![SUCCESS, FAILURE])
        );
        assert_eq!(objective.compute(&predictions), 0.0);

        let values = SampleVector::owned(
            indices, Type::Double, Column::Double(vec![1.0, 2.0])
        );
        let (_, score) = objective.find_best_threshold(&values);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_vote_01() {
        let mut objective = BinaryClassificationObjective::new(
            vec![1.0, -1.0, 1.0, -1.0]
        );
        objective.set_weights(vec![0.5, 0.25, 0.125, 0.125]);
        let indices = [0, 1].into_iter().collect::<IndexSet>();
        let vote = objective.compute_vote(&indices);
        assert_eq!(vote, Value::Double(0.5 / 0.75));
    }
}
