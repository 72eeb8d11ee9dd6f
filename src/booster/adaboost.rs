//! Provides [`AdaBoost`] by Freund & Schapire, 1995.
use crate::{Result, Task};
use crate::expression::{ExpressionArena, SequenceKind, Value};
use crate::objective::{BinaryClassificationObjective, WeakObjective};
use crate::table::{Column, DataTable, SampleVector};

use super::task::{adaboost_vote, BoostingTask, Votes};
use super::WeightBoosting;


/// The two-class task of AdaBoost.
/// Labels are `+1` / `-1`; the ensemble is a running sum
/// whose sign is the prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaBoostTask;


impl BoostingTask for AdaBoostTask {
    type Objective = BinaryClassificationObjective;


    fn name(&self) -> &str {
        "AdaBoost"
    }


    fn task(&self) -> Task {
        Task::Binary
    }


    fn check(&self, table: &DataTable) -> Result<()> {
        table.is_valid_binary_instance()
    }


    fn new_objective(&self, table: &DataTable) -> Self::Objective {
        BinaryClassificationObjective::new(table.target().to_vec())
    }


    fn ensemble_kind(&self) -> SequenceKind {
        SequenceKind::Sum
    }


    fn margins(&self, table: &DataTable, scores: &Column) -> Vec<f64> {
        table.target()
            .iter()
            .enumerate()
            .map(|(i, y)| y * scores.raw_double(i))
            .collect()
    }


    /// The votes are `-v`, `+v` and `0` on failure, success and missing,
    /// where `v = 0.5 ln(correct / error)`.
    fn compute_votes(
        &self,
        objective: &mut Self::Objective,
        predictions: &SampleVector,
    ) -> Result<Votes>
    {
        objective.set_predictions(predictions);
        let vote = adaboost_vote(
            objective.correct_weight(), objective.error_weight()
        )?;
        Ok(Votes {
            failure: Some(Value::Double(-vote)),
            success: Some(Value::Double(vote)),
            missing: Some(Value::Double(0.0)),
        })
    }


    fn training_error(&self, table: &DataTable, scores: &Column) -> f64 {
        let target = table.target();
        let n_sample = target.len() as f64;
        target.iter()
            .enumerate()
            .filter(|&(i, &y)| {
                let p = if scores.raw_double(i) >= 0.0 { 1.0 } else { -1.0 };
                p != y
            })
            .count() as f64
            / n_sample
    }
}


/// Defines `AdaBoost` over expression trees.
///
/// Each round adds to the ensemble a test node
/// `weak ? v : -v | 0`, where `weak` is the candidate of the weak
/// learner and `v = 0.5 ln(correct / error)` under the current weights.
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// // Read the training table from the CSV file.
/// // We use the column named `class` (+1 / -1) as the label.
/// let train = DataTable::from_csv("/path/to/file.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
///
/// // The weak learner proposes stumps over the input columns.
/// let mut arena = ExpressionArena::new();
/// let inputs = arena.variables(&train);
/// let weak_learner = StumpLearner::new(inputs);
///
/// let mut booster = AdaBoost::init(&train, arena)
///     .max_iterations(200)
///     .tree_depth(2);
/// let model = booster.run(&weak_learner).unwrap();
///
/// let predictions = model.predict_all(&train).unwrap();
/// ```
pub type AdaBoost<'a> = WeightBoosting<'a, AdaBoostTask>;


impl<'a> AdaBoost<'a> {
    /// Initialize the `AdaBoost`.
    pub fn init(train: &'a DataTable, arena: ExpressionArena) -> Self {
        WeightBoosting::new(train, arena, AdaBoostTask)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::expression::{Type, FAILURE, SUCCESS, MISSING};
    use crate::table::IndexSet;

    #[test]
    fn test_binary_votes_01() {
        let task = AdaBoostTask;
        let mut objective = BinaryClassificationObjective::new(
            vec![1.0, 1.0, -1.0, -1.0]
        );
        objective.set_weights(vec![0.5, 0.25, 0.125, 0.125]);

        // correct = 0.5 + 0.125, error = 0.25
        let predictions = SampleVector::owned(
            Arc::new(IndexSet::all(4)),
            Type::Boolean,
            Column::Boolean(vec![SUCCESS, FAILURE, FAILURE, MISSING]),
        );
        let votes = task.compute_votes(&mut objective, &predictions).unwrap();
        let v = 0.5 * (0.625_f64 / 0.25).ln();
        assert_eq!(votes.success, Some(Value::Double(v)));
        assert_eq!(votes.failure, Some(Value::Double(-v)));
        assert_eq!(votes.missing, Some(Value::Double(0.0)));
    }

    #[test]
    fn test_margins_and_error() {
        let table = DataTable::from_columns(vec![
            ("x", Type::Double, Column::Double(vec![0.0, 1.0, 2.0])),
        ])
            .unwrap()
            .with_target(vec![1.0, -1.0, -1.0])
            .unwrap();
        let scores = Column::Double(vec![0.5, 0.25, -2.0]);
        let task = AdaBoostTask;
        assert_eq!(task.margins(&table, &scores), vec![0.5, -0.25, 2.0]);
        assert!((task.training_error(&table, &scores) - 1.0 / 3.0).abs() < 1e-12);
    }
}
