//! Provides AdaBoost.MH by Schapire & Singer, 1999,
//! with discrete (shared) and real (per-label) votes.
use crate::{Result, Task};
use crate::common::{checker, utils};
use crate::common::task::signed_vectorize;
use crate::expression::{ExpressionArena, SequenceKind, Value};
use crate::objective::{MultiLabelObjective, WeakObjective};
use crate::table::{Column, DataTable, SampleVector};

use super::task::{adaboost_vote, BoostingTask, Votes};
use super::WeightBoosting;


/// AdaBoost.MH with one shared vote `alpha` per contribution.
/// Label `j` receives `+alpha` or `-alpha` on success
/// depending on the sign of its margin, and the opposite on failure.
#[derive(Debug, Clone, Copy)]
pub struct DiscreteAdaBoostMHTask {
    n_labels: usize,
}


/// AdaBoost.MH with an independent vote per branch and per label:
/// `0.5 ln(mu_positive / mu_negative)`.
#[derive(Debug, Clone, Copy)]
pub struct RealAdaBoostMHTask {
    n_labels: usize,
}


impl DiscreteAdaBoostMHTask {
    /// Creates the task over `n_labels` labels.
    pub fn new(n_labels: usize) -> Self {
        assert!(n_labels > 1, "AdaBoost.MH needs at least two labels");
        Self { n_labels }
    }
}


impl RealAdaBoostMHTask {
    /// Creates the task over `n_labels` labels.
    pub fn new(n_labels: usize) -> Self {
        assert!(n_labels > 1, "AdaBoost.MH needs at least two labels");
        Self { n_labels }
    }
}


impl BoostingTask for DiscreteAdaBoostMHTask {
    type Objective = MultiLabelObjective;


    fn name(&self) -> &str {
        "Discrete AdaBoost.MH"
    }


    fn task(&self) -> Task {
        Task::MultiClass(self.n_labels)
    }


    fn check(&self, table: &DataTable) -> Result<()> {
        table.is_valid_multi_class_instance(self.n_labels)
    }


    fn new_objective(&self, table: &DataTable) -> Self::Objective {
        MultiLabelObjective::new(table.target(), self.n_labels)
    }


    fn ensemble_kind(&self) -> SequenceKind {
        SequenceKind::VectorSum { labels: self.n_labels }
    }


    fn margins(&self, table: &DataTable, scores: &Column) -> Vec<f64> {
        multi_label_margins(table, scores, self.n_labels)
    }


    fn compute_votes(
        &self,
        objective: &mut Self::Objective,
        predictions: &SampleVector,
    ) -> Result<Votes>
    {
        objective.set_predictions(predictions);

        let mut signs = Vec::with_capacity(self.n_labels);
        let mut correct = 0.0;
        let mut error = 0.0;
        for (positive, negative) in objective.margins() {
            let sign = MultiLabelObjective::sign(positive, negative);
            signs.push(sign);
            if sign > 0.0 {
                correct += positive;
                error += negative;
            } else {
                correct += negative;
                error += positive;
            }
        }

        let alpha = adaboost_vote(correct, error)?;
        let scaled = |alpha: f64| {
            Value::vector(signs.iter().map(|s| alpha * s).collect::<Vec<_>>())
        };
        Ok(Votes {
            failure: Some(scaled(-alpha)),
            success: Some(scaled(alpha)),
            missing: None,
        })
    }


    fn training_error(&self, table: &DataTable, scores: &Column) -> f64 {
        multi_label_error(table, scores)
    }
}


impl BoostingTask for RealAdaBoostMHTask {
    type Objective = MultiLabelObjective;


    fn name(&self) -> &str {
        "Real AdaBoost.MH"
    }


    fn task(&self) -> Task {
        Task::MultiClass(self.n_labels)
    }


    fn check(&self, table: &DataTable) -> Result<()> {
        table.is_valid_multi_class_instance(self.n_labels)
    }


    fn new_objective(&self, table: &DataTable) -> Self::Objective {
        MultiLabelObjective::new(table.target(), self.n_labels)
    }


    fn ensemble_kind(&self) -> SequenceKind {
        SequenceKind::VectorSum { labels: self.n_labels }
    }


    fn margins(&self, table: &DataTable, scores: &Column) -> Vec<f64> {
        multi_label_margins(table, scores, self.n_labels)
    }


    /// A branch that receives no weight has no vote.
    fn compute_votes(
        &self,
        objective: &mut Self::Objective,
        predictions: &SampleVector,
    ) -> Result<Votes>
    {
        objective.set_predictions(predictions);

        let mut votes = [None, None, None];
        for (code, vote) in votes.iter_mut().enumerate() {
            let positive = objective.mu(code as u8, true);
            let negative = objective.mu(code as u8, false);
            let total = positive.iter().chain(negative).sum::<f64>();
            if total <= 0.0 {
                continue;
            }

            let values = positive.iter()
                .zip(negative)
                .map(|(&p, &n)| {
                    if p > 0.0 && n > 0.0 {
                        checker::finite("vote", 0.5 * (p / n).ln())
                    } else {
                        Ok(0.0)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            *vote = Some(Value::vector(values));
        }

        let [failure, success, missing] = votes;
        Ok(Votes { failure, success, missing })
    }


    fn training_error(&self, table: &DataTable, scores: &Column) -> f64 {
        multi_label_error(table, scores)
    }
}


/// `y_ij f_j(x_i)` in row-major order.
fn multi_label_margins(
    table: &DataTable,
    scores: &Column,
    n_labels: usize,
) -> Vec<f64>
{
    let zeros = vec![0.0; n_labels];
    table.target()
        .iter()
        .enumerate()
        .flat_map(|(i, &y)| {
            let row = scores.vector_row(i).unwrap_or(&zeros[..]);
            signed_vectorize(y, n_labels)
                .into_iter()
                .zip(row)
                .map(|(s, f)| s * f)
                .collect::<Vec<_>>()
        })
        .collect()
}


/// Fraction of rows whose top-scored label is not the class.
fn multi_label_error(table: &DataTable, scores: &Column) -> f64 {
    let target = table.target();
    let n_sample = target.len() as f64;
    target.iter()
        .enumerate()
        .filter(|&(i, &y)| {
            scores.vector_row(i)
                .map_or(true, |row| utils::argmax(row) != y as usize)
        })
        .count() as f64
        / n_sample
}


/// Discrete AdaBoost.MH over expression trees.
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// // Classes are `0`, `1`, `2`.
/// let train = DataTable::from_csv("/path/to/iris.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
/// let mut arena = ExpressionArena::new();
/// let inputs = arena.variables(&train);
///
/// let mut booster = DiscreteAdaBoostMH::init(&train, arena, 3)
///     .max_iterations(50);
/// let model = booster.run(&StumpLearner::new(inputs)).unwrap();
/// ```
pub type DiscreteAdaBoostMH<'a> = WeightBoosting<'a, DiscreteAdaBoostMHTask>;


/// Real AdaBoost.MH over expression trees.
pub type RealAdaBoostMH<'a> = WeightBoosting<'a, RealAdaBoostMHTask>;


impl<'a> DiscreteAdaBoostMH<'a> {
    /// Initialize the `DiscreteAdaBoostMH` for `n_labels` classes.
    pub fn init(
        train: &'a DataTable,
        arena: ExpressionArena,
        n_labels: usize,
    ) -> Self
    {
        WeightBoosting::new(train, arena, DiscreteAdaBoostMHTask::new(n_labels))
    }
}


impl<'a> RealAdaBoostMH<'a> {
    /// Initialize the `RealAdaBoostMH` for `n_labels` classes.
    pub fn init(
        train: &'a DataTable,
        arena: ExpressionArena,
        n_labels: usize,
    ) -> Self
    {
        WeightBoosting::new(train, arena, RealAdaBoostMHTask::new(n_labels))
    }
}
