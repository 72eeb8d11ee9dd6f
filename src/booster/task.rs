//! What a weight-boosting algorithm needs to know about its task.
use rayon::prelude::*;

use crate::{Result, Task};
use crate::common::{checker, utils};
use crate::expression::{SequenceKind, Type, Value};
use crate::objective::WeakObjective;
use crate::table::{Column, DataTable, SampleVector};


/// The three leaf votes of a contribution,
/// indexed by the ternary code of the weak prediction.
/// An absent vote makes the contribution output missing,
/// which the ensemble counts as `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Votes {
    /// Vote on the rows predicted as failure.
    pub failure: Option<Value>,
    /// Vote on the rows predicted as success.
    pub success: Option<Value>,
    /// Vote on the rows whose prediction is missing.
    pub missing: Option<Value>,
}


impl Votes {
    /// Returns the vote of the ternary code `code`.
    pub fn get(&self, code: u8) -> Option<&Value> {
        match code {
            crate::expression::FAILURE => self.failure.as_ref(),
            crate::expression::SUCCESS => self.success.as_ref(),
            _ => self.missing.as_ref(),
        }
    }
}


/// The new example weights and the losses of the current ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct Reweighting {
    /// Weights, non-negative and summing to `1`.
    pub weights: Vec<f64>,
    /// `sum_i w_i [y_i f(x_i) <= 0]` under the new weights.
    pub loss: f64,
    /// `log10 sum_i w0_i exp(-y_i f(x_i))`.
    pub log_loss: f64,
}


/// A task solved by [`WeightBoosting`](super::WeightBoosting).
///
/// The task fixes the weak objective, the ensemble aggregate,
/// the leaf votes, and how ensemble scores compare with the target.
/// Weights live on "slots": one slot per row for a binary task,
/// one slot per `(row, label)` pair for a multi-label task.
pub trait BoostingTask {
    /// The weak objective handed to the weak learner.
    type Objective: WeakObjective + 'static;

    /// Returns the name of the boosting algorithm.
    fn name(&self) -> &str;

    /// Returns the task.
    fn task(&self) -> Task;

    /// Checks that the target of `table` suits the task.
    fn check(&self, table: &DataTable) -> Result<()>;

    /// Creates the weak objective over the target of `table`,
    /// carrying the initial weights.
    fn new_objective(&self, table: &DataTable) -> Self::Objective;

    /// Returns the aggregate of the ensemble.
    fn ensemble_kind(&self) -> SequenceKind;

    /// Returns the type of the votes.
    fn vote_type(&self) -> Type {
        self.ensemble_kind().output_type()
    }

    /// Returns `y f(x)` of every slot,
    /// where `scores` is the ensemble aggregate over `table`.
    fn margins(&self, table: &DataTable, scores: &Column) -> Vec<f64>;

    /// Computes the leaf votes of a weak node
    /// whose predictions are `predictions`.
    fn compute_votes(
        &self,
        objective: &mut Self::Objective,
        predictions: &SampleVector,
    ) -> Result<Votes>;

    /// Returns the fraction of rows of `table` the ensemble misclassifies.
    fn training_error(&self, table: &DataTable, scores: &Column) -> f64;
}


/// Returns the AdaBoost vote `0.5 ln(correct / error)`.
///
/// The vote is `+1` if `error` is zero, `-1` if `correct` is zero,
/// and `0` if both are.
pub fn adaboost_vote(correct: f64, error: f64) -> Result<f64> {
    let vote = match (correct > 0.0, error > 0.0) {
        (false, false) => 0.0,
        (true, false) => 1.0,
        (false, true) => -1.0,
        (true, true) => 0.5 * (correct / error).ln(),
    };
    checker::finite("vote", vote)
}


/// Computes the exponential-loss weights
/// `w_i ∝ w0_i exp(-margins[i])` and the losses of the ensemble.
pub(crate) fn reweight(initial: &[f64], margins: &[f64]) -> Result<Reweighting> {
    assert_eq!(initial.len(), margins.len());

    // To prevent overflow, take the logarithm.
    let mut weights = initial.par_iter()
        .zip(margins)
        .map(|(w0, m)| w0.ln() - m)
        .collect::<Vec<_>>();
    let normalizer = checker::finite("normalizer", utils::exp_normalize(&mut weights))?;
    for &w in &weights {
        checker::finite("weight", w)?;
    }
    checker::simplex_condition(&weights);

    // A fold from `0.0` keeps the loss of a separated sample at `+0.0`.
    let loss = weights.iter()
        .zip(margins)
        .filter_map(|(w, &m)| (m <= 0.0).then_some(w))
        .fold(0.0, |acc, w| acc + w);

    Ok(Reweighting {
        weights,
        loss,
        log_loss: normalizer / std::f64::consts::LN_10,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaboost_vote_01() {
        let vote = adaboost_vote(30.0, 10.0).unwrap();
        assert!((vote - 0.5 * 3f64.ln()).abs() < 1e-12);
        assert!((vote - 0.5493).abs() < 1e-4);
    }

    #[test]
    fn test_adaboost_vote_degenerate() {
        assert_eq!(adaboost_vote(0.4, 0.0).unwrap(), 1.0);
        assert_eq!(adaboost_vote(0.0, 0.4).unwrap(), -1.0);
        assert_eq!(adaboost_vote(0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_reweight_01() {
        let initial = [0.25; 4];
        let margins = [1.0, -1.0, 1.0, 0.0];
        let rw = reweight(&initial, &margins).unwrap();

        let sum = rw.weights.iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(rw.weights.iter().all(|&w| w >= 0.0));

        let e = std::f64::consts::E;
        let z = 2.0 / e + e + 1.0;
        assert!((rw.weights[1] - e / z).abs() < 1e-12);
        let loss = (e + 1.0) / z;
        assert!((rw.loss - loss).abs() < 1e-12);
        let log_loss = (0.25 * z).log10();
        assert!((rw.log_loss - log_loss).abs() < 1e-12);
    }

    #[test]
    fn test_reweight_separable() {
        let initial = [0.5, 0.5];
        let rw = reweight(&initial, &[1.0, 2.0]).unwrap();
        assert_eq!(rw.loss, 0.0);
        assert!(rw.loss.is_sign_positive());
        assert_eq!(format!("{}", rw.loss), "0");
    }

    #[test]
    fn test_votes_get() {
        let votes = Votes {
            failure: Some(Value::Double(-1.0)),
            success: Some(Value::Double(1.0)),
            missing: None,
        };
        assert_eq!(votes.get(0), Some(&Value::Double(-1.0)));
        assert_eq!(votes.get(1), Some(&Value::Double(1.0)));
        assert_eq!(votes.get(2), None);
    }
}
