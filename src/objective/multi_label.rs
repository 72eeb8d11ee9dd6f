//! The AdaBoost.MH edge over `K` binary labels.
use crate::common::task::signed_vectorize;
use crate::common::constants::MU_TOLERANCE;
use crate::expression::{Value, FAILURE, SUCCESS};
use crate::table::{IndexSet, SampleVector};

use super::weak_objective::{PredictionState, WeakObjective};


/// Scores a prediction column by the label-summed margin
/// of AdaBoost.MH.
///
/// Each row `i` owns `K` weights `w[i * K + j]`, one per label `j`.
/// The supervision of `(i, j)` is `+1` if `j` is the class of `i`
/// and `-1` otherwise.
/// The objective keeps, for each prediction code
/// (failure, success, missing) and each supervision sign,
/// the per-label total weight `mu[code][sign][j]`.
#[derive(Debug, Clone)]
pub struct MultiLabelObjective {
    n_labels: usize,
    supervisions: Vec<f64>,
    weights: Vec<f64>,
    state: PredictionState,
    mu: [[Vec<f64>; 2]; 3],
}


impl MultiLabelObjective {
    /// Creates an objective over the class indices `target`
    /// (`0`, `1`, ..., `n_labels - 1`).
    /// The initial weights are `1 / (2n)` on the positive pairs and
    /// `1 / (2n (K - 1))` on the negative ones.
    pub fn new(target: &[f64], n_labels: usize) -> Self {
        assert!(n_labels > 1, "AdaBoost.MH needs at least two labels");
        let n_sample = target.len();
        let supervisions = target.iter()
            .flat_map(|&y| signed_vectorize(y, n_labels))
            .collect::<Vec<_>>();
        let weights = Self::default_weights(&supervisions, n_sample, n_labels);

        let zeros = || vec![0.0; n_labels];
        Self {
            n_labels,
            supervisions,
            weights,
            state: PredictionState::new(n_sample),
            mu: [
                [zeros(), zeros()],
                [zeros(), zeros()],
                [zeros(), zeros()],
            ],
        }
    }


    /// Returns the asymmetric initial weights of AdaBoost.MH.
    pub fn default_weights(
        supervisions: &[f64],
        n_sample: usize,
        n_labels: usize,
    ) -> Vec<f64>
    {
        let n = n_sample as f64;
        let positive = 1.0 / (2.0 * n);
        let negative = 1.0 / (2.0 * n * (n_labels - 1) as f64);
        supervisions.iter()
            .map(|&s| if s > 0.0 { positive } else { negative })
            .collect()
    }


    /// Returns the number of labels.
    pub fn n_labels(&self) -> usize {
        self.n_labels
    }


    /// Returns the signed supervision of every `(row, label)` pair.
    pub fn supervisions(&self) -> &[f64] {
        &self.supervisions[..]
    }


    /// Returns the per-label weights of the rows predicted as `prediction`
    /// whose supervision is positive (`positive = true`) or negative.
    pub fn mu(&self, prediction: u8, positive: bool) -> &[f64] {
        &self.mu[prediction as usize][positive as usize][..]
    }


    /// Returns the per-label `(mu_positive, mu_negative)`:
    /// the weights that agree and disagree with
    /// the prediction "success means positive".
    pub fn margins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let [failure, success, _] = &self.mu;
        (0..self.n_labels).map(move |j| {
            let positive = failure[0][j] + success[1][j];
            let negative = success[0][j] + failure[1][j];
            (positive, negative)
        })
    }


    /// Returns `+1` if `positive` exceeds `negative`, `-1` otherwise.
    #[inline]
    pub fn sign(positive: f64, negative: f64) -> f64 {
        if positive > negative + MU_TOLERANCE { 1.0 } else { -1.0 }
    }
}


impl WeakObjective for MultiLabelObjective {
    fn name(&self) -> &str {
        "AdaBoost.MH edge"
    }


    fn set_weights(&mut self, weights: Vec<f64>) {
        assert_eq!(weights.len(), self.supervisions.len());
        self.weights = weights;
    }


    fn weights(&self) -> &[f64] {
        &self.weights[..]
    }


    fn set_predictions(&mut self, predictions: &SampleVector) {
        self.mu.iter_mut()
            .flatten()
            .for_each(|mu| mu.iter_mut().for_each(|m| { *m = 0.0; }));

        let k = self.n_labels;
        self.state.reset(predictions);
        for (row, code) in predictions.raw_booleans() {
            let [negative, positive] = &mut self.mu[code as usize];
            let weights = &self.weights[row * k..(row + 1) * k];
            let supervisions = &self.supervisions[row * k..(row + 1) * k];
            for (j, (&w, &s)) in weights.iter().zip(supervisions).enumerate() {
                if s > 0.0 {
                    positive[j] += w;
                } else {
                    negative[j] += w;
                }
            }
        }
    }


    fn flip_prediction(&mut self, row: usize) {
        let to = self.state.flip(row);
        let from = if to == SUCCESS { FAILURE } else { SUCCESS };

        let k = self.n_labels;
        for j in 0..k {
            let w = self.weights[row * k + j];
            let sign = (self.supervisions[row * k + j] > 0.0) as usize;
            self.mu[from as usize][sign][j] -= w;
            self.mu[to as usize][sign][j] += w;
        }
    }


    fn compute_objective(&self) -> f64 {
        self.margins()
            .map(|(positive, negative)| {
                Self::sign(positive, negative) * (positive - negative)
            })
            .sum::<f64>()
    }


    fn compute_vote(&self, indices: &IndexSet) -> Value {
        let k = self.n_labels;
        let mut distribution = vec![0.0; k];
        for row in indices {
            for (j, d) in distribution.iter_mut().enumerate() {
                let ix = row * k + j;
                *d += self.weights[ix] * (self.supervisions[ix] + 1.0) / 2.0;
            }
        }
        let sum = distribution.iter().sum::<f64>();
        if sum > 0.0 {
            distribution.iter_mut().for_each(|d| { *d /= sum; });
        }
        Value::vector(distribution)
    }
}
