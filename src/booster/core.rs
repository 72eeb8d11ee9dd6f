//! Provides `Booster` trait.

use crate::{Result, WeakLearner};
use std::ops::ControlFlow;

/// The trait [`Booster`] defines the standard framework of Boosting.
/// Here, the **standard framework** is defined as
/// a repeated game between **Booster** and **Weak Learner**
/// of the following form:
///
/// In each round `t = 1, 2, ...`,
/// 1. Booster chooses weights over the training rows.
/// 2. Weak Learner proposes a candidate expression that scores well
///    under the weights.
/// 3. Booster turns the candidate into a contribution
///    and appends it to the ensemble.
///
/// # Required Methods
/// - [`Booster::name`]
/// - [`Booster::preprocess`]
/// - [`Booster::boost`]
/// - [`Booster::postprocess`]
/// - [`Booster::info`] ... optional.
///
/// # Provided Methods
/// - [`Booster::run`]
pub trait Booster {
    /// The final hypothesis output by a boosting algorithm.
    type Output;

    /// Returns the name of the boosting algorithm.
    fn name(&self) -> &str;

    /// Returns the information of boosting algorithm as `String`.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }

    /// A main function that runs boosting algorithm.
    fn run<W>(&mut self, weak_learner: &W) -> Result<Self::Output>
        where W: WeakLearner + ?Sized
    {
        self.preprocess()?;

        for iter in 1.. {
            if self.boost(weak_learner, iter)?.is_break() {
                break;
            }
        }

        self.postprocess()
    }

    /// Pre-processing for `self`.
    /// As you can see in [`Booster::run`],
    /// this method is called before the boosting process.
    /// Configuration errors are reported here.
    fn preprocess(&mut self) -> Result<()>;

    /// Boosting step per iteration.
    /// This method returns
    /// `ControlFlow::Continue(())` to go on, and
    /// `ControlFlow::Break(terminated_iter)` once a stopping criterion
    /// is satisfied.
    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner + ?Sized;

    /// Post-processing.
    fn postprocess(&mut self) -> Result<Self::Output>;
}
