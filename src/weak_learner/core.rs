//! Provides `WeakLearner` trait.
use std::sync::Arc;

use crate::Result;
use crate::expression::{ExprId, ExpressionArena};
use crate::objective::WeakObjective;
use crate::table::{DataTable, IndexSet};


/// The answer of a weak learner:
/// a candidate expression and its objective value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeakCandidate {
    /// The candidate, if any.
    pub expression: Option<ExprId>,
    /// The objective value of the candidate.
    /// `-inf` means that no usable candidate was found.
    pub objective: f64,
}


impl WeakCandidate {
    /// Creates a candidate.
    pub fn new(expression: ExprId, objective: f64) -> Self {
        Self { expression: Some(expression), objective }
    }


    /// The "no usable candidate" answer.
    pub fn none() -> Self {
        Self { expression: None, objective: f64::NEG_INFINITY }
    }


    /// Returns the expression if its objective is better than `-inf`.
    pub fn usable(&self) -> Option<ExprId> {
        self.expression.filter(|_| self.objective > f64::NEG_INFINITY)
    }
}


/// An interface that searches a candidate weak expression.
///
/// A weak learner receives the rows `indices` of `table`
/// and the weak objective carrying the current example weights.
/// It may add new nodes to `arena`
/// (for example, a `Stump` over an input column) and returns
/// the best candidate it found with its objective value.
/// Failing to find a candidate is not an error:
/// it returns [`WeakCandidate::none`].
pub trait WeakLearner {
    /// Returns the name of the weak learner.
    fn name(&self) -> &str;


    /// Returns the information of the weak learner.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Searches the best candidate over `indices`.
    /// `root` is the ensemble being grown, if any.
    fn learn(
        &self,
        arena: &mut ExpressionArena,
        root: Option<ExprId>,
        table: &DataTable,
        indices: &Arc<IndexSet>,
        objective: &mut dyn WeakObjective,
    ) -> Result<WeakCandidate>;
}
