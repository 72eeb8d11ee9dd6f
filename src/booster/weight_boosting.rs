//! The stagewise skeleton shared by AdaBoost and AdaBoost.MH.
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::{
    Booster,
    Error,
    Result,
    WeakLearner,

    common::checker,
    research::{IterationReport, Research},
};
use crate::expression::{
    dispatch_indices,
    ExprId,
    Expression,
    ExpressionArena,
    Value,
};
use crate::hypothesis::Model;
use crate::objective::WeakObjective;
use crate::table::{Column, DataTable, IndexSet};

use super::task::{self, BoostingTask};


const DEFAULT_MAX_ITERATIONS: usize = 100;


/// A boosting algorithm that alternates
/// weak-candidate acquisition, contribution construction
/// and exponential-loss reweighting.
///
/// In each round, the weak learner proposes a candidate under the
/// current weights. The candidate becomes a *contribution*:
/// a test node dispatching to three constant votes
/// (or a single constant vote if the candidate is a constant).
/// The contribution is appended to the ensemble, a sequence node
/// whose cached aggregate is patched in place in every table.
///
/// With [`WeightBoosting::tree_depth`] greater than `1`,
/// the branches of a contribution are themselves contributions
/// learned on the rows the branch receives.
///
/// The algorithm stops after [`WeightBoosting::max_iterations`] rounds,
/// when the reweighting loss reaches zero,
/// or when the [`WeightBoosting::stop_when`] criterion holds.
pub struct WeightBoosting<'a, T: BoostingTask> {
    // Training table
    train: &'a DataTable,

    // Optional table to report the validation error on.
    validation: Option<&'a DataTable>,

    task: T,

    arena: ExpressionArena,

    // The ensemble.
    root: Option<ExprId>,

    // Weak objective, carrying the current weights.
    objective: Option<T::Objective>,

    initial_weights: Vec<f64>,

    max_iter: usize,
    tree_depth: usize,

    // Record the text of each contribution.
    verbose: bool,

    stop_criterion: Option<Box<dyn Fn(&IterationReport) -> bool + 'a>>,

    reports: Vec<IterationReport>,

    // Terminated iteration.
    terminated: usize,
}


impl<'a, T: BoostingTask> WeightBoosting<'a, T> {
    /// Initializes the booster over `train`.
    /// `arena` holds the nodes the weak learner proposes
    /// (typically one variable per input column).
    pub fn new(train: &'a DataTable, arena: ExpressionArena, task: T) -> Self {
        Self {
            train,
            validation: None,
            task,
            arena,
            root: None,
            objective: None,
            initial_weights: Vec::new(),
            max_iter: DEFAULT_MAX_ITERATIONS,
            tree_depth: 1,
            verbose: false,
            stop_criterion: None,
            reports: Vec::new(),
            terminated: usize::MAX,
        }
    }


    /// Runs at most `n` rounds. Default is `100`.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }


    /// Grows contributions of depth `depth`. Default is `1`.
    pub fn tree_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "the tree depth must be positive");
        self.tree_depth = depth;
        self
    }


    /// Reports the error of the ensemble on `table` at each round.
    pub fn validation(mut self, table: &'a DataTable) -> Self {
        self.validation = Some(table);
        self
    }


    /// Records the textual form of each contribution.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Stops as soon as `criterion` holds on the report of a round.
    pub fn stop_when<F>(mut self, criterion: F) -> Self
        where F: Fn(&IterationReport) -> bool + 'a
    {
        self.stop_criterion = Some(Box::new(criterion));
        self
    }


    /// Returns the arena holding the ensemble.
    pub fn arena(&self) -> &ExpressionArena {
        &self.arena
    }


    /// Returns the ensemble, once preprocessed.
    pub fn root(&self) -> Option<ExprId> {
        self.root
    }


    /// Returns the current example weights.
    pub fn weights(&self) -> Option<&[f64]> {
        self.objective.as_ref().map(|objective| objective.weights())
    }


    /// Returns the reports of the rounds run so far.
    pub fn reports(&self) -> &[IterationReport] {
        &self.reports[..]
    }


    /// Returns the round at which the algorithm stopped,
    /// `usize::MAX` while it runs.
    pub fn terminated(&self) -> usize {
        self.terminated
    }


    fn tables(&self) -> Vec<&'a DataTable> {
        std::iter::once(self.train)
            .chain(self.validation)
            .collect()
    }
}


impl<T: BoostingTask> Booster for WeightBoosting<'_, T> {
    type Output = Model;


    fn name(&self) -> &str {
        self.task.name()
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_rows, n_inputs) = self.train.shape();
        let validation = self.validation
            .map(|table| table.shape().0.to_string())
            .unwrap_or_else(|| "-".into());
        let info = Vec::from([
            ("# of examples", format!("{n_rows}")),
            ("# of inputs", format!("{n_inputs}")),
            ("# of validation examples", validation),
            ("Max iterations", format!("{}", self.max_iter)),
            ("Tree depth", format!("{}", self.tree_depth)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) -> Result<()> {
        let (n_rows, n_inputs) = self.train.shape();
        checker::table_shape(n_rows, n_inputs);

        let tables = self.tables();
        for table in &tables {
            self.task.check(table)?;
            self.arena.validate(table)?;
        }

        let kind = self.task.ensemble_kind();
        let root = self.arena.sequence(kind);
        for table in &tables {
            let (n, _) = table.shape();
            table.cache_node(&self.arena, root, kind.create_empty_outputs(n));
        }

        let objective = self.task.new_objective(self.train);
        self.initial_weights = objective.weights().to_vec();
        checker::simplex_condition(&self.initial_weights);

        self.objective = Some(objective);
        self.root = Some(root);
        self.reports.clear();
        self.terminated = usize::MAX;
        Ok(())
    }


    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner + ?Sized,
    {
        if self.max_iter < iteration {
            self.terminated = self.max_iter;
            return Ok(ControlFlow::Break(self.max_iter));
        }

        let root = self.root.ok_or(Error::Incomplete("the ensemble"))?;
        let tables = self.tables();
        let objective = self.objective.as_mut()
            .ok_or(Error::Incomplete("the weak objective"))?;

        // Learn one contribution on the whole training table.
        let indices = self.train.all_indices();
        let (contribution, edge) = learn_contribution(
            &mut self.arena,
            root,
            &self.task,
            weak_learner,
            self.train,
            &indices,
            &mut *objective,
            self.tree_depth,
        )?
            .ok_or(Error::WeakLearnerFailed)?;

        // Append it. The cached aggregates are patched in place.
        self.arena.push_node(root, contribution, &tables)?;

        // Refresh the weights.
        let scores = ensemble_scores(&self.arena, root, self.train)?;
        let margins = self.task.margins(self.train, &scores);
        let reweighting = task::reweight(&self.initial_weights, &margins)?;
        objective.set_weights(reweighting.weights);

        let train_error = self.task.training_error(self.train, &scores);
        let validation_error = match self.validation {
            Some(table) => {
                let scores = ensemble_scores(&self.arena, root, table)?;
                Some(self.task.training_error(table, &scores))
            },
            None => None,
        };

        let report = IterationReport {
            iteration,
            edge,
            loss: reweighting.loss,
            log_loss: reweighting.log_loss,
            train_error,
            validation_error,
            contribution: self.verbose.then(|| self.arena.display(contribution)),
        };

        let stop = reweighting.loss == 0.0
            || self.stop_criterion.as_ref()
                .is_some_and(|criterion| criterion(&report));
        self.reports.push(report);

        if stop {
            self.terminated = iteration;
            return Ok(ControlFlow::Break(iteration));
        }
        Ok(ControlFlow::Continue(()))
    }


    fn postprocess(&mut self) -> Result<Self::Output> {
        let root = self.root.ok_or(Error::Incomplete("the ensemble"))?;
        Ok(Model::new(self.arena.clone(), root, self.task.task()))
    }
}


impl<T: BoostingTask> Research for WeightBoosting<'_, T> {
    fn last_report(&self) -> Option<&IterationReport> {
        self.reports.last()
    }
}


/// Returns the aggregate of the ensemble over every row of `table`.
fn ensemble_scores(
    arena: &ExpressionArena,
    root: ExprId,
    table: &DataTable,
) -> Result<Arc<Column>>
{
    match table.get_samples(arena, root) {
        Some(scores) => Ok(scores),
        None => {
            let scores = arena.compute(root, table, &table.all_indices())?;
            Ok(Arc::new(scores.to_column()))
        },
    }
}


/// Learns a contribution over `indices`.
/// Returns the contribution and the objective of its weak node,
/// or `None` if the weak learner finds no candidate.
#[allow(clippy::too_many_arguments)]
fn learn_contribution<T, W>(
    arena: &mut ExpressionArena,
    root: ExprId,
    task: &T,
    weak_learner: &W,
    table: &DataTable,
    indices: &Arc<IndexSet>,
    objective: &mut T::Objective,
    depth: usize,
) -> Result<Option<(ExprId, f64)>>
    where T: BoostingTask,
          W: WeakLearner + ?Sized,
{
    let candidate = weak_learner.learn(
        arena, Some(root), table, indices, &mut *objective
    )?;
    let Some(weak) = candidate.usable() else {
        return Ok(None);
    };
    let edge = candidate.objective;

    let predictions = arena.compute(weak, table, indices)?;
    let votes = task.compute_votes(&mut *objective, &predictions)?;
    let vote_type = task.vote_type();

    // A constant candidate sends every row to the same branch.
    let constant_code = match arena.expression(weak) {
        Expression::Constant(value) => Some(value.raw_boolean()),
        _ => None,
    };
    if let Some(code) = constant_code {
        let vote = votes.get(code).cloned().unwrap_or(Value::Missing);
        let contribution = arena.constant(vote, vote_type)?;
        return Ok(Some((contribution, edge)));
    }

    let mut parts = if depth > 1 {
        Some(dispatch_indices(&predictions))
    } else {
        None
    };

    let mut branches = [None; 3];
    for (code, branch) in branches.iter_mut().enumerate() {
        let code = code as u8;
        let part = parts.as_mut()
            .map(|parts| std::mem::take(&mut parts[code as usize]))
            .filter(|part| !part.is_empty() && part.len() < indices.len());

        if let Some(part) = part {
            let part = Arc::new(part);
            let sub = learn_contribution(
                arena, root, task, weak_learner, table, &part, &mut *objective, depth - 1
            )?;
            if let Some((sub, _)) = sub {
                *branch = Some(sub);
                continue;
            }
        }

        *branch = match votes.get(code) {
            Some(vote) => Some(arena.constant(vote.clone(), vote_type)?),
            None => None,
        };
    }

    let [failure, success, missing] = branches;
    let contribution = arena.test(weak, failure, success, missing)?;
    arena.add_importance(weak, edge);
    Ok(Some((contribution, edge)))
}
