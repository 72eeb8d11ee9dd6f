use rand::prelude::*;
use rand::rngs::StdRng;

use std::cell::RefCell;
use std::sync::Arc;

use crate::Result;
use crate::expression::{ExprId, ExpressionArena, Function, Type};
use crate::objective::WeakObjective;
use crate::table::{DataTable, IndexSet};

use super::core::{WeakCandidate, WeakLearner};


const DEFAULT_SEED: u64 = 1234;


/// A weak learner that scans a fixed set of candidate expressions.
///
/// - A boolean-like candidate is scored as is.
/// - A numeric candidate is scored at its best threshold `t`
///   and returned as the node `stump[t](candidate)`.
///
/// Candidates of other types are ignored.
/// Ties keep the candidate listed first.
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// let table = DataTable::from_csv("/path/to/file.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
/// let mut arena = ExpressionArena::new();
/// let inputs = arena.variables(&table);
///
/// // Score 3 randomly chosen inputs per call.
/// let weak_learner = StumpLearner::new(inputs)
///     .candidates_per_round(3)
///     .seed(777);
/// ```
pub struct StumpLearner {
    candidates: Vec<ExprId>,
    per_round: Option<usize>,
    rng: RefCell<StdRng>,
}


impl StumpLearner {
    /// Creates a weak learner over `candidates`.
    pub fn new(candidates: Vec<ExprId>) -> Self {
        Self {
            candidates,
            per_round: None,
            rng: RefCell::new(StdRng::seed_from_u64(DEFAULT_SEED)),
        }
    }


    /// Scores only `k` randomly chosen candidates per call.
    pub fn candidates_per_round(mut self, k: usize) -> Self {
        assert!(k > 0, "at least one candidate must be scored");
        self.per_round = Some(k);
        self
    }


    /// Sets the seed of the candidate sampling.
    pub fn seed(self, seed: u64) -> Self {
        self.rng.replace(StdRng::seed_from_u64(seed));
        self
    }


    fn round_candidates(&self) -> Vec<ExprId> {
        match self.per_round {
            Some(k) if k < self.candidates.len() => {
                let mut rng = self.rng.borrow_mut();
                self.candidates.choose_multiple(&mut *rng, k)
                    .copied()
                    .collect()
            },
            _ => self.candidates.clone(),
        }
    }
}


impl WeakLearner for StumpLearner {
    fn name(&self) -> &str {
        "Stump Learner"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let per_round = self.per_round
            .map(|k| k.to_string())
            .unwrap_or_else(|| "all".into());
        let info = Vec::from([
            ("# of candidates", format!("{}", self.candidates.len())),
            ("Scored per round", per_round),
        ]);
        Some(info)
    }


    fn learn(
        &self,
        arena: &mut ExpressionArena,
        _root: Option<ExprId>,
        table: &DataTable,
        indices: &Arc<IndexSet>,
        objective: &mut dyn WeakObjective,
    ) -> Result<WeakCandidate>
    {
        // (candidate, threshold if numeric, score)
        let mut best: Option<(ExprId, Option<f64>, f64)> = None;

        for candidate in self.round_candidates() {
            let ty = arena.type_of(arena.check_id(candidate)?);
            let (threshold, score) = match ty {
                Type::Boolean | Type::Probability => {
                    let values = arena.compute(candidate, table, indices)?;
                    (None, objective.compute(&values))
                },
                Type::Integer | Type::Double => {
                    let values = arena.compute(candidate, table, indices)?;
                    let (t, score) = objective.find_best_threshold(&values);
                    (Some(t), score)
                },
                _ => continue,
            };

            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((candidate, threshold, score));
            }
        }

        let Some((candidate, threshold, score)) = best else {
            return Ok(WeakCandidate::none());
        };
        let expression = match threshold {
            Some(threshold) => {
                arena.function(Function::Stump { threshold }, vec![candidate])?
            },
            None => candidate,
        };
        Ok(WeakCandidate::new(expression, score))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::expression::{Expression, Value};
    use crate::objective::BinaryClassificationObjective;
    use crate::table::Column;

    fn table() -> DataTable {
        DataTable::from_columns(vec![
            ("noise", Type::Double, Column::Double(vec![0.3, 0.1, 0.4, 0.2])),
            ("x", Type::Double, Column::Double(vec![1.0, 2.0, 3.0, 4.0])),
            ("flag", Type::Boolean, Column::Boolean(vec![0, 1, 0, 1])),
        ])
            .unwrap()
            .with_target(vec![-1.0, -1.0, 1.0, 1.0])
            .unwrap()
    }

    #[test]
    fn test_learn_stump_01() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let inputs = arena.variables(&table);
        let learner = StumpLearner::new(inputs.clone());

        let mut objective = BinaryClassificationObjective::new(
            table.target().to_vec()
        );
        let indices = table.all_indices();
        let candidate = learner.learn(
            &mut arena, None, &table, &indices, &mut objective
        ).unwrap();

        assert_eq!(candidate.objective, 1.0);
        let id = candidate.usable().unwrap();
        match arena.expression(id) {
            Expression::Function { function, arguments } => {
                assert_eq!(*function, Function::Stump { threshold: 2.5 });
                assert_eq!(arguments, &vec![inputs[1]]);
            },
            _ => panic!("expected a stump"),
        }
        assert_eq!(arena.evaluate(id, &table.row(3)).raw_boolean(), 1);
    }

    #[test]
    fn test_learn_boolean_candidate() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let inputs = arena.variables(&table);
        let learner = StumpLearner::new(vec![inputs[2]]);

        let mut objective = BinaryClassificationObjective::new(
            table.target().to_vec()
        );
        let n_nodes = arena.len();
        let candidate = learner.learn(
            &mut arena, None, &table, &table.all_indices(), &mut objective
        ).unwrap();

        assert_eq!(candidate.expression, Some(inputs[2]));
        assert_eq!(candidate.objective, 0.5);
        assert_eq!(arena.len(), n_nodes);
    }

    #[test]
    fn test_no_candidate() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let v = arena.constant(Value::vector(vec![1.0, 2.0]), Type::Vector(2))
            .unwrap();
        let learner = StumpLearner::new(vec![v]);

        let mut objective = BinaryClassificationObjective::new(
            table.target().to_vec()
        );
        let candidate = learner.learn(
            &mut arena, None, &table, &table.all_indices(), &mut objective
        ).unwrap();
        assert_eq!(candidate.usable(), None);
        assert_eq!(candidate.objective, f64::NEG_INFINITY);
    }

    #[test]
    fn test_foreign_candidate() {
        let table = table();
        let mut other = ExpressionArena::new();
        let inputs = other.variables(&table);
        let x = other.function(Function::Stump { threshold: 0.0 }, vec![inputs[1]])
            .unwrap();

        let mut arena = ExpressionArena::new();
        arena.variables(&table);
        let learner = StumpLearner::new(vec![x]);

        let mut objective = BinaryClassificationObjective::new(
            table.target().to_vec()
        );
        let result = learner.learn(
            &mut arena, None, &table, &table.all_indices(), &mut objective
        );
        assert!(matches!(result, Err(Error::NotAnExpression { .. })));
    }

    #[test]
    fn test_candidates_per_round() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let inputs = arena.variables(&table);
        let learner = StumpLearner::new(inputs.clone())
            .candidates_per_round(2)
            .seed(7);

        for _ in 0..5 {
            let chosen = learner.round_candidates();
            assert_eq!(chosen.len(), 2);
            assert!(chosen.iter().all(|c| inputs.contains(c)));
            assert_ne!(chosen[0], chosen[1]);
        }
    }
}
