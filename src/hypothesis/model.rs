use serde::{Serialize, Deserialize};

use crate::{Result, Task};
use crate::expression::{ExprId, ExpressionArena, Value};
use crate::table::{DataTable, SampleVector};

use super::Classifier;


/// A boosted ensemble: a sequence node and the arena that owns it.
/// You can read/write this struct by `Serde` trait.
///
/// Row-wise queries ([`Classifier::confidence`], [`Model::evaluate`])
/// walk the tree once per example;
/// table-wide queries ([`Model::scores`], [`Classifier::confidence_all`])
/// use the vectorized evaluator.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Model {
    arena: ExpressionArena,
    root: ExprId,
    task: Task,
}


impl Model {
    /// Wraps the ensemble `root` of `arena`.
    pub fn new(arena: ExpressionArena, root: ExprId, task: Task) -> Self {
        Self { arena, root, task }
    }


    /// Returns the arena holding the ensemble.
    pub fn arena(&self) -> &ExpressionArena {
        &self.arena
    }


    /// Returns the ensemble node.
    pub fn root(&self) -> ExprId {
        self.root
    }


    /// Returns the task the ensemble was trained on.
    pub fn task(&self) -> Task {
        self.task
    }


    /// Returns the contributions of the ensemble, in insertion order.
    pub fn members(&self) -> &[ExprId] {
        self.arena.sequence_nodes(self.root).unwrap_or(&[])
    }


    /// Returns the number of contributions.
    pub fn n_members(&self) -> usize {
        self.members().len()
    }


    /// Evaluates the ensemble on one example.
    pub fn evaluate(&self, inputs: &[Value]) -> Value {
        self.arena.evaluate(self.root, inputs)
    }


    /// Computes the ensemble score of every row of `table`.
    pub fn scores(&self, table: &DataTable) -> Result<SampleVector> {
        self.arena.compute(self.root, table, &table.all_indices())
    }


    /// Returns the accumulated edge of the weak node `id`.
    pub fn importance(&self, id: ExprId) -> f64 {
        self.arena.importance(id)
    }


    /// Returns the textual form of the ensemble.
    pub fn display(&self) -> String {
        self.arena.display(self.root)
    }
}


impl Classifier for Model {
    fn confidence(&self, table: &DataTable, row: usize) -> Result<Value> {
        Ok(self.evaluate(&table.row(row)))
    }


    fn confidence_all(&self, table: &DataTable) -> Result<Vec<Value>> {
        let scores = self.scores(table)?;
        let confidences = (0..scores.len())
            .map(|pos| scores.value(pos))
            .collect();
        Ok(confidences)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Function, SequenceKind, Type};
    use crate::table::Column;

    fn stump_model() -> (Model, DataTable) {
        let table = DataTable::from_columns(vec![
            ("x", Type::Double, Column::Double(vec![0.0, 1.0, 2.0, 3.0])),
        ])
            .unwrap()
            .with_target(vec![-1.0, -1.0, 1.0, 1.0])
            .unwrap();

        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 1.5 }, vec![x])
            .unwrap();
        let pos = arena.constant(Value::Double(0.5), Type::Double).unwrap();
        let neg = arena.constant(Value::Double(-0.5), Type::Double).unwrap();
        let test = arena.test(stump, Some(neg), Some(pos), None).unwrap();
        let root = arena.sequence(SequenceKind::Sum);
        arena.push_child(root, test).unwrap();

        (Model::new(arena, root, Task::Binary), table)
    }

    #[test]
    fn test_model_predict_01() {
        let (model, table) = stump_model();
        assert_eq!(model.n_members(), 1);
        assert_eq!(model.predict_all(&table).unwrap(), vec![-1, -1, 1, 1]);
        assert_eq!(model.predict(&table, 2).unwrap(), 1);
    }

    #[test]
    fn test_model_row_and_table_agree() {
        let (model, table) = stump_model();
        let all = model.confidence_all(&table).unwrap();
        for (row, value) in all.iter().enumerate() {
            assert_eq!(&model.confidence(&table, row).unwrap(), value);
        }
    }
}
