//! Evaluation over an index set of a training table.
use std::sync::Arc;

use crate::{Error, Result};
use crate::table::{Column, DataTable, IndexSet, SampleVector};
use super::{Expression, ExprId, ExpressionArena, Function, Type};


impl ExpressionArena {
    /// Returns the values of node `id` over the rows `indices` of `table`.
    ///
    /// A node cached by `table` is returned as a view of the cached column.
    /// Otherwise the node is evaluated, and the result is cached
    /// when `indices` covers the whole table.
    pub fn compute(
        &self,
        id: ExprId,
        table: &DataTable,
        indices: &Arc<IndexSet>,
    ) -> Result<SampleVector>
    {
        let ty = self.type_of(self.check_id(id)?);
        match self.expression(id) {
            Expression::Variable { name, input } => {
                let (column_type, column) = table.input(*input)
                    .ok_or_else(|| Error::MissingColumn {
                        name: name.clone(), input: *input,
                    })?;
                if column_type != ty {
                    return Err(Error::TypeMismatch {
                        context: format!("variable `{name}`"),
                        expected: ty.to_string(),
                        found: column_type,
                    });
                }
                let column = Arc::clone(column);
                return Ok(SampleVector::cached(Arc::clone(indices), ty, column));
            },
            Expression::Constant(value) => {
                let value = value.clone();
                return Ok(SampleVector::constant(Arc::clone(indices), ty, value));
            },
            _ => {},
        }

        if let Some(column) = table.get_samples(self, id) {
            table.record_hit(self, id);
            return Ok(SampleVector::cached(Arc::clone(indices), ty, column));
        }

        table.record_computation(self, id);
        let samples = self.compute_samples(id, table, indices)?;

        let (n_rows, _) = table.shape();
        if indices.is_identity(n_rows) {
            table.cache_node(self, id, samples.to_column());
        }
        Ok(samples)
    }


    fn compute_samples(
        &self,
        id: ExprId,
        table: &DataTable,
        indices: &Arc<IndexSet>,
    ) -> Result<SampleVector>
    {
        let ty = self.type_of(id);
        match self.expression(id) {
            Expression::Function { function, arguments } => {
                self.compute_function(function, arguments, ty, table, indices)
            },
            Expression::Test { condition, failure, success, missing } => {
                let branches = [*failure, *success, *missing];
                self.compute_test(*condition, branches, ty, table, indices)
            },
            Expression::Sequence { kind, nodes } => {
                // Children first, then the left-to-right fold.
                let values = nodes.iter()
                    .map(|&node| self.compute(node, table, indices))
                    .collect::<Result<Vec<_>>>()?;
                let mut outputs = kind.create_empty_outputs(indices.len());
                values.iter()
                    .enumerate()
                    .for_each(|(k, v)| kind.update_outputs(&mut outputs, v, k));
                Ok(SampleVector::owned(Arc::clone(indices), ty, outputs))
            },
            Expression::Variable { .. } | Expression::Constant(_) => {
                self.compute(id, table, indices)
            },
        }
    }


    fn compute_function(
        &self,
        function: &Function,
        arguments: &[ExprId],
        ty: Type,
        table: &DataTable,
        indices: &Arc<IndexSet>,
    ) -> Result<SampleVector>
    {
        let n = indices.len();
        let mut outputs = Column::with_capacity(ty, n);
        match *arguments {
            [] => {
                let value = function.compute(&[]);
                return Ok(SampleVector::constant(Arc::clone(indices), ty, value));
            },
            [a] => {
                let a = self.compute(a, table, indices)?;
                match (function, &mut outputs) {
                    (Function::Stump { threshold }, Column::Boolean(out)) => {
                        out.extend((0..n).map(|pos| {
                            let x = a.raw_double(pos);
                            if x.is_nan() { super::MISSING } else { (x >= *threshold) as u8 }
                        }));
                    },
                    (_, outputs) => {
                        for pos in 0..n {
                            let value = a.value(pos);
                            outputs.push(&function.compute(std::slice::from_ref(&value)));
                        }
                    },
                }
            },
            [a, b] => {
                let a = self.compute(a, table, indices)?;
                let b = self.compute(b, table, indices)?;
                for pos in 0..n {
                    outputs.push(&function.compute(&[a.value(pos), b.value(pos)]));
                }
            },
            ref arguments => {
                let values = arguments.iter()
                    .map(|&arg| self.compute(arg, table, indices))
                    .collect::<Result<Vec<_>>>()?;
                for pos in 0..n {
                    let row = values.iter()
                        .map(|v| v.value(pos))
                        .collect::<Vec<_>>();
                    outputs.push(&function.compute(&row));
                }
            },
        }
        Ok(SampleVector::owned(Arc::clone(indices), ty, outputs))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{SequenceKind, Value};

    fn table() -> DataTable {
        DataTable::from_columns(vec![
            ("x", Type::Double, Column::Double(vec![0.0, 1.0, 2.0, f64::NAN])),
            ("y", Type::Double, Column::Double(vec![1.0, 1.0, -1.0, 3.0])),
        ]).unwrap()
    }

    #[test]
    fn test_compute_function_01() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let vars = arena.variables(&table);
        let add = arena.function(Function::Add, vars.clone()).unwrap();
        let stump = arena.function(Function::Stump { threshold: 1.0 }, vec![vars[0]]).unwrap();

        let indices = table.all_indices();
        let sv = arena.compute(add, &table, &indices).unwrap();
        assert_eq!(sv.value(0), Value::Double(1.0));
        assert_eq!(sv.value(1), Value::Double(2.0));
        assert_eq!(sv.value(2), Value::Double(1.0));
        assert_eq!(sv.value(3), Value::Missing);

        let sv = arena.compute(stump, &table, &indices).unwrap();
        assert_eq!(sv.to_column(), Column::Boolean(vec![0, 1, 1, 2]));
    }

    #[test]
    fn test_cache_on_full_index_set() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let vars = arena.variables(&table);
        let stump = arena.function(Function::Stump { threshold: 1.0 }, vec![vars[0]]).unwrap();

        let subset = Arc::new([2, 0].into_iter().collect::<IndexSet>());
        let sv = arena.compute(stump, &table, &subset).unwrap();
        assert_eq!(sv.to_column(), Column::Boolean(vec![1, 0]));
        assert!(!table.is_cached(&arena, stump));
        assert_eq!(table.computation_count(&arena, stump), 1);

        let all = table.all_indices();
        arena.compute(stump, &table, &all).unwrap();
        assert!(table.is_cached(&arena, stump));
        assert_eq!(table.computation_count(&arena, stump), 2);

        let sv = arena.compute(stump, &table, &subset).unwrap();
        assert_eq!(sv.representation(), "cached");
        assert_eq!(sv.to_column(), Column::Boolean(vec![1, 0]));
        assert_eq!(table.cache_hit_count(&arena, stump), 1);
        assert_eq!(table.computation_count(&arena, stump), 2);
    }

    #[test]
    fn test_missing_column() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let z = arena.variable("z", 5, Type::Double);
        let res = arena.compute(z, &table, &table.all_indices());
        assert!(matches!(res, Err(Error::MissingColumn { input: 5, .. })));

        let b = arena.variable("x", 0, Type::Boolean);
        let res = arena.compute(b, &table, &table.all_indices());
        assert!(matches!(res, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_compute_sequence_01() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let vars = arena.variables(&table);
        let seq = arena.sequence(SequenceKind::Mean);
        arena.push_child(seq, vars[0]).unwrap();
        arena.push_child(seq, vars[1]).unwrap();

        let sv = arena.compute(seq, &table, &table.all_indices()).unwrap();
        let expected = [0.5, 1.0, 0.5, 1.5];
        for (pos, e) in expected.into_iter().enumerate() {
            assert_eq!(sv.value(pos), Value::Double(e));
        }
    }
}
