//! Ternary dispatch of test nodes.
use std::sync::Arc;

use crate::Result;
use crate::table::{Column, DataTable, IndexSet, SampleVector};
use super::{Expression, ExprId, ExpressionArena, Type, Value};


/// Splits the index set of `condition` into the rows whose condition
/// is failure, success and missing, in this order.
/// Each part keeps the relative order of the parent set.
pub fn dispatch_indices(condition: &SampleVector) -> [IndexSet; 3] {
    let hint = condition.len() / 4;
    let mut parts = [
        IndexSet::with_capacity(hint),
        IndexSet::with_capacity(hint),
        IndexSet::with_capacity(hint),
    ];
    for (row, code) in condition.raw_booleans() {
        parts[code as usize].append(row);
    }
    parts
}


impl ExpressionArena {
    pub(super) fn compute_test(
        &self,
        condition: ExprId,
        branches: [Option<ExprId>; 3],
        ty: Type,
        table: &DataTable,
        indices: &Arc<IndexSet>,
    ) -> Result<SampleVector>
    {
        let condition = self.compute(condition, table, indices)?;
        let n = condition.len();

        if let Some(lookup) = self.constant_branches(&branches) {
            let mut outputs = Column::with_capacity(ty, n);
            (0..n).for_each(|pos| {
                outputs.push(&lookup[condition.raw_boolean(pos) as usize]);
            });
            return Ok(SampleVector::owned(Arc::clone(indices), ty, outputs));
        }

        let parts = dispatch_indices(&condition);
        let mut partials = Vec::with_capacity(3);
        for (part, branch) in parts.into_iter().zip(branches) {
            let part = Arc::new(part);
            let values = match branch {
                Some(branch) if !part.is_empty() => {
                    self.compute(branch, table, &part)?
                },
                _ => SampleVector::constant(part, ty, Value::Missing),
            };
            partials.push(values);
        }

        // Walk the condition once more and pull the next value
        // of the matching partial stream.
        let mut cursors = [0_usize; 3];
        let mut outputs = Column::with_capacity(ty, n);
        for pos in 0..n {
            let code = condition.raw_boolean(pos) as usize;
            outputs.push(&partials[code].value(cursors[code]));
            cursors[code] += 1;
        }
        for (cursor, partial) in cursors.iter().zip(&partials) {
            assert_eq!(
                *cursor, partial.len(),
                "a partial stream of a test node was not fully consumed"
            );
        }

        Ok(SampleVector::owned(Arc::clone(indices), ty, outputs))
    }


    /// Returns the three branch values when every branch is a constant.
    fn constant_branches(&self, branches: &[Option<ExprId>; 3])
        -> Option<[Value; 3]>
    {
        let value = |branch: Option<ExprId>| match self.expression(branch?) {
            Expression::Constant(value) => Some(value.clone()),
            _ => None,
        };
        Some([value(branches[0])?, value(branches[1])?, value(branches[2])?])
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Function, FAILURE, SUCCESS, MISSING};

    fn table() -> DataTable {
        let x = vec![0.3, f64::NAN, 0.9, 0.1, 0.7, f64::NAN, 0.5, 0.2];
        DataTable::from_columns(vec![
            ("x", Type::Double, Column::Double(x)),
        ]).unwrap()
    }

    #[test]
    fn test_dispatch_partition_01() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 0.5 }, vec![x]).unwrap();

        let indices = Arc::new([7, 6, 5, 4, 3, 1].into_iter().collect::<IndexSet>());
        let condition = arena.compute(stump, &table, &indices).unwrap();
        let [failure, success, missing] = dispatch_indices(&condition);

        assert_eq!(failure.as_slice(), &[7, 3]);
        assert_eq!(success.as_slice(), &[6, 4]);
        assert_eq!(missing.as_slice(), &[5, 1]);
        assert!(failure.is_disjoint(&success));
        assert!(failure.is_disjoint(&missing));
        assert!(success.is_disjoint(&missing));
        assert_eq!(failure.len() + success.len() + missing.len(), indices.len());
        assert_eq!(condition.raw_boolean(0), FAILURE);
        assert_eq!(condition.raw_boolean(1), SUCCESS);
        assert_eq!(condition.raw_boolean(2), MISSING);
    }

    #[test]
    fn test_fast_path_matches_general_path() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 0.5 }, vec![x]).unwrap();
        let neg = arena.constant(Value::Double(-2.0), Type::Double).unwrap();
        let pos = arena.constant(Value::Double(3.0), Type::Double).unwrap();
        let zero = arena.constant(Value::Double(0.0), Type::Double).unwrap();

        // All-constant branches take the lookup path.
        let fast = arena.test(stump, Some(neg), Some(pos), Some(zero)).unwrap();

        // A non-constant branch forces dispatch and interleaving.
        let two = arena.constant(Value::Double(2.0), Type::Double).unwrap();
        let minus_three = arena.constant(Value::Double(-3.0), Type::Double).unwrap();
        let neg_fn = arena.function(Function::Neg, vec![two]).unwrap();
        let pos_fn = arena.function(Function::Neg, vec![minus_three]).unwrap();
        let general = arena.test(stump, Some(neg_fn), Some(pos_fn), Some(zero)).unwrap();

        let indices = Arc::new([5, 0, 2, 7, 1, 4].into_iter().collect::<IndexSet>());
        let a = arena.compute(fast, &table, &indices).unwrap();
        let b = arena.compute(general, &table, &indices).unwrap();

        assert_eq!(a.to_column(), Column::Double(vec![0.0, -2.0, 3.0, -2.0, 0.0, 3.0]));
        assert_eq!(a.to_column(), b.to_column());
    }

    #[test]
    fn test_absent_branch_is_missing() {
        let table = table();
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 0.5 }, vec![x]).unwrap();
        let pos = arena.constant(Value::Double(1.0), Type::Double).unwrap();
        let test = arena.test(stump, None, Some(pos), None).unwrap();

        let indices = table.all_indices();
        let sv = arena.compute(test, &table, &indices).unwrap();
        let raws = (0..sv.len()).map(|p| sv.raw_double(p)).collect::<Vec<_>>();
        assert!(raws[0].is_nan());
        assert!(raws[1].is_nan());
        assert_eq!(raws[2], 1.0);
        assert_eq!(raws[6], 1.0);
    }
}
