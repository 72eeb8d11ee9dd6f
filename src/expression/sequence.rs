//! Sequence nodes: appendable aggregates of child expressions.
use serde::{Serialize, Deserialize};

use crate::Result;
use crate::table::{Column, DataTable, SampleVector};
use super::{ExprId, ExpressionArena, SparseVector, Type, Value};


/// Aggregation rule of a sequence node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Running sum of real children. A missing child counts as `0`.
    Sum,
    /// Running mean of real children. A missing child counts as `0`.
    Mean,
    /// Element-wise sum of vector children. A missing child is skipped.
    VectorSum {
        /// Dimension of the children.
        labels: usize,
    },
    /// Sparse vector counting, for each integer `v >= 0` output by a
    /// child, how many children output `v`.
    SparseIndicator,
}


impl SequenceKind {
    /// Returns the type of the aggregate.
    pub fn output_type(&self) -> Type {
        match self {
            Self::Sum | Self::Mean => Type::Double,
            Self::VectorSum { labels } => Type::Vector(*labels),
            Self::SparseIndicator => Type::Sparse,
        }
    }


    /// Returns `true` if a child of type `ty` can be appended.
    pub fn accepts_child_type(&self, ty: Type) -> bool {
        match self {
            Self::Sum | Self::Mean => {
                ty.is_convertible_to_double() || ty == Type::Boolean
            },
            Self::VectorSum { labels } => ty == Type::Vector(*labels),
            Self::SparseIndicator => ty == Type::Integer,
        }
    }


    pub(crate) fn child_type_name(&self) -> String {
        match self {
            Self::Sum | Self::Mean => "numeric".into(),
            Self::VectorSum { labels } => Type::Vector(*labels).to_string(),
            Self::SparseIndicator => Type::Integer.to_string(),
        }
    }


    /// Returns the display name.
    pub fn node_name(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::VectorSum { .. } => "vsum",
            Self::SparseIndicator => "sparse",
        }
    }


    /// Aggregates the values of all children of one example.
    pub fn aggregate(&self, values: &[Value]) -> Value {
        match self {
            Self::Sum | Self::Mean => {
                let sum = values.iter()
                    .map(Value::raw_double)
                    .filter(|x| !x.is_nan())
                    .sum::<f64>();
                if *self == Self::Mean && !values.is_empty() {
                    Value::Double(sum / values.len() as f64)
                } else {
                    Value::Double(sum)
                }
            },
            Self::VectorSum { labels } => {
                let mut sum = vec![0.0; *labels];
                for value in values {
                    if let Value::Vector(x) = value {
                        sum.iter_mut().zip(x.iter()).for_each(|(s, x)| *s += x);
                    }
                }
                Value::vector(sum)
            },
            Self::SparseIndicator => {
                let mut sparse = SparseVector::new();
                values.iter()
                    .filter_map(Value::raw_integer)
                    .filter(|&v| v >= 0)
                    .for_each(|v| sparse.increment(v as usize, 1.0));
                Value::Sparse(sparse)
            },
        }
    }


    /// Allocates the empty aggregate of `n` examples.
    pub fn create_empty_outputs(&self, n: usize) -> Column {
        match self {
            Self::Sum | Self::Mean => Column::Double(vec![0.0; n]),
            Self::VectorSum { labels } => Column::filled(
                self.output_type(), n, &Value::vector(vec![0.0; *labels])
            ),
            Self::SparseIndicator => Column::Sparse(vec![Some(SparseVector::new()); n]),
        }
    }


    /// Folds the outputs of child `child_index` (0-based)
    /// into the aggregate. Position `p` of `values` updates row `p`
    /// of `outputs`.
    pub fn update_outputs(
        &self,
        outputs: &mut Column,
        values: &SampleVector,
        child_index: usize,
    )
    {
        assert_eq!(
            outputs.len(), values.len(),
            "the aggregate and the child outputs must have the same length"
        );
        match (self, outputs) {
            (Self::Sum, Column::Double(dest)) => {
                dest.iter_mut()
                    .enumerate()
                    .for_each(|(pos, d)| *d += zero_if_missing(values.raw_double(pos)));
            },
            (Self::Mean, Column::Double(dest)) => {
                let k = (child_index + 1) as f64;
                dest.iter_mut()
                    .enumerate()
                    .for_each(|(pos, d)| {
                        let v = zero_if_missing(values.raw_double(pos));
                        *d = (*d * (k - 1.0) + v) / k;
                    });
            },
            (Self::VectorSum { .. }, Column::Vector { dimension, values: dest, .. }) => {
                let dimension = *dimension;
                for pos in 0..values.len() {
                    if let Value::Vector(x) = values.value(pos) {
                        dest[pos * dimension..(pos + 1) * dimension]
                            .iter_mut()
                            .zip(x.iter())
                            .for_each(|(d, x)| *d += x);
                    }
                }
            },
            (Self::SparseIndicator, Column::Sparse(dest)) => {
                for (pos, d) in dest.iter_mut().enumerate() {
                    let Some(v) = values.raw_integer(pos) else { continue; };
                    if v >= 0 {
                        d.get_or_insert_with(SparseVector::new)
                            .increment(v as usize, 1.0);
                    }
                }
            },
            (kind, _) => {
                panic!("the aggregate column does not match sequence kind {kind:?}");
            },
        }
    }
}


#[inline(always)]
fn zero_if_missing(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x }
}


impl ExpressionArena {
    /// Appends `node` to `sequence` and brings the caches of `tables`
    /// up to date.
    ///
    /// In each table that caches `sequence`, the new child is computed
    /// over every row and folded into the cached aggregate.
    /// Every other cached expression that reads `sequence` is dropped.
    pub fn push_node(
        &mut self,
        sequence: ExprId,
        node: ExprId,
        tables: &[&DataTable],
    ) -> Result<()>
    {
        let kind = self.sequence_kind(sequence)?;
        let child_index = self.push_child(sequence, node)?;

        for table in tables {
            if table.is_cached(self, sequence) {
                let values = self.compute(node, table, &table.all_indices())?;
                table.update_cached(self, sequence, |outputs| {
                    kind.update_outputs(outputs, &values, child_index);
                });
            }
            table.invalidate_dependents(self, sequence);
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::IndexSet;
    use std::sync::Arc;

    fn doubles(values: Vec<f64>) -> SampleVector {
        let indices = Arc::new(IndexSet::all(values.len()));
        SampleVector::owned(indices, Type::Double, Column::Double(values))
    }

    #[test]
    fn test_running_mean_01() {
        let children = [
            vec![1.0, 4.0, 0.0],
            vec![2.0, f64::NAN, 3.0],
            vec![6.0, 2.0, 3.0],
        ];
        let kind = SequenceKind::Mean;
        let mut outputs = kind.create_empty_outputs(3);
        for (k, child) in children.iter().enumerate() {
            kind.update_outputs(&mut outputs, &doubles(child.clone()), k);
        }

        let expected = [3.0, 2.0, 2.0];
        let Column::Double(res) = outputs else { panic!("not a double column") };
        for (r, e) in res.iter().zip(expected) {
            assert!((r - e).abs() < 1e-12, "expected {e}, got {r}.");
        }
    }

    #[test]
    fn test_running_sum_01() {
        let kind = SequenceKind::Sum;
        let mut outputs = kind.create_empty_outputs(2);
        kind.update_outputs(&mut outputs, &doubles(vec![0.5, f64::NAN]), 0);
        kind.update_outputs(&mut outputs, &doubles(vec![0.25, 1.0]), 1);
        assert_eq!(outputs, Column::Double(vec![0.75, 1.0]));
    }

    #[test]
    fn test_vector_sum_01() {
        let kind = SequenceKind::VectorSum { labels: 2 };
        let mut outputs = kind.create_empty_outputs(2);
        let indices = Arc::new(IndexSet::all(2));
        let mut child = Column::with_capacity(Type::Vector(2), 2);
        child.push(&Value::vector(vec![1.0, -1.0]));
        child.push(&Value::Missing);
        let child = SampleVector::owned(indices, Type::Vector(2), child);

        kind.update_outputs(&mut outputs, &child, 0);
        kind.update_outputs(&mut outputs, &child, 1);
        assert_eq!(outputs.vector_row(0), Some(&[2.0, -2.0][..]));
        assert_eq!(outputs.vector_row(1), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn test_sparse_indicator_01() {
        let kind = SequenceKind::SparseIndicator;
        let mut outputs = kind.create_empty_outputs(2);
        let indices = Arc::new(IndexSet::all(2));
        let child = SampleVector::owned(
            indices, Type::Integer, Column::Integer(vec![Some(3), Some(-1)])
        );
        kind.update_outputs(&mut outputs, &child, 0);
        kind.update_outputs(&mut outputs, &child, 1);

        let Value::Sparse(row0) = outputs.get(0) else { panic!("not sparse") };
        let Value::Sparse(row1) = outputs.get(1) else { panic!("not sparse") };
        assert_eq!(row0.get(3), 2.0);
        assert!(row1.is_empty());
    }

    #[test]
    fn test_aggregate_matches_fold() {
        let values = [Value::Double(1.0), Value::Missing, Value::Double(2.5)];
        assert_eq!(SequenceKind::Sum.aggregate(&values), Value::Double(3.5));
        let mean = SequenceKind::Mean.aggregate(&values).raw_double();
        assert!((mean - 3.5 / 3.0).abs() < 1e-12);
    }
}
