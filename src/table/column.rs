use fixedbitset::FixedBitSet;

use crate::expression::{
    Type,
    Value,
    SparseVector,
    FAILURE,
    SUCCESS,
    MISSING,
};


/// Physical storage of one typed column.
/// Each variant stores missing values in its own way.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Raw ternary values: `0`, `1` or `2` (missing).
    Boolean(Vec<u8>),
    /// Integers. `None` is missing.
    Integer(Vec<Option<i64>>),
    /// Reals. `NaN` is missing.
    Double(Vec<f64>),
    /// Dense vectors in one row-major buffer.
    /// A row is missing if its bit in `present` is unset.
    Vector {
        /// Dimension of each row.
        dimension: usize,
        /// `len * dimension` values.
        values: Vec<f64>,
        /// Presence mask.
        present: FixedBitSet,
    },
    /// Sparse vectors. `None` is missing.
    Sparse(Vec<Option<SparseVector>>),
}


impl Column {
    /// Construct an empty column for values of type `ty`.
    pub fn with_capacity(ty: Type, capacity: usize) -> Self {
        match ty {
            Type::Boolean => Self::Boolean(Vec::with_capacity(capacity)),
            Type::Integer => Self::Integer(Vec::with_capacity(capacity)),
            Type::Double | Type::Probability
                => Self::Double(Vec::with_capacity(capacity)),
            Type::Vector(dimension) => {
                assert!(dimension > 0, "vector columns need a positive dimension");
                Self::Vector {
                    dimension,
                    values: Vec::with_capacity(capacity * dimension),
                    present: FixedBitSet::with_capacity(capacity),
                }
            },
            Type::Sparse => Self::Sparse(Vec::with_capacity(capacity)),
        }
    }


    /// Construct a column of `len` copies of `value`.
    pub fn filled(ty: Type, len: usize, value: &Value) -> Self {
        let mut column = Self::with_capacity(ty, len);
        (0..len).for_each(|_| column.push(value));
        column
    }


    /// Returns `true` if this column can back an expression of type `ty`.
    pub fn conforms_to(&self, ty: Type) -> bool {
        match (self, ty) {
            (Self::Boolean(_), Type::Boolean) => true,
            (Self::Integer(_), Type::Integer) => true,
            (Self::Double(_), Type::Double | Type::Probability) => true,
            (Self::Vector { dimension, .. }, Type::Vector(d)) => *dimension == d,
            (Self::Sparse(_), Type::Sparse) => true,
            _ => false,
        }
    }


    /// Appends `value` at the end of this column.
    /// A value that does not fit the column is stored as missing.
    pub fn push(&mut self, value: &Value) {
        match self {
            Self::Boolean(v) => v.push(value.raw_boolean()),
            Self::Integer(v) => v.push(value.raw_integer()),
            Self::Double(v) => v.push(value.raw_double()),
            Self::Vector { dimension, values, present } => {
                let row = values.len() / *dimension;
                if row >= present.len() { present.grow(row + 1); }
                match value {
                    Value::Vector(x) if x.len() == *dimension => {
                        values.extend_from_slice(x);
                        present.insert(row);
                    },
                    _ => {
                        values.extend(std::iter::repeat(0.0).take(*dimension));
                    },
                }
            },
            Self::Sparse(v) => match value {
                Value::Sparse(s) => v.push(Some(s.clone())),
                _ => v.push(None),
            },
        }
    }


    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Vector { dimension, values, .. } => values.len() / dimension,
            Self::Sparse(v) => v.len(),
        }
    }


    /// Returns `true` if this column has no row.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns the value at row `i`.
    pub fn get(&self, i: usize) -> Value {
        match self {
            Self::Boolean(v) => match v[i] {
                FAILURE => Value::Boolean(false),
                SUCCESS => Value::Boolean(true),
                _ => Value::Missing,
            },
            Self::Integer(v) => v[i].map_or(Value::Missing, Value::Integer),
            Self::Double(v) => Value::double(v[i]),
            Self::Vector { .. } => self.vector_row(i)
                .map_or(Value::Missing, |x| Value::vector(x)),
            Self::Sparse(v) => v[i].clone()
                .map_or(Value::Missing, Value::Sparse),
        }
    }


    /// Returns the ternary reading of row `i`.
    #[inline]
    pub fn raw_boolean(&self, i: usize) -> u8 {
        match self {
            Self::Boolean(v) => v[i],
            Self::Integer(v) => v[i].map_or(MISSING, |x| (x != 0) as u8),
            Self::Double(v) => {
                let x = v[i];
                if x.is_nan() { MISSING } else { (x > 0.5) as u8 }
            },
            Self::Vector { present, .. } => {
                if present.contains(i) { SUCCESS } else { MISSING }
            },
            Self::Sparse(v) => {
                if v[i].is_some() { SUCCESS } else { MISSING }
            },
        }
    }


    /// Returns row `i` as a real number, `NaN` if missing.
    #[inline]
    pub fn raw_double(&self, i: usize) -> f64 {
        match self {
            Self::Boolean(v) => match v[i] {
                FAILURE => 0.0,
                SUCCESS => 1.0,
                _ => f64::NAN,
            },
            Self::Integer(v) => v[i].map_or(f64::NAN, |x| x as f64),
            Self::Double(v) => v[i],
            Self::Vector { .. } | Self::Sparse(_) => f64::NAN,
        }
    }


    /// Returns row `i` as an integer, `None` if missing.
    #[inline]
    pub fn raw_integer(&self, i: usize) -> Option<i64> {
        match self {
            Self::Integer(v) => v[i],
            Self::Boolean(v) => (v[i] != MISSING).then_some(v[i] as i64),
            _ => None,
        }
    }


    /// Returns row `i` of a vector column, `None` if missing.
    pub fn vector_row(&self, i: usize) -> Option<&[f64]> {
        match self {
            Self::Vector { dimension, values, present } => {
                present.contains(i)
                    .then(|| &values[i * dimension..(i + 1) * dimension])
            },
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_column_01() {
        let mut col = Column::with_capacity(Type::Double, 3);
        col.push(&Value::Double(0.25));
        col.push(&Value::Missing);
        col.push(&Value::Double(0.75));

        assert_eq!(col.len(), 3);
        assert_eq!(col.get(0), Value::Double(0.25));
        assert_eq!(col.get(1), Value::Missing);
        assert_eq!(col.raw_boolean(1), MISSING);
        assert_eq!(col.raw_boolean(2), SUCCESS);
        assert!(col.raw_double(1).is_nan());
    }

    #[test]
    fn test_vector_column_01() {
        let mut col = Column::with_capacity(Type::Vector(2), 0);
        col.push(&Value::vector(vec![1.0, 2.0]));
        col.push(&Value::Missing);
        col.push(&Value::vector(vec![3.0, 4.0]));

        assert_eq!(col.len(), 3);
        assert_eq!(col.vector_row(0), Some(&[1.0, 2.0][..]));
        assert_eq!(col.vector_row(1), None);
        assert_eq!(col.get(2), Value::vector(vec![3.0, 4.0]));
        assert_eq!(col.raw_boolean(1), MISSING);
    }

    #[test]
    fn test_filled_01() {
        let col = Column::filled(Type::Boolean, 4, &Value::Boolean(true));
        assert_eq!(col, Column::Boolean(vec![SUCCESS; 4]));
        assert!(col.conforms_to(Type::Boolean));
        assert!(!col.conforms_to(Type::Double));
    }
}
