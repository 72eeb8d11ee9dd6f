//! Types and values flowing through expressions.
use serde::{Serialize, Deserialize};
use std::fmt;
use std::sync::Arc;


/// Raw ternary code for a failed test / `false`.
pub const FAILURE: u8 = 0;
/// Raw ternary code for a passed test / `true`.
pub const SUCCESS: u8 = 1;
/// Raw ternary code for a missing value.
pub const MISSING: u8 = 2;


/// The type of an expression.
/// A node's type is fixed when the node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// `true` / `false`.
    Boolean,
    /// Signed integers.
    Integer,
    /// Real numbers.
    Double,
    /// Real numbers in `[0, 1]`, read as `true` above `0.5`.
    Probability,
    /// Dense real vectors of the given dimension.
    Vector(usize),
    /// Sparse real vectors indexed by non-negative integers.
    Sparse,
}


impl Type {
    /// Returns `true` if values of this type can be read as a `f64`.
    #[inline]
    pub fn is_convertible_to_double(&self) -> bool {
        matches!(self, Self::Integer | Self::Double | Self::Probability)
    }


    /// Returns `true` if values of this type are read as a ternary outcome
    /// without thresholding.
    #[inline]
    pub fn is_boolean_like(&self) -> bool {
        matches!(self, Self::Boolean | Self::Probability)
    }
}


impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Double => write!(f, "double"),
            Self::Probability => write!(f, "probability"),
            Self::Vector(n) => write!(f, "vector[{n}]"),
            Self::Sparse => write!(f, "sparse"),
        }
    }
}


/// A sparse vector stored as `(index, value)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}


impl SparseVector {
    /// Construct an empty sparse vector.
    pub fn new() -> Self {
        Self::default()
    }


    /// Adds `delta` to the entry at `index`.
    pub fn increment(&mut self, index: usize, delta: f64) {
        match self.entries.binary_search_by(|(i, _)| i.cmp(&index)) {
            Ok(pos) => { self.entries[pos].1 += delta; },
            Err(pos) => { self.entries.insert(pos, (index, delta)); },
        }
    }


    /// Returns the value at `index`, `0` if absent.
    pub fn get(&self, index: usize) -> f64 {
        self.entries.binary_search_by(|(i, _)| i.cmp(&index))
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }


    /// Returns the non-zero entries.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries[..]
    }


    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }


    /// Returns `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


/// A single typed value. `Missing` stands for an undefined output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Undefined value.
    Missing,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Real value. Never NaN: use [`Value::double`] to build one.
    Double(f64),
    /// Dense real vector.
    Vector(Arc<[f64]>),
    /// Sparse real vector.
    Sparse(SparseVector),
}


impl Value {
    /// Builds a real value, mapping NaN to `Missing`.
    #[inline]
    pub fn double(x: f64) -> Self {
        if x.is_nan() { Self::Missing } else { Self::Double(x) }
    }


    /// Builds a dense vector value.
    pub fn vector<T: Into<Arc<[f64]>>>(values: T) -> Self {
        Self::Vector(values.into())
    }


    /// Returns `true` for `Value::Missing`.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }


    /// Returns `true` if this value can be stored in a node of type `ty`.
    pub fn conforms_to(&self, ty: Type) -> bool {
        match (self, ty) {
            (Self::Missing, _) => true,
            (Self::Boolean(_), Type::Boolean) => true,
            (Self::Integer(_), Type::Integer) => true,
            (Self::Double(_), Type::Double) => true,
            (Self::Double(p), Type::Probability) => (0.0..=1.0).contains(p),
            (Self::Vector(v), Type::Vector(n)) => v.len() == n,
            (Self::Sparse(_), Type::Sparse) => true,
            _ => false,
        }
    }


    /// Returns the natural type of this value, `None` for `Missing`.
    pub fn natural_type(&self) -> Option<Type> {
        match self {
            Self::Missing => None,
            Self::Boolean(_) => Some(Type::Boolean),
            Self::Integer(_) => Some(Type::Integer),
            Self::Double(_) => Some(Type::Double),
            Self::Vector(v) => Some(Type::Vector(v.len())),
            Self::Sparse(_) => Some(Type::Sparse),
        }
    }


    /// Returns the ternary reading of this value:
    /// [`FAILURE`], [`SUCCESS`] or [`MISSING`].
    #[inline]
    pub fn raw_boolean(&self) -> u8 {
        match self {
            Self::Missing => MISSING,
            Self::Boolean(b) => *b as u8,
            Self::Integer(i) => (*i != 0) as u8,
            Self::Double(x) => (*x > 0.5) as u8,
            Self::Vector(_) | Self::Sparse(_) => SUCCESS,
        }
    }


    /// Returns this value as a real number, NaN if missing or not numeric.
    #[inline]
    pub fn raw_double(&self) -> f64 {
        match self {
            Self::Boolean(b) => if *b { 1.0 } else { 0.0 },
            Self::Integer(i) => *i as f64,
            Self::Double(x) => *x,
            _ => f64::NAN,
        }
    }


    /// Returns this value as an integer, `None` if missing or not integral.
    #[inline]
    pub fn raw_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }
}


impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Double(x) => write!(f, "{x:.4}"),
            Self::Vector(v) => {
                let line = v.iter()
                    .map(|x| format!("{x:.4}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{line}]")
            },
            Self::Sparse(s) => {
                let line = s.entries()
                    .iter()
                    .map(|(i, x)| format!("{i}:{x:.4}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{line}}}")
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_boolean_01() {
        assert_eq!(Value::Boolean(true).raw_boolean(), SUCCESS);
        assert_eq!(Value::Boolean(false).raw_boolean(), FAILURE);
        assert_eq!(Value::Missing.raw_boolean(), MISSING);
        assert_eq!(Value::Double(0.7).raw_boolean(), SUCCESS);
        assert_eq!(Value::Double(0.2).raw_boolean(), FAILURE);
    }

    #[test]
    fn test_double_nan_is_missing() {
        assert!(Value::double(f64::NAN).is_missing());
        assert_eq!(Value::double(1.5), Value::Double(1.5));
    }

    #[test]
    fn test_conforms_to_01() {
        assert!(Value::Missing.conforms_to(Type::Vector(3)));
        assert!(Value::vector(vec![1.0, 2.0]).conforms_to(Type::Vector(2)));
        assert!(!Value::vector(vec![1.0, 2.0]).conforms_to(Type::Vector(3)));
        assert!(!Value::Double(1.5).conforms_to(Type::Probability));
        assert!(!Value::Integer(1).conforms_to(Type::Double));
    }

    #[test]
    fn test_sparse_increment_01() {
        let mut s = SparseVector::new();
        s.increment(3, 1.0);
        s.increment(1, 1.0);
        s.increment(3, 1.0);
        assert_eq!(s.entries(), &[(1, 1.0), (3, 2.0)]);
        assert_eq!(s.get(3), 2.0);
        assert_eq!(s.get(0), 0.0);
    }
}
