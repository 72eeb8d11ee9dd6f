use rand::Rng;

use std::sync::Arc;

use crate::expression::{Type, Value};
use super::{Column, IndexSet};


/// Physical representation of a [`SampleVector`].
#[derive(Debug, Clone)]
pub enum Storage {
    /// The same value for every row.
    Constant(Value),
    /// A column aligned with the positions of the index set.
    Owned(Column),
    /// A shared full-table column addressed by row identifier.
    Cached(Arc<Column>),
}


/// The values of one expression over one index set.
/// Position `p` of the vector holds the value of row `indices.get(p)`,
/// whatever the representation.
#[derive(Debug, Clone)]
pub struct SampleVector {
    indices: Arc<IndexSet>,
    elements_type: Type,
    storage: Storage,
}


impl SampleVector {
    /// Construct a vector holding `value` for every row of `indices`.
    pub fn constant(indices: Arc<IndexSet>, elements_type: Type, value: Value)
        -> Self
    {
        let storage = Storage::Constant(value);
        Self { indices, elements_type, storage }
    }


    /// Construct a vector from a column aligned with `indices`.
    pub fn owned(indices: Arc<IndexSet>, elements_type: Type, column: Column)
        -> Self
    {
        assert_eq!(
            indices.len(), column.len(),
            "an owned column must have one value per index"
        );
        let storage = Storage::Owned(column);
        Self { indices, elements_type, storage }
    }


    /// Construct a view of `indices` over a full-table column.
    pub fn cached(
        indices: Arc<IndexSet>,
        elements_type: Type,
        column: Arc<Column>,
    ) -> Self
    {
        let storage = Storage::Cached(column);
        Self { indices, elements_type, storage }
    }


    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }


    /// Returns `true` if the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }


    /// Returns the index set of this vector.
    #[inline]
    pub fn indices(&self) -> &Arc<IndexSet> {
        &self.indices
    }


    /// Returns the type of the values.
    #[inline]
    pub fn element_type(&self) -> Type {
        self.elements_type
    }


    /// Returns the storage of this vector.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }


    /// Returns the constant value if this vector is constant.
    pub fn constant_value(&self) -> Option<&Value> {
        match &self.storage {
            Storage::Constant(value) => Some(value),
            _ => None,
        }
    }


    /// Returns the name of the representation.
    pub fn representation(&self) -> &'static str {
        match self.storage {
            Storage::Constant(_) => "constant",
            Storage::Owned(_) => "owned",
            Storage::Cached(_) => "cached",
        }
    }


    /// Returns the value at position `pos`.
    #[inline]
    pub fn value(&self, pos: usize) -> Value {
        match &self.storage {
            Storage::Constant(value) => value.clone(),
            Storage::Owned(column) => column.get(pos),
            Storage::Cached(column) => column.get(self.indices.get(pos)),
        }
    }


    /// Returns the ternary reading of position `pos`.
    #[inline]
    pub fn raw_boolean(&self, pos: usize) -> u8 {
        match &self.storage {
            Storage::Constant(value) => value.raw_boolean(),
            Storage::Owned(column) => column.raw_boolean(pos),
            Storage::Cached(column)
                => column.raw_boolean(self.indices.get(pos)),
        }
    }


    /// Returns position `pos` as a real number, `NaN` if missing.
    #[inline]
    pub fn raw_double(&self, pos: usize) -> f64 {
        match &self.storage {
            Storage::Constant(value) => value.raw_double(),
            Storage::Owned(column) => column.raw_double(pos),
            Storage::Cached(column)
                => column.raw_double(self.indices.get(pos)),
        }
    }


    /// Returns position `pos` as an integer, `None` if missing.
    #[inline]
    pub fn raw_integer(&self, pos: usize) -> Option<i64> {
        match &self.storage {
            Storage::Constant(value) => value.raw_integer(),
            Storage::Owned(column) => column.raw_integer(pos),
            Storage::Cached(column)
                => column.raw_integer(self.indices.get(pos)),
        }
    }


    /// Iterates over `(row, ternary value)` pairs.
    pub fn raw_booleans(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.indices.iter()
            .enumerate()
            .map(|(pos, row)| (row, self.raw_boolean(pos)))
    }


    /// Iterates over `(row, real value)` pairs.
    pub fn raw_doubles(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter()
            .enumerate()
            .map(|(pos, row)| (row, self.raw_double(pos)))
    }


    /// Materializes this vector into a column aligned with its index set.
    pub fn to_column(&self) -> Column {
        match &self.storage {
            Storage::Owned(column) => column.clone(),
            _ => {
                let n = self.len();
                let mut column = Column::with_capacity(self.elements_type, n);
                (0..n).for_each(|pos| column.push(&self.value(pos)));
                column
            },
        }
    }


    /// Returns the value at a uniformly random position,
    /// `None` for an empty vector.
    pub fn sample_element<R: Rng + ?Sized>(&self, rng: &mut R)
        -> Option<Value>
    {
        if self.is_empty() { return None; }
        let pos = rng.gen_range(0..self.len());
        Some(self.value(pos))
    }
}
