use fixedbitset::FixedBitSet;

use std::ops::Range;


/// A duplicate-free set of row identifiers.
/// Rows are kept in insertion order;
/// the order carries no meaning beyond aligning sample vectors.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    indices: Vec<usize>,
    members: FixedBitSet,
}


impl IndexSet {
    /// Construct an empty index set.
    pub fn new() -> Self {
        Self::default()
    }


    /// Construct an empty index set
    /// with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            members: FixedBitSet::new(),
        }
    }


    /// Construct the index set `{0, 1, ..., n_rows - 1}`.
    pub fn all(n_rows: usize) -> Self {
        Self::range(0..n_rows)
    }


    /// Construct the index set holding every row of `range`.
    pub fn range(range: Range<usize>) -> Self {
        let mut members = FixedBitSet::with_capacity(range.end);
        members.insert_range(range.clone());
        let indices = range.collect::<Vec<_>>();
        Self { indices, members }
    }


    /// Appends `row` to this set.
    /// Appending a row that already belongs to the set
    /// is a programming error and panics.
    #[inline]
    pub fn append(&mut self, row: usize) {
        if row >= self.members.len() {
            let len = (row + 1).max(2 * self.members.len());
            self.members.grow(len);
        }
        let present = self.members.put(row);
        assert!(!present, "row {row} is already in the index set");
        self.indices.push(row);
    }


    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }


    /// Returns `true` if the set holds no row.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }


    /// Returns the row stored at position `pos`.
    #[inline]
    pub fn get(&self, pos: usize) -> usize {
        self.indices[pos]
    }


    /// Returns `true` if `row` belongs to the set.
    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        self.members.contains(row)
    }


    /// Returns `true` if the two sets share no row.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.members.is_disjoint(&other.members)
    }


    /// Returns the rows as a slice, in insertion order.
    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..]
    }


    /// Iterates over the rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }


    /// Returns `true` if the rows are exactly `0, 1, ..., n_rows - 1`
    /// in this order.
    pub fn is_identity(&self, n_rows: usize) -> bool {
        self.indices.len() == n_rows
            && self.indices.iter()
                .enumerate()
                .all(|(pos, &row)| pos == row)
    }
}


impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        iter.for_each(|row| set.append(row));
        set
    }
}


impl<'a> IntoIterator for &'a IndexSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter().copied()
    }
}
