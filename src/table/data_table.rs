use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{Error, Result};
use crate::expression::{ArenaId, ExprId, ExpressionArena, Type, Value};
use super::{Column, IndexSet};


/// Cache statistics of one expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of requests answered from the cache.
    pub hits: usize,
    /// Number of times the expression was evaluated.
    pub computations: usize,
}


/// A column-oriented training table.
///
/// The table holds typed input columns, a real-valued target
/// and a cache of full-table columns keyed by expression.
/// A cache key pairs the [`ArenaId`] of an [`ExpressionArena`]
/// with a node handle, so one table serves any number of arenas.
#[derive(Debug)]
pub struct DataTable {
    pub(super) names: Vec<String>,
    pub(super) inputs: Vec<(Type, Arc<Column>)>,
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) target: Vec<f64>,
    pub(super) n_rows: usize,
    pub(super) all_indices: Arc<IndexSet>,
    cache: RefCell<HashMap<(ArenaId, ExprId), Arc<Column>>>,
    stats: RefCell<HashMap<(ArenaId, ExprId), CacheStats>>,
}


impl DataTable {
    /// Construct an empty table with `n_rows` rows and no column.
    pub fn new(n_rows: usize) -> Self {
        Self {
            names: Vec::new(),
            inputs: Vec::new(),
            name_to_index: HashMap::new(),
            target: Vec::with_capacity(0),
            n_rows,
            all_indices: Arc::new(IndexSet::all(n_rows)),
            cache: RefCell::new(HashMap::new()),
            stats: RefCell::new(HashMap::new()),
        }
    }


    /// Construct a table from named, typed columns.
    /// The number of rows is the length of the first column.
    pub fn from_columns<S>(columns: Vec<(S, Type, Column)>) -> Result<Self>
        where S: Into<String>,
    {
        let n_rows = columns.first().map_or(0, |(_, _, col)| col.len());
        let mut table = Self::new(n_rows);
        for (name, ty, column) in columns {
            table.add_column(name, ty, column)?;
        }
        Ok(table)
    }


    /// Appends an input column.
    pub fn add_column<S>(&mut self, name: S, ty: Type, column: Column)
        -> Result<()>
        where S: Into<String>,
    {
        let name = name.into();
        if column.len() != self.n_rows {
            return Err(Error::Shape {
                name, expected: self.n_rows, found: column.len(),
            });
        }
        if !column.conforms_to(ty) {
            return Err(Error::TypeMismatch {
                context: format!("column `{name}`"),
                expected: "a column of the declared type".into(),
                found: ty,
            });
        }
        self.name_to_index.insert(name.clone(), self.inputs.len());
        self.names.push(name);
        self.inputs.push((ty, Arc::new(column)));
        Ok(())
    }


    /// Sets the target values.
    pub fn with_target(mut self, target: Vec<f64>) -> Result<Self> {
        if target.len() != self.n_rows {
            return Err(Error::Shape {
                name: "target".into(),
                expected: self.n_rows,
                found: target.len(),
            });
        }
        self.target = target;
        Ok(self)
    }


    /// Moves the input column named `name` to the target.
    /// The remaining input columns are renumbered.
    pub fn set_target<S: AsRef<str>>(mut self, name: S) -> Result<Self> {
        let name = name.as_ref();
        let index = *self.name_to_index.get(name)
            .ok_or_else(|| {
                Error::InvalidTarget(format!("no column named `{name}`"))
            })?;

        self.names.remove(index);
        let (_, column) = self.inputs.remove(index);

        let target = (0..self.n_rows)
            .map(|i| column.raw_double(i))
            .collect::<Vec<_>>();
        if let Some(i) = target.iter().position(|y| !y.is_finite()) {
            let message = format!("row {i} of `{name}` has no numeric label");
            return Err(Error::InvalidTarget(message));
        }
        self.target = target;

        self.name_to_index = self.names.iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Ok(self)
    }


    /// Returns the target values.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Returns `(n_rows, n_inputs)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.inputs.len())
    }


    /// Returns the index set of all rows.
    pub fn all_indices(&self) -> Arc<IndexSet> {
        Arc::clone(&self.all_indices)
    }


    /// Returns the type and column of input `index`.
    pub fn input(&self, index: usize) -> Option<(Type, &Arc<Column>)> {
        self.inputs.get(index).map(|(ty, col)| (*ty, col))
    }


    /// Returns the name of input `index`.
    pub fn input_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }


    /// Returns the index of the input named `name`.
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }


    /// Returns the input values of row `row`.
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.inputs.iter()
            .map(|(_, column)| column.get(row))
            .collect()
    }


    /// Returns the column of `node` of `arena` cached by this table, if any.
    pub fn get_samples(&self, arena: &ExpressionArena, node: ExprId)
        -> Option<Arc<Column>>
    {
        self.cache.borrow().get(&(arena.id(), node)).cloned()
    }


    /// Stores the full-table column of `node` of `arena`.
    pub fn cache_node(&self, arena: &ExpressionArena, node: ExprId, column: Column) {
        assert_eq!(
            column.len(), self.n_rows,
            "a cached column must cover every row"
        );
        self.cache.borrow_mut().insert((arena.id(), node), Arc::new(column));
    }


    /// Removes the cached column of `node` of `arena`.
    pub fn remove_cached(&self, arena: &ExpressionArena, node: ExprId)
        -> Option<Arc<Column>>
    {
        self.cache.borrow_mut().remove(&(arena.id(), node))
    }


    /// Updates the cached column of `node` in place.
    /// Returns `false` if `node` is not cached.
    pub(crate) fn update_cached<F>(
        &self,
        arena: &ExpressionArena,
        node: ExprId,
        update: F,
    ) -> bool
        where F: FnOnce(&mut Column),
    {
        let mut cache = self.cache.borrow_mut();
        match cache.get_mut(&(arena.id(), node)) {
            Some(column) => {
                update(Arc::make_mut(column));
                true
            },
            None => false,
        }
    }


    /// Drops every cached expression of `arena`,
    /// other than `node` itself, that reads `node`.
    /// Columns cached for other arenas are kept.
    pub fn invalidate_dependents(&self, arena: &ExpressionArena, node: ExprId) {
        let owner = arena.id();
        self.cache.borrow_mut()
            .retain(|&(key, id), _| {
                key != owner || id == node || !arena.depends_on(id, node)
            });
    }


    /// Returns `true` if `node` of `arena` is cached.
    pub fn is_cached(&self, arena: &ExpressionArena, node: ExprId) -> bool {
        self.cache.borrow().contains_key(&(arena.id(), node))
    }


    /// Returns the number of cached expressions, over every arena.
    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }


    pub(crate) fn record_hit(&self, arena: &ExpressionArena, node: ExprId) {
        self.stats.borrow_mut()
            .entry((arena.id(), node))
            .or_default()
            .hits += 1;
    }


    pub(crate) fn record_computation(&self, arena: &ExpressionArena, node: ExprId) {
        self.stats.borrow_mut()
            .entry((arena.id(), node))
            .or_default()
            .computations += 1;
    }


    /// Returns the cache statistics of `node` of `arena`.
    pub fn cache_stats(&self, arena: &ExpressionArena, node: ExprId) -> CacheStats {
        self.stats.borrow()
            .get(&(arena.id(), node))
            .copied()
            .unwrap_or_default()
    }


    /// Returns the number of cache hits of `node`.
    pub fn cache_hit_count(&self, arena: &ExpressionArena, node: ExprId) -> usize {
        self.cache_stats(arena, node).hits
    }


    /// Returns the number of evaluations of `node`.
    pub fn computation_count(&self, arena: &ExpressionArena, node: ExprId) -> usize {
        self.cache_stats(arena, node).computations
    }


    /// Checks that the target holds `±1` labels
    /// and that both labels occur.
    pub fn is_valid_binary_instance(&self) -> Result<()> {
        if self.target.len() != self.n_rows {
            return Err(Error::InvalidTarget("the target is not set".into()));
        }
        if let Some(y) = self.target.iter().find(|y| y.abs() != 1.0) {
            let message = format!("binary labels must be +1 or -1, got {y}");
            return Err(Error::InvalidTarget(message));
        }
        let has_pos = self.target.iter().any(|&y| y > 0.0);
        let has_neg = self.target.iter().any(|&y| y < 0.0);
        if !has_pos || !has_neg {
            let message = "the target must hold both +1 and -1".into();
            return Err(Error::InvalidTarget(message));
        }
        Ok(())
    }


    /// Checks that the target holds class labels `0, 1, ..., n_class - 1`.
    pub fn is_valid_multi_class_instance(&self, n_class: usize) -> Result<()> {
        if n_class < 2 {
            let message = format!("need at least 2 classes, got {n_class}");
            return Err(Error::InvalidTarget(message));
        }
        if self.target.len() != self.n_rows {
            return Err(Error::InvalidTarget("the target is not set".into()));
        }
        let invalid = self.target.iter()
            .find(|&&y| y < 0.0 || y.fract() != 0.0 || y as usize >= n_class);
        if let Some(y) = invalid {
            let message = format!(
                "class labels must be integers in [0, {n_class}), got {y}"
            );
            return Err(Error::InvalidTarget(message));
        }
        Ok(())
    }
}
