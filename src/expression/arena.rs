use rand::Rng;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, Result};
use crate::table::DataTable;
use super::{Function, SequenceKind, Type, Value};


/// Stable handle of a node in an [`ExpressionArena`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
pub struct ExprId(pub(crate) usize);


impl ExprId {
    /// Returns the slot of this handle in its arena.
    pub fn index(&self) -> usize {
        self.0
    }
}


impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}


static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(0);


/// Identity of an [`ExpressionArena`], unique within the process.
///
/// Tables key their caches on it, so that two arenas
/// evaluated on one table never read each other's columns.
/// A clone or a deserialized arena gets a new identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u64);


impl ArenaId {
    fn fresh() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}


impl Default for ArenaId {
    fn default() -> Self {
        Self::fresh()
    }
}


/// The five kinds of expression nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    /// Reads input column `input`.
    Variable {
        /// Display name.
        name: String,
        /// Input column index.
        input: usize,
    },
    /// An immutable value.
    Constant(Value),
    /// A pure function of the argument nodes.
    Function {
        /// The applied function.
        function: Function,
        /// Arguments, evaluated left to right.
        arguments: Vec<ExprId>,
    },
    /// Ternary dispatch on `condition`.
    /// An absent branch has an undefined (missing) output.
    Test {
        /// Condition read as failure / success / missing.
        condition: ExprId,
        /// Branch taken on failure.
        failure: Option<ExprId>,
        /// Branch taken on success.
        success: Option<ExprId>,
        /// Branch taken on a missing condition.
        missing: Option<ExprId>,
    },
    /// Left-to-right aggregate of an appendable list of nodes.
    Sequence {
        /// Aggregation rule.
        kind: SequenceKind,
        /// Children in insertion order.
        nodes: Vec<ExprId>,
    },
}


/// An arena slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    expression: Expression,
    ty: Type,
    allocation_index: usize,
    importance: f64,
}


impl Node {
    /// Returns the expression stored in this node.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Returns the type of this node.
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Returns the creation rank of this node.
    pub fn allocation_index(&self) -> usize {
        self.allocation_index
    }

    /// Returns the accumulated importance of this node.
    pub fn importance(&self) -> f64 {
        self.importance
    }
}


/// Owns every expression node.
/// Nodes are only appended. Only sequences gain children after
/// construction, and a sequence never receives a node that reads it,
/// so the graph has no cycle.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpressionArena {
    #[serde(skip)]
    id: ArenaId,
    nodes: Vec<Node>,
    allocation_counter: usize,
}


impl Clone for ExpressionArena {
    fn clone(&self) -> Self {
        Self {
            id: ArenaId::fresh(),
            nodes: self.nodes.clone(),
            allocation_counter: self.allocation_counter,
        }
    }
}


impl ExpressionArena {
    /// Construct an empty arena.
    pub fn new() -> Self {
        Self::default()
    }


    /// Returns the identity of this arena.
    pub fn id(&self) -> ArenaId {
        self.id
    }


    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }


    /// Returns `true` if the arena holds no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }


    /// Returns the node `id`.
    #[inline]
    pub fn node(&self, id: ExprId) -> &Node {
        &self.nodes[id.0]
    }


    /// Returns the expression of node `id`.
    #[inline]
    pub fn expression(&self, id: ExprId) -> &Expression {
        &self.nodes[id.0].expression
    }


    /// Returns the type of node `id`.
    #[inline]
    pub fn type_of(&self, id: ExprId) -> Type {
        self.nodes[id.0].ty
    }


    /// Returns the importance of node `id`.
    pub fn importance(&self, id: ExprId) -> f64 {
        self.nodes[id.0].importance
    }


    fn push(&mut self, expression: Expression, ty: Type) -> ExprId {
        let id = ExprId(self.nodes.len());
        let allocation_index = self.allocation_counter;
        self.allocation_counter += 1;
        self.nodes.push(Node { expression, ty, allocation_index, importance: 0.0 });
        id
    }


    pub(crate) fn check_id(&self, id: ExprId) -> Result<ExprId> {
        if id.0 < self.nodes.len() {
            Ok(id)
        } else {
            Err(Error::NotAnExpression { id: id.0, expected: "a node of this arena" })
        }
    }


    /// Adds a reference to input column `input`.
    pub fn variable<S: Into<String>>(&mut self, name: S, input: usize, ty: Type)
        -> ExprId
    {
        let name = name.into();
        self.push(Expression::Variable { name, input }, ty)
    }


    /// Adds one variable per input column of `table`.
    pub fn variables(&mut self, table: &DataTable) -> Vec<ExprId> {
        let (_, n_inputs) = table.shape();
        (0..n_inputs).filter_map(|i| {
                let name = table.input_name(i)?.to_string();
                let (ty, _) = table.input(i)?;
                Some(self.variable(name, i, ty))
            })
            .collect()
    }


    /// Adds a constant of type `ty`.
    pub fn constant(&mut self, value: Value, ty: Type) -> Result<ExprId> {
        if !value.conforms_to(ty) {
            return Err(Error::TypeMismatch {
                context: format!("constant `{value}`"),
                expected: format!("a value of type {ty}"),
                found: value.natural_type().unwrap_or(ty),
            });
        }
        Ok(self.push(Expression::Constant(value), ty))
    }


    /// Adds the application of `function` to `arguments`.
    pub fn function(&mut self, function: Function, arguments: Vec<ExprId>)
        -> Result<ExprId>
    {
        let types = arguments.iter()
            .map(|&arg| self.check_id(arg).map(|arg| self.type_of(arg)))
            .collect::<Result<Vec<_>>>()?;
        let ty = function.output_type(&types)?;
        Ok(self.push(Expression::Function { function, arguments }, ty))
    }


    /// Adds a test node.
    /// The present branches must share one type, which is the node's type.
    pub fn test(
        &mut self,
        condition: ExprId,
        failure: Option<ExprId>,
        success: Option<ExprId>,
        missing: Option<ExprId>,
    ) -> Result<ExprId>
    {
        let condition_type = self.type_of(self.check_id(condition)?);
        if !(condition_type.is_boolean_like() || condition_type == Type::Integer) {
            return Err(Error::TypeMismatch {
                context: "test condition".into(),
                expected: "boolean".into(),
                found: condition_type,
            });
        }

        let mut ty = None;
        for branch in [failure, success, missing].into_iter().flatten() {
            let branch_type = self.type_of(self.check_id(branch)?);
            match ty {
                None => { ty = Some(branch_type); },
                Some(t) if t != branch_type => {
                    return Err(Error::TypeMismatch {
                        context: "test branch".into(),
                        expected: t.to_string(),
                        found: branch_type,
                    });
                },
                _ => {},
            }
        }
        let ty = ty.ok_or(Error::Incomplete("test branch"))?;

        let expression = Expression::Test { condition, failure, success, missing };
        Ok(self.push(expression, ty))
    }


    /// Adds an empty sequence.
    pub fn sequence(&mut self, kind: SequenceKind) -> ExprId {
        let ty = kind.output_type();
        self.push(Expression::Sequence { kind, nodes: Vec::new() }, ty)
    }


    /// Appends `node` to the children of `sequence`
    /// and returns the index of the new child.
    /// Caches are left untouched; see [`ExpressionArena::push_node`].
    pub fn push_child(&mut self, sequence: ExprId, node: ExprId)
        -> Result<usize>
    {
        self.check_id(node)?;
        let slot = self.check_id(sequence)?.0;
        if self.depends_on(node, sequence) {
            return Err(Error::NotAnExpression {
                id: node.0, expected: "a node independent of the sequence",
            });
        }
        let node_type = self.type_of(node);
        let Expression::Sequence { kind, nodes } = &mut self.nodes[slot].expression
        else {
            return Err(Error::NotAnExpression {
                id: sequence.0, expected: "a sequence",
            });
        };
        if !kind.accepts_child_type(node_type) {
            return Err(Error::TypeMismatch {
                context: format!("child of sequence {sequence}"),
                expected: kind.child_type_name(),
                found: node_type,
            });
        }
        nodes.push(node);
        Ok(nodes.len() - 1)
    }


    /// Returns the direct sub-nodes of `id`.
    pub fn children(&self, id: ExprId) -> Vec<ExprId> {
        match self.expression(id) {
            Expression::Variable { .. } | Expression::Constant(_) => Vec::new(),
            Expression::Function { arguments, .. } => arguments.clone(),
            Expression::Test { condition, failure, success, missing } => {
                std::iter::once(*condition)
                    .chain([*failure, *success, *missing].into_iter().flatten())
                    .collect()
            },
            Expression::Sequence { nodes, .. } => nodes.clone(),
        }
    }


    /// Returns the children of a sequence node.
    pub fn sequence_nodes(&self, id: ExprId) -> Result<&[ExprId]> {
        match self.expression(self.check_id(id)?) {
            Expression::Sequence { nodes, .. } => Ok(&nodes[..]),
            _ => Err(Error::NotAnExpression { id: id.0, expected: "a sequence" }),
        }
    }


    /// Returns the aggregation rule of a sequence node.
    pub fn sequence_kind(&self, id: ExprId) -> Result<SequenceKind> {
        match self.expression(self.check_id(id)?) {
            Expression::Sequence { kind, .. } => Ok(*kind),
            _ => Err(Error::NotAnExpression { id: id.0, expected: "a sequence" }),
        }
    }


    /// Checks every variable against the columns of `table`.
    pub fn validate(&self, table: &DataTable) -> Result<()> {
        for node in &self.nodes {
            if let Expression::Variable { name, input } = &node.expression {
                let (ty, _) = table.input(*input)
                    .ok_or_else(|| Error::MissingColumn {
                        name: name.clone(), input: *input,
                    })?;
                if ty != node.ty {
                    return Err(Error::TypeMismatch {
                        context: format!("variable `{name}`"),
                        expected: node.ty.to_string(),
                        found: ty,
                    });
                }
            }
        }
        Ok(())
    }


    /// Returns `true` if `id` is `target` or reads `target`.
    pub fn depends_on(&self, id: ExprId, target: ExprId) -> bool {
        if id == target { return true; }
        self.children(id)
            .into_iter()
            .any(|child| self.depends_on(child, target))
    }


    /// Returns the depth of the tree rooted at `id`. A leaf has depth `1`.
    pub fn depth(&self, id: ExprId) -> usize {
        1 + self.children(id)
            .into_iter()
            .map(|child| self.depth(child))
            .max()
            .unwrap_or(0)
    }


    /// Returns the number of nodes of the tree rooted at `id`,
    /// counting shared nodes once per occurrence.
    pub fn tree_size(&self, id: ExprId) -> usize {
        1 + self.children(id)
            .into_iter()
            .map(|child| self.tree_size(child))
            .sum::<usize>()
    }


    /// Returns the node at pre-order position `index`
    /// of the tree rooted at `root`.
    pub fn node_by_tree_index(&self, root: ExprId, index: usize)
        -> Option<ExprId>
    {
        if index == 0 { return Some(root); }
        let mut index = index - 1;
        for child in self.children(root) {
            let size = self.tree_size(child);
            if index < size {
                return self.node_by_tree_index(child, index);
            }
            index -= size;
        }
        None
    }


    /// Returns the depth of the first occurrence of `target`
    /// in the tree rooted at `root`. The root has depth `0`.
    pub fn node_depth(&self, root: ExprId, target: ExprId) -> Option<usize> {
        if root == target { return Some(0); }
        self.children(root)
            .into_iter()
            .find_map(|child| self.node_depth(child, target))
            .map(|depth| depth + 1)
    }


    fn preorder(&self, root: ExprId, out: &mut Vec<ExprId>) {
        out.push(root);
        for child in self.children(root) {
            self.preorder(child, out);
        }
    }


    /// Returns the nodes with at least one child, in pre-order.
    pub fn internal_nodes(&self, root: ExprId) -> Vec<ExprId> {
        let mut nodes = Vec::new();
        self.preorder(root, &mut nodes);
        nodes.retain(|&id| !self.children(id).is_empty());
        nodes
    }


    /// Returns the nodes without children, in pre-order.
    pub fn leaf_nodes(&self, root: ExprId) -> Vec<ExprId> {
        let mut nodes = Vec::new();
        self.preorder(root, &mut nodes);
        nodes.retain(|&id| self.children(id).is_empty());
        nodes
    }


    /// Draws a node of the tree rooted at `root`.
    /// With probability `function_selection_probability`
    /// the node is drawn among the internal nodes,
    /// otherwise among the leaves.
    pub fn sample_node<R: Rng + ?Sized>(
        &self,
        root: ExprId,
        rng: &mut R,
        function_selection_probability: f64,
    ) -> ExprId
    {
        let internal = self.internal_nodes(root);
        let pool = if !internal.is_empty()
            && rng.gen_bool(function_selection_probability.clamp(0.0, 1.0))
        {
            internal
        } else {
            self.leaf_nodes(root)
        };
        pool[rng.gen_range(0..pool.len())]
    }


    /// Draws a node of the tree rooted at `root` uniformly.
    pub fn sample_sub_node<R: Rng + ?Sized>(&self, root: ExprId, rng: &mut R)
        -> ExprId
    {
        let index = rng.gen_range(0..self.tree_size(root));
        self.node_by_tree_index(root, index).unwrap_or(root)
    }


    /// Adds `delta` to the importance of `id` and of all its sub-nodes.
    pub fn add_importance(&mut self, id: ExprId, delta: f64) {
        assert!(delta.is_finite(), "importance delta must be finite, got {delta}");
        self.nodes[id.0].importance += delta;
        for child in self.children(id) {
            self.add_importance(child, delta);
        }
    }


    /// Returns a textual form of the tree rooted at `id`.
    pub fn display(&self, id: ExprId) -> String {
        let branch = |branch: &Option<ExprId>| {
            branch.map_or_else(|| "-".to_string(), |b| self.display(b))
        };
        match self.expression(id) {
            Expression::Variable { name, .. } => name.clone(),
            Expression::Constant(value) => value.to_string(),
            Expression::Function { function, arguments } => {
                let args = arguments.iter()
                    .map(|&arg| self.display(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({args})", function.node_name())
            },
            Expression::Test { condition, failure, success, missing } => {
                format!(
                    "test({} ? {} : {} | {})",
                    self.display(*condition),
                    branch(success),
                    branch(failure),
                    branch(missing),
                )
            },
            Expression::Sequence { kind, nodes } => {
                format!("{}[{} nodes]", kind.node_name(), nodes.len())
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    // test(stump(x) ? 1 : -1 | 0)
    fn small_tree() -> (ExpressionArena, ExprId) {
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let stump = arena.function(Function::Stump { threshold: 0.5 }, vec![x]).unwrap();
        let pos = arena.constant(Value::Double(1.0), Type::Double).unwrap();
        let neg = arena.constant(Value::Double(-1.0), Type::Double).unwrap();
        let zero = arena.constant(Value::Double(0.0), Type::Double).unwrap();
        let test = arena.test(stump, Some(neg), Some(pos), Some(zero)).unwrap();
        (arena, test)
    }

    #[test]
    fn test_structure_01() {
        let (arena, test) = small_tree();
        assert_eq!(arena.depth(test), 3);
        assert_eq!(arena.tree_size(test), 6);
        assert_eq!(arena.internal_nodes(test).len(), 2);
        assert_eq!(arena.leaf_nodes(test).len(), 4);
        assert_eq!(arena.node_by_tree_index(test, 1), Some(ExprId(1)));
        assert_eq!(arena.node_by_tree_index(test, 2), Some(ExprId(0)));
        assert_eq!(arena.node_by_tree_index(test, 6), None);
        assert_eq!(arena.node_depth(test, ExprId(0)), Some(2));
        assert_eq!(arena.display(test), "test(stump[0.5](x) ? 1.0000 : -1.0000 | 0.0000)");
    }

    #[test]
    fn test_allocation_index_01() {
        let (arena, test) = small_tree();
        assert_eq!(arena.node(test).allocation_index(), 5);
        assert_eq!(arena.node(ExprId(0)).allocation_index(), 0);
    }

    #[test]
    fn test_depends_on_01() {
        let (arena, test) = small_tree();
        assert!(arena.depends_on(test, ExprId(0)));
        assert!(arena.depends_on(test, test));
        assert!(!arena.depends_on(ExprId(2), ExprId(0)));
    }

    #[test]
    fn test_add_importance_01() {
        let (mut arena, test) = small_tree();
        arena.add_importance(test, 0.25);
        arena.add_importance(ExprId(1), 0.5);
        assert_eq!(arena.importance(test), 0.25);
        assert_eq!(arena.importance(ExprId(1)), 0.75);
        assert_eq!(arena.importance(ExprId(0)), 0.75);
    }

    #[test]
    #[should_panic]
    fn test_add_importance_non_finite() {
        let (mut arena, test) = small_tree();
        arena.add_importance(test, f64::NAN);
    }

    #[test]
    fn test_type_errors_01() {
        let mut arena = ExpressionArena::new();
        let x = arena.variable("x", 0, Type::Double);
        let b = arena.variable("b", 1, Type::Boolean);
        let v = arena.constant(Value::vector(vec![1.0, 2.0]), Type::Vector(2)).unwrap();
        let d = arena.constant(Value::Double(1.0), Type::Double).unwrap();

        assert!(arena.test(x, Some(d), None, None).is_err());
        assert!(matches!(
            arena.test(b, Some(d), Some(v), None),
            Err(Error::TypeMismatch { found: Type::Vector(2), .. })
        ));
        assert!(matches!(
            arena.test(b, None, None, None),
            Err(Error::Incomplete(_))
        ));
        assert!(arena.constant(Value::Integer(3), Type::Double).is_err());
    }

    #[test]
    fn test_push_child_01() {
        let mut arena = ExpressionArena::new();
        let seq = arena.sequence(SequenceKind::Sum);
        let d = arena.constant(Value::Double(1.0), Type::Double).unwrap();
        let v = arena.constant(Value::vector(vec![1.0]), Type::Vector(1)).unwrap();

        assert_eq!(arena.push_child(seq, d).unwrap(), 0);
        assert_eq!(arena.push_child(seq, d).unwrap(), 1);
        assert!(arena.push_child(seq, v).is_err());
        assert!(arena.push_child(d, d).is_err());
        assert_eq!(arena.sequence_nodes(seq).unwrap(), &[d, d]);
    }

    #[test]
    fn test_sample_node_01() {
        let (arena, test) = small_tree();
        let mut rng = StdRng::seed_from_u64(7);
        let internal = arena.internal_nodes(test);
        let leaves = arena.leaf_nodes(test);
        for _ in 0..20 {
            let node = arena.sample_node(test, &mut rng, 1.0);
            assert!(internal.contains(&node));
            let node = arena.sample_node(test, &mut rng, 0.0);
            assert!(leaves.contains(&node));
            let node = arena.sample_sub_node(test, &mut rng);
            assert!(node <= test);
        }
    }
}
