//! Typed expression trees.
//!
//! Every node lives in an [`ExpressionArena`] and is addressed
//! by an [`ExprId`]. A node can be evaluated on a single example
//! ([`ExpressionArena::evaluate`]) or over an index set of a
//! [`DataTable`](crate::table::DataTable) ([`ExpressionArena::compute`]).
//! Both evaluators give the same values.

mod value;
mod function;
mod arena;
mod scalar;
mod vectorized;
mod test_node;
mod sequence;

pub use value::{Type, Value, SparseVector, FAILURE, SUCCESS, MISSING};
pub use function::Function;
pub use arena::{ArenaId, ExprId, Expression, ExpressionArena, Node};
pub use test_node::dispatch_indices;
pub use sequence::SequenceKind;
