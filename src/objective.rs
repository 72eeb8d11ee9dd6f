//! Weak objectives.
//! A weak objective scores a candidate prediction column
//! under the current example weights,
//! and computes the leaf votes of a contribution.

mod weak_objective;
mod binary;
mod multi_label;

pub use weak_objective::WeakObjective;
pub use binary::BinaryClassificationObjective;
pub use multi_label::MultiLabelObjective;
