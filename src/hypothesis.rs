//! The hypotheses boosting algorithms return.

mod classifier;
mod model;


pub use classifier::Classifier;
pub use model::Model;
