//! The files in `weak_learner/` directory defines
//! `WeakLearner` trait and weak learners.

/// Provides WeakLearner trait.
pub mod core;

/// Defines the stump learner.
pub mod stump_learner;

pub use self::core::{WeakCandidate, WeakLearner};
pub use self::stump_learner::StumpLearner;
