//! Provides the boosting algorithms.

pub mod core;

/// Defines what a weight-boosting algorithm needs to know about its task.
pub mod task;

mod weight_boosting;

// ------------------------------------------------
// Binary classification
pub mod adaboost;

// ------------------------------------------------
// Multi-class classification
pub mod adaboost_mh;


/// Booster trait
pub use self::core::Booster;

pub use self::task::{
    adaboost_vote,
    BoostingTask,
    Reweighting,
    Votes,
};

pub use self::weight_boosting::WeightBoosting;

pub use self::adaboost::{AdaBoost, AdaBoostTask};

pub use self::adaboost_mh::{
    DiscreteAdaBoostMH,
    DiscreteAdaBoostMHTask,
    RealAdaBoostMH,
    RealAdaBoostMHTask,
};
