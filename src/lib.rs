#![warn(missing_docs)]

//!
//! A crate that boosts typed expression trees.
//!
//! A boosted model is an expression: a sequence node whose children
//! are *contributions*, test nodes that dispatch each example to
//! a constant vote according to the outcome of a weak expression.
//! Expressions are evaluated either on a single example or
//! over an index set of a column-oriented [`DataTable`],
//! which caches the outputs of the nodes it has seen
//! so that appending a contribution to an ensemble
//! only evaluates the new contribution.
//!
//! This crate includes the following boosting algorithms.
//!
//! - [`AdaBoost`]
//!     Binary classification with `+1` / `-1` labels.
//!
//! - [`DiscreteAdaBoostMH`] and [`RealAdaBoostMH`]
//!     Multi-class classification reduced to one binary problem
//!     per `(example, label)` pair.
//!     The discrete variant shares one vote magnitude over the labels,
//!     the real one learns a vote per label.
//!
//! # Example
//! ```no_run
//! use exprboost::prelude::*;
//!
//! let train = DataTable::from_csv("/path/to/file.csv", true)
//!     .unwrap()
//!     .set_target("class")
//!     .unwrap();
//!
//! let mut arena = ExpressionArena::new();
//! let inputs = arena.variables(&train);
//!
//! let mut booster = AdaBoost::init(&train, arena)
//!     .max_iterations(100);
//! let model = booster.run(&StumpLearner::new(inputs)).unwrap();
//!
//! let predictions = model.predict_all(&train).unwrap();
//! ```

pub mod error;
pub mod common;
pub mod table;
pub mod expression;
pub mod objective;
pub mod weak_learner;
pub mod booster;
pub mod hypothesis;
pub mod research;

pub mod prelude;


pub use error::{Error, Result};
pub use common::Task;

pub use table::{DataTable, IndexSet, SampleVector};
pub use expression::{ExprId, ExpressionArena, Type, Value};

pub use booster::{
    Booster,
    AdaBoost,
    DiscreteAdaBoostMH,
    RealAdaBoostMH,
};

pub use weak_learner::{WeakLearner, StumpLearner};
pub use objective::WeakObjective;
pub use hypothesis::{Classifier, Model};
pub use research::{Logger, LoggerBuilder, Research};
