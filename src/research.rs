//! This directory provides some features for research.
//! Measure the followings of boosting algorithm per iteration
//! - Running time
//! - Weak edge
//! - Reweighting loss
//! - Training / validation error

mod report;

/// Defines a logger that runs a booster.
pub mod logger;

/// Defines the builder of [`Logger`].
pub mod logger_builder;

pub use report::{IterationReport, Research};
pub use logger::Logger;
pub use logger_builder::LoggerBuilder;
