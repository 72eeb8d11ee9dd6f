//! Exports the standard boosting algorithms and traits.
//!
pub use crate::booster::{
    // Booster trait
    Booster,


    // Binary classification --------------------
    AdaBoost,


    // Multi-class classification ---------------
    DiscreteAdaBoostMH,
    RealAdaBoostMH,
};


pub use crate::weak_learner::{
    // Weak Learner trait
    WeakLearner,
    WeakCandidate,

    StumpLearner,
};


pub use crate::objective::{
    WeakObjective,
    BinaryClassificationObjective,
    MultiLabelObjective,
};


pub use crate::table::{
    DataTable,
    IndexSet,
    SampleVector,
    Column,
};


pub use crate::expression::{
    ExprId,
    Expression,
    ExpressionArena,
    Function,
    SequenceKind,
    Type,
    Value,
};


pub use crate::hypothesis::{
    Classifier,
    Model,
};


pub use crate::research::{
    IterationReport,
    Logger,
    LoggerBuilder,
    Research,
};


pub use crate::common::Task;
pub use crate::error::{Error, Result};
