use crate::{Error, Result};
use super::Logger;
use super::logger::{DEFAULT_ROUND, DEFAULT_TIMELIMIT_MILLIS};


/// `LoggerBuilder` is a struct to construct `Logger.`
/// You need to specify the followings:
///
/// - Booster (Boosting algorithm),
/// - Weak Learner,
/// - Time limit for force quit (optional), and
/// - Round (The log text is shown for every **round** you specified).
///
/// # Example
/// ```no_run
/// use exprboost::prelude::*;
///
/// let train = DataTable::from_csv("/path/to/train.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
/// let valid = DataTable::from_csv("/path/to/valid.csv", true)
///     .unwrap()
///     .set_target("class")
///     .unwrap();
///
/// let mut arena = ExpressionArena::new();
/// let inputs = arena.variables(&train);
/// let booster = AdaBoost::init(&train, arena)
///     .validation(&valid)
///     .max_iterations(500);
///
/// let mut logger = LoggerBuilder::new()
///     .booster(booster)
///     .weak_learner(StumpLearner::new(inputs))
///     .time_limit_as_secs(300)
///     .print_every(50)
///     .build()
///     .unwrap();
///
/// let model = logger.run("output.csv")
///     .expect("Failed to run the boosting algorithm");
/// ```
pub struct LoggerBuilder<B, W> {
    booster: Option<B>,
    weak_learner: Option<W>,
    time_limit: u128,
    round: usize,
}


impl<B, W> Default for LoggerBuilder<B, W> {
    fn default() -> Self {
        Self::new()
    }
}


impl<B, W> LoggerBuilder<B, W> {
    /// Construct a new instance of `LoggerBuilder.`
    pub fn new() -> Self {
        Self {
            booster: None,
            weak_learner: None,
            time_limit: DEFAULT_TIMELIMIT_MILLIS,
            round: DEFAULT_ROUND,
        }
    }


    /// Set the boosting algorithm.
    pub fn booster(mut self, booster: B) -> Self {
        self.booster = Some(booster);
        self
    }


    /// Set the weak learner.
    pub fn weak_learner(mut self, weak_learner: W) -> Self {
        self.weak_learner = Some(weak_learner);
        self
    }


    /// Set the time limit for boosting algorithm as milliseconds.
    #[inline(always)]
    pub fn time_limit_as_millis(mut self, time_limit: u128) -> Self {
        self.time_limit = time_limit;
        self
    }


    /// Set the time limit for boosting algorithm as seconds.
    #[inline(always)]
    pub fn time_limit_as_secs(mut self, time_limit: u64) -> Self {
        self.time_limit = (time_limit as u128).saturating_mul(1_000);
        self
    }


    /// Set the time limit for boosting algorithm as minutes.
    #[inline(always)]
    pub fn time_limit_as_mins(mut self, time_limit: u64) -> Self {
        self.time_limit = (time_limit as u128).saturating_mul(60_000);
        self
    }


    /// Set the interval to print the current status.
    /// Set `usize::MAX` to silence the log.
    #[inline(always)]
    pub fn print_every(mut self, round: usize) -> Self {
        self.round = round;
        self
    }


    /// Build [Logger] from the given components.
    pub fn build(self) -> Result<Logger<B, W>> {
        let booster = self.booster
            .ok_or(Error::Incomplete("Boosting algorithm"))?;
        let weak_learner = self.weak_learner
            .ok_or(Error::Incomplete("Weak learner"))?;

        Ok(Logger {
            booster,
            weak_learner,
            time_limit: self.time_limit,
            round: self.round,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_incomplete() {
        let res = LoggerBuilder::<(), ()>::new()
            .weak_learner(())
            .build();
        assert!(matches!(res, Err(Error::Incomplete("Boosting algorithm"))));
    }

    #[test]
    fn test_build_01() {
        let logger = LoggerBuilder::new()
            .booster(1_u8)
            .weak_learner(2_u8)
            .time_limit_as_mins(2)
            .print_every(5)
            .build()
            .unwrap();
        assert_eq!(logger.time_limit, 120_000);
        assert_eq!(logger.round, 5);
    }
}
