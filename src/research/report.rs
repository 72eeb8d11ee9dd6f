/// What one boosting iteration reports.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Objective value of the weak candidate.
    pub edge: f64,
    /// Weighted training error of the ensemble under the new weights.
    pub loss: f64,
    /// `log10` of the exponential loss of the ensemble.
    pub log_loss: f64,
    /// Training error of the ensemble.
    pub train_error: f64,
    /// Validation error of the ensemble, if a validation table is given.
    pub validation_error: Option<f64>,
    /// Textual form of the new contribution, if recorded.
    pub contribution: Option<String>,
}


impl IterationReport {
    /// Returns the reported quantities as `(name, value)` pairs.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("iteration", self.iteration.to_string()),
            ("edge", self.edge.to_string()),
            ("loss", self.loss.to_string()),
            ("log loss", self.log_loss.to_string()),
            ("train error", self.train_error.to_string()),
        ];
        if let Some(error) = self.validation_error {
            pairs.push(("validation error", error.to_string()));
        }
        if let Some(text) = &self.contribution {
            pairs.push(("contribution", text.clone()));
        }
        pairs
    }
}


/// Implementing this trait allows you to use `Logger` to
/// log algorithm's behavor.
pub trait Research {
    /// Returns the report of the latest iteration, if any.
    fn last_report(&self) -> Option<&IterationReport>;
}
