use crate::Result;
use crate::common::utils;
use crate::expression::Value;
use crate::table::DataTable;


/// A trait that defines the behavor of classifier.
/// You only need to implement `confidence` method.
///
/// A binary classifier scores a row with a real number
/// whose sign is the label.
/// A multi-class classifier scores a row with one real per class
/// and predicts the class of the highest score.
pub trait Classifier {
    /// Computes the confidence of the `row`-th row of `table`.
    fn confidence(&self, table: &DataTable, row: usize) -> Result<Value>;


    /// Predicts the label of the `row`-th row of `table`.
    fn predict(&self, table: &DataTable, row: usize) -> Result<i64> {
        let conf = self.confidence(table, row)?;
        Ok(decide(&conf))
    }


    /// Computes the confidence of every row of `table`.
    fn confidence_all(&self, table: &DataTable) -> Result<Vec<Value>> {
        let n_sample = table.shape().0;
        (0..n_sample).map(|row| self.confidence(table, row))
            .collect()
    }


    /// Predicts the labels of every row of `table`.
    fn predict_all(&self, table: &DataTable) -> Result<Vec<i64>> {
        let predictions = self.confidence_all(table)?
            .iter()
            .map(decide)
            .collect();
        Ok(predictions)
    }
}


/// Reads a label off a confidence.
/// Vectors give the index of their largest entry,
/// anything else gives its sign (`+1` at zero).
pub(crate) fn decide(confidence: &Value) -> i64 {
    match confidence {
        Value::Vector(scores) => utils::argmax(scores) as i64,
        value => if value.raw_double() >= 0.0 { 1 } else { -1 },
    }
}
