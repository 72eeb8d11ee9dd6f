use serde::{Serialize, Deserialize};


/// Defines machine learning tasks.
/// The boosted model stores its task to interpret the ensemble scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Binary classification. The target labels are `+1` or `-1`.
    Binary,
    /// Multi-class classification handled as `K` binary labels.
    /// Labels are `0`, `1`, ..., `K-1`.
    MultiClass(usize),
}


impl Task {
    /// Returns the number of scores the model produces per example.
    pub fn n_outputs(&self) -> usize {
        match self {
            Self::Binary => 1,
            Self::MultiClass(k) => *k,
        }
    }
}


/// Convert a class label into a signed vector.
/// ```text
/// y = 2, n_class = 4  ->  [-1, -1, +1, -1]
/// ```
#[inline(always)]
pub(crate) fn signed_vectorize(y: f64, n_class: usize) -> Vec<f64> {
    let y = if y <= 0.0 { 0_usize } else { y as usize };
    assert!(y < n_class, "label {y} is out of range for {n_class} classes");

    let mut vec = vec![-1.0; n_class];
    vec[y] = 1.0;
    vec
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_vectorize_01() {
        let v = signed_vectorize(2.0, 4);
        assert_eq!(v, vec![-1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_signed_vectorize_02() {
        let v = signed_vectorize(0.0, 2);
        assert_eq!(v, vec![1.0, -1.0]);
    }

    #[test]
    #[should_panic]
    fn test_signed_vectorize_03() {
        signed_vectorize(3.0, 3);
    }

    #[test]
    fn test_n_outputs_01() {
        assert_eq!(Task::Binary.n_outputs(), 1);
        assert_eq!(Task::MultiClass(5).n_outputs(), 5);
    }
}
