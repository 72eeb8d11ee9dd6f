//! This file provides some common functions
//! such as the log-sum-exp normalization of example weights.
use rayon::prelude::*;


/// Compute the inner-product of the given two slices.
#[inline(always)]
pub fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    assert_eq!(v1.len(), v2.len());
    v1.into_par_iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Returns `ln(sum_i exp(x_i))` computed without overflow.
/// Returns `-inf` for an empty slice.
#[inline(always)]
pub fn log_sum_exp(log_values: &[f64]) -> f64 {
    let max = log_values.par_iter()
        .copied()
        .reduce(|| f64::NEG_INFINITY, f64::max);

    if max == f64::NEG_INFINITY || max.is_nan() {
        return max;
    }

    let sum = log_values.par_iter()
        .map(|v| (v - max).exp())
        .sum::<f64>();

    max + sum.ln()
}


/// Turns a vector of log-weights into a probability vector in place.
/// Returns the logarithm of the normalizer,
/// i.e., `ln(sum_i exp(log_weights[i]))`.
#[inline(always)]
pub fn exp_normalize(log_weights: &mut [f64]) -> f64 {
    let normalizer = log_sum_exp(log_weights);

    log_weights.par_iter_mut()
        .for_each(|d| { *d = (*d - normalizer).exp(); });

    normalizer
}


/// Normalizes `items` so that `sum |items[i]| = 1`.
#[inline(always)]
pub fn normalize(items: &mut [f64]) {
    let z = items.iter()
        .map(|it| it.abs())
        .sum::<f64>();

    assert_ne!(z, 0.0);

    items.par_iter_mut()
        .for_each(|item| { *item /= z; });
}


/// Returns an index whose entry is the maximal value.
pub fn argmax(arr: &[f64]) -> usize {
    let dim = arr.len();
    let (ix, _) = arr.iter()
        .enumerate()
        .fold((dim, f64::MIN), |acc, (i, &a)| {
            if acc.1 < a {
                (i, a)
            } else {
                acc
            }
        });
    assert_ne!(
        ix, dim,
        "failed to execute argmax. array is {arr:?}"
    );
    ix
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product_01() {
        let v1 = [1.0, 2.0, 3.0];
        let v2 = [0.5, 0.25, -1.0];
        let res = inner_product(&v1, &v2);
        assert_eq!(res, -2.0, "expected -2, got {res}.");
    }

    #[test]
    fn test_log_sum_exp_01() {
        let values = [0f64, 0f64];
        let res = log_sum_exp(&values);
        let exp = 2f64.ln();
        assert!((res - exp).abs() < 1e-12, "expected {exp}, got {res}.");
    }

    #[test]
    fn test_log_sum_exp_02() {
        // Would overflow without the max trick.
        let values = [1_000f64, 1_000f64];
        let res = log_sum_exp(&values);
        let exp = 1_000f64 + 2f64.ln();
        assert!((res - exp).abs() < 1e-9, "expected {exp}, got {res}.");
    }

    #[test]
    fn test_exp_normalize_01() {
        let mut values = vec![-1_000.0, -1_000.0, -1_000.0, -1_000.0];
        exp_normalize(&mut values);
        for v in values {
            assert!((v - 0.25).abs() < 1e-12, "expected 0.25, got {v}.");
        }
    }

    #[test]
    fn test_normalize_01() {
        let mut values = vec![1.0, 3.0];
        normalize(&mut values);
        assert_eq!(values, vec![0.25, 0.75]);
    }

    #[test]
    fn test_argmax_01() {
        let arr = [0.1, 0.7, -3.0, 0.2];
        assert_eq!(argmax(&arr), 1);
    }
}
