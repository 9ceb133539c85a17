//! Squared-error helpers.
//!
//! Training itself never computes a loss: `Network::train` applies the delta
//! rule directly. These are used by the training loop's stopping criterion and
//! by evaluation.

/// Half sum of squared errors: `0.5 * Σ (target[i] - pred[i])^2`.
///
/// Shape contract: `pred.len() == target.len()`.
#[inline]
pub fn half_sse(pred: &[f64], target: &[f64]) -> f64 {
    0.5 * sse(pred, target)
}

/// Sum of squared errors: `Σ (target[i] - pred[i])^2`.
#[inline]
pub fn sse(pred: &[f64], target: &[f64]) -> f64 {
    assert_eq!(
        pred.len(),
        target.len(),
        "pred len {} does not match target len {}",
        pred.len(),
        target.len()
    );

    let mut sum_sq = 0.0_f64;
    for (&p, &t) in pred.iter().zip(target) {
        let diff = t - p;
        sum_sq = diff.mul_add(diff, sum_sq);
    }
    sum_sq
}

/// Mean squared error: `mean((target[i] - pred[i])^2)`.
///
/// Returns 0 for empty slices.
#[inline]
pub fn mse(pred: &[f64], target: &[f64]) -> f64 {
    if pred.is_empty() && target.is_empty() {
        return 0.0;
    }
    sse(pred, target) / pred.len() as f64
}
