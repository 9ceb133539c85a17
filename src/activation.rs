//! Sigmoid activation.
//!
//! Every unit computes a weighted sum `z = w · x` and outputs `y = sigmoid(z)`.
//! Only `y` is recorded during the forward pass, so backprop evaluates the
//! derivative from `y` through [`dsigmoid`] and never recomputes it from `z`.

/// Logistic function `1 / (1 + e^-x)`.
///
/// The output lies strictly inside `(0, 1)` for any finite `x` whose result is
/// representable; very large `|x|` saturates to the nearest representable bound.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    // Numerically stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Sigmoid derivative expressed in terms of the cached output `y = sigmoid(z)`.
#[inline]
pub fn dsigmoid(y: f64) -> f64 {
    y * (1.0 - y)
}
