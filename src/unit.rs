use rand::Rng;

use crate::activation::sigmoid;
use crate::{Error, Result};

/// A single sigmoid neuron: one weight per input connection.
///
/// The weight count is fixed at construction. Activations and deltas are not
/// stored here; they live in [`crate::Scratch`] / [`crate::Trainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    weights: Vec<f64>,
}

impl Unit {
    #[inline]
    pub fn zeroed(num_inputs: usize) -> Self {
        Self {
            weights: vec![0.0; num_inputs],
        }
    }

    /// Unit with independent uniform `[0, 1)` weights.
    pub fn new_with_rng<R: Rng + ?Sized>(num_inputs: usize, rng: &mut R) -> Self {
        let weights = (0..num_inputs).map(|_| rng.gen_range(0.0..1.0)).collect();
        Self { weights }
    }

    #[inline]
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    /// `sigmoid(Σ weights[i] * inputs[i])`.
    #[inline]
    pub fn activate(&self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.weights.len() {
            return Err(Error::InvalidInputSize {
                expected: self.weights.len(),
                got: inputs.len(),
            });
        }

        let mut sum = 0.0_f64;
        for (&w, &x) in self.weights.iter().zip(inputs) {
            sum = w.mul_add(x, sum);
        }
        Ok(sigmoid(sum))
    }

    /// Gradient step: `weights[k] += step * prev[k]`, where `step` is
    /// `learning_rate * delta` for this unit.
    #[inline]
    pub(crate) fn update(&mut self, prev: &[f64], step: f64) {
        debug_assert_eq!(prev.len(), self.weights.len());

        for (w, &x) in self.weights.iter_mut().zip(prev) {
            *w += step * x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_weights_activate_to_one_half() {
        let unit = Unit::zeroed(3);
        let y = unit.activate(&[1.0, -2.0, 5.0]).unwrap();
        assert_eq!(y, 0.5);
    }

    #[test]
    fn activate_is_sigmoid_of_weighted_sum() {
        let unit = Unit::from_weights(vec![0.5, -1.0]);
        let y = unit.activate(&[2.0, 0.5]).unwrap();
        assert!((y - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn activate_rejects_wrong_input_len() {
        let unit = Unit::zeroed(2);
        match unit.activate(&[1.0, 2.0, 3.0]) {
            Err(Error::InvalidInputSize { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 3);
            }
            other => panic!("expected InvalidInputSize, got {other:?}"),
        }
    }

    #[test]
    fn random_weights_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let unit = Unit::new_with_rng(64, &mut rng);
        assert_eq!(unit.num_inputs(), 64);
        assert!(unit.weights().iter().all(|w| (0.0..1.0).contains(w)));
    }

    #[test]
    fn update_moves_weights_along_previous_activations() {
        let mut unit = Unit::from_weights(vec![0.1, 0.2]);
        unit.update(&[1.0, 0.0], 0.5);
        assert_eq!(unit.weights(), &[0.6, 0.2]);
    }
}
