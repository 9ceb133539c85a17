use rand::Rng;

use crate::{Error, Result, Unit};

/// An ordered group of units that all read the same input vector.
///
/// Unit order is significant: it fixes the position of each unit's output in
/// the layer's output vector, its delta during backprop, and its weights in
/// the model file.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    in_dim: usize,
    units: Vec<Unit>,
}

impl Layer {
    pub fn zeroed(num_units: usize, in_dim: usize) -> Self {
        let units = (0..num_units).map(|_| Unit::zeroed(in_dim)).collect();
        Self { in_dim, units }
    }

    pub fn new_with_rng<R: Rng + ?Sized>(num_units: usize, in_dim: usize, rng: &mut R) -> Self {
        let units = (0..num_units)
            .map(|_| Unit::new_with_rng(in_dim, rng))
            .collect();
        Self { in_dim, units }
    }

    /// Build a layer from existing units.
    ///
    /// All units must have the same (non-zero) number of inputs.
    pub fn from_units(units: Vec<Unit>) -> Result<Self> {
        let Some(first) = units.first() else {
            return Err(Error::InvalidConfig(
                "layer must have at least one unit".to_owned(),
            ));
        };
        let in_dim = first.num_inputs();
        if in_dim == 0 {
            return Err(Error::InvalidConfig(
                "layer in_dim must be > 0".to_owned(),
            ));
        }
        for (i, unit) in units.iter().enumerate() {
            if unit.num_inputs() != in_dim {
                return Err(Error::InvalidConfig(format!(
                    "unit {i} has {} weights, expected {in_dim}",
                    unit.num_inputs()
                )));
            }
        }
        Ok(Self { in_dim, units })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    #[inline]
    pub fn num_weights(&self) -> usize {
        self.in_dim * self.units.len()
    }

    /// Forward pass for a single sample.
    pub fn forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        let mut outputs = vec![0.0; self.units.len()];
        self.forward_into(inputs, &mut outputs)?;
        Ok(outputs)
    }

    /// Forward pass writing one activation per unit into `outputs`.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim()` (otherwise `InvalidInputSize`)
    /// - `outputs.len() == self.out_dim()`
    pub fn forward_into(&self, inputs: &[f64], outputs: &mut [f64]) -> Result<()> {
        debug_assert_eq!(outputs.len(), self.units.len());

        for (out, unit) in outputs.iter_mut().zip(&self.units) {
            *out = unit.activate(inputs)?;
        }
        Ok(())
    }

    /// Applies `weight += learning_rate * delta * prev` to every unit.
    ///
    /// `deltas[i]` belongs to unit `i`; `prev` is the activation vector this
    /// layer read during the forward pass.
    pub(crate) fn apply_deltas(&mut self, prev: &[f64], deltas: &[f64], learning_rate: f64) {
        debug_assert_eq!(prev.len(), self.in_dim);
        debug_assert_eq!(deltas.len(), self.units.len());

        for (unit, &delta) in self.units.iter_mut().zip(deltas) {
            unit.update(prev, learning_rate * delta);
        }
    }
}
