//! Network shape descriptor.
//!
//! A topology is four integers: input size, hidden layer count, neurons per
//! hidden layer and output size. The hidden layer count follows a fixed
//! convention:
//!
//! - layer 0 always exists: `neurons_per_layer` units reading `input_size` inputs
//! - `hidden_layers - 1` more layers of `neurons_per_layer` units follow, each
//!   reading the previous hidden layer
//! - the output layer has `output_size` units reading `neurons_per_layer` inputs
//!
//! So the network has `max(hidden_layers, 1) + 1` layers, and `hidden_layers == 0`
//! builds exactly the same network as `hidden_layers == 1`. The value is still
//! kept (and written to model files) as given.

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub input_size: usize,
    pub hidden_layers: usize,
    pub neurons_per_layer: usize,
    pub output_size: usize,
}

impl Topology {
    pub fn new(
        input_size: usize,
        hidden_layers: usize,
        neurons_per_layer: usize,
        output_size: usize,
    ) -> Result<Self> {
        let topology = Self {
            input_size,
            hidden_layers,
            neurons_per_layer,
            output_size,
        };
        topology.validate()?;
        Ok(topology)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidConfig("input_size must be > 0".to_owned()));
        }
        if self.neurons_per_layer == 0 {
            return Err(Error::InvalidConfig(
                "neurons_per_layer must be > 0".to_owned(),
            ));
        }
        if self.output_size == 0 {
            return Err(Error::InvalidConfig("output_size must be > 0".to_owned()));
        }
        self.checked_weight_count()
            .ok_or_else(|| Error::InvalidConfig("topology weight count overflows".to_owned()))?;
        Ok(())
    }

    /// Total number of layers, output layer included.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.hidden_layers.max(1).saturating_add(1)
    }

    /// `(units, inputs_per_unit)` for every layer, in order.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut shapes = Vec::with_capacity(self.num_layers());
        shapes.push((self.neurons_per_layer, self.input_size));
        for _ in 1..self.hidden_layers {
            shapes.push((self.neurons_per_layer, self.neurons_per_layer));
        }
        shapes.push((self.output_size, self.neurons_per_layer));
        shapes
    }

    /// Number of weights a model file for this topology must contain.
    ///
    /// `n*in + (h-1)*n*n + out*n`, with `h` taken as at least 1.
    #[inline]
    pub fn weight_count(&self) -> usize {
        self.checked_weight_count().unwrap_or(usize::MAX)
    }

    fn checked_weight_count(&self) -> Option<usize> {
        let n = self.neurons_per_layer;
        let first = n.checked_mul(self.input_size)?;
        let hidden = (self.hidden_layers.max(1) - 1)
            .checked_mul(n)?
            .checked_mul(n)?;
        let output = self.output_size.checked_mul(n)?;
        first.checked_add(hidden)?.checked_add(output)
    }
}
