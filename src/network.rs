use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::dsigmoid;
use crate::{Error, Layer, Result, Topology};

/// Default gradient-descent step size.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// A fully-connected sigmoid network built from a [`Topology`].
///
/// `forward` only reads the weights. `train` runs one online
/// gradient-descent step and is the only operation that mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    topology: Topology,
    layers: Vec<Layer>,
    learning_rate: f64,
}

/// Reusable buffers for `Network::forward_with`.
///
/// Holds the activations of every layer from the most recent forward pass.
#[derive(Debug, Clone)]
pub struct Scratch {
    layer_outputs: Vec<Vec<f64>>,
}

/// Per-step training context: forward activations plus one delta per unit.
///
/// Allocate once via `Network::trainer()` and reuse across `train_with` calls.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub scratch: Scratch,
    deltas: Vec<Vec<f64>>,
}

impl Network {
    pub fn new_with_seed(topology: Topology, learning_rate: f64, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(topology, learning_rate, &mut rng)
    }

    /// Build a network with independent uniform `[0, 1)` weights drawn from `rng`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        topology: Topology,
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Self> {
        topology.validate()?;
        validate_learning_rate(learning_rate)?;

        let layers = topology
            .layer_shapes()
            .into_iter()
            .map(|(units, in_dim)| Layer::new_with_rng(units, in_dim, rng))
            .collect::<Vec<_>>();

        debug!(
            "built network {:?} with {} layers, {} weights",
            topology,
            layers.len(),
            topology.weight_count()
        );

        Ok(Self {
            topology,
            layers,
            learning_rate,
        })
    }

    /// Assemble a network from existing layers.
    ///
    /// The layers must have exactly the shapes `topology` implies.
    pub fn from_layers(topology: Topology, layers: Vec<Layer>, learning_rate: f64) -> Result<Self> {
        topology.validate()?;
        validate_learning_rate(learning_rate)?;

        let shapes = topology.layer_shapes();
        if shapes.len() != layers.len() {
            return Err(Error::InvalidConfig(format!(
                "topology implies {} layers, got {}",
                shapes.len(),
                layers.len()
            )));
        }
        for (idx, (layer, &(units, in_dim))) in layers.iter().zip(&shapes).enumerate() {
            if layer.out_dim() != units || layer.in_dim() != in_dim {
                return Err(Error::InvalidConfig(format!(
                    "layer {idx} is {}x{}, topology implies {units}x{in_dim}",
                    layer.out_dim(),
                    layer.in_dim()
                )));
            }
        }

        Ok(Self {
            topology,
            layers,
            learning_rate,
        })
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.topology.input_size
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.topology.output_size
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    pub fn scratch(&self) -> Scratch {
        Scratch::new(self)
    }

    #[inline]
    pub fn trainer(&self) -> Trainer {
        Trainer::new(self)
    }

    /// Forward pass for a single sample, returning the output layer's activations.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut scratch = self.scratch();
        Ok(self.forward_with(input, &mut scratch)?.to_vec())
    }

    /// Forward pass for a single sample.
    ///
    /// Writes every layer's activations into `scratch` and returns the final
    /// output slice. `scratch` must be built for this network.
    pub fn forward_with<'a>(&self, input: &[f64], scratch: &'a mut Scratch) -> Result<&'a [f64]> {
        if input.len() != self.input_dim() {
            return Err(Error::DimensionMismatch {
                what: "input",
                expected: self.input_dim(),
                got: input.len(),
            });
        }
        assert_eq!(
            scratch.layer_outputs.len(),
            self.layers.len(),
            "scratch has {} layer outputs, network has {} layers",
            scratch.layer_outputs.len(),
            self.layers.len()
        );

        for (idx, layer) in self.layers.iter().enumerate() {
            // Borrow the previous output immutably and the current output mutably.
            let (left, right) = scratch.layer_outputs.split_at_mut(idx);
            let prev: &[f64] = if idx == 0 { input } else { &left[idx - 1] };
            let out = &mut right[0];
            assert_eq!(
                out.len(),
                layer.out_dim(),
                "scratch layer {idx} output len {} does not match layer out_dim {}",
                out.len(),
                layer.out_dim()
            );
            layer.forward_into(prev, out)?;
        }

        Ok(scratch.output())
    }

    /// One online gradient-descent step on a single `(input, target)` sample.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        let mut trainer = self.trainer();
        self.train_with(input, target, &mut trainer)
    }

    /// One online gradient-descent step, reusing `trainer`'s buffers.
    ///
    /// 1. forward pass (records every layer's activations)
    /// 2. output deltas: `(target - y) * dsigmoid(y)`
    /// 3. hidden deltas, last hidden layer first:
    ///    `Σ_j next.unit_j.weights[i] * next.delta_j`, times `dsigmoid(y_i)`
    /// 4. weight updates, first layer first:
    ///    `w += learning_rate * delta * prev_activation`
    ///
    /// All deltas are computed from the weights as they were before this step.
    /// On error no weight is modified.
    pub fn train_with(&mut self, input: &[f64], target: &[f64], trainer: &mut Trainer) -> Result<()> {
        if target.len() != self.output_dim() {
            return Err(Error::DimensionMismatch {
                what: "target",
                expected: self.output_dim(),
                got: target.len(),
            });
        }
        assert_eq!(
            trainer.deltas.len(),
            self.layers.len(),
            "trainer has {} delta layers, network has {} layers",
            trainer.deltas.len(),
            self.layers.len()
        );

        self.forward_with(input, &mut trainer.scratch)?;
        let outputs = &trainer.scratch.layer_outputs;
        let deltas = &mut trainer.deltas;

        let last = self.layers.len() - 1;
        for ((delta, &y), &t) in deltas[last].iter_mut().zip(&outputs[last]).zip(target) {
            *delta = (t - y) * dsigmoid(y);
        }

        for idx in (0..last).rev() {
            let next = &self.layers[idx + 1];
            let (left, right) = deltas.split_at_mut(idx + 1);
            let current = &mut left[idx];
            let next_deltas = &right[0];

            for (i, (delta, &y)) in current.iter_mut().zip(&outputs[idx]).enumerate() {
                let error: f64 = next
                    .units()
                    .iter()
                    .zip(next_deltas)
                    .map(|(unit, &d)| unit.weights()[i] * d)
                    .sum();
                *delta = error * dsigmoid(y);
            }
        }

        for (idx, layer) in self.layers.iter_mut().enumerate() {
            let prev: &[f64] = if idx == 0 { input } else { &outputs[idx - 1] };
            layer.apply_deltas(prev, &deltas[idx], self.learning_rate);
        }

        Ok(())
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be finite and > 0, got {learning_rate}"
        )));
    }
    Ok(())
}

impl Trainer {
    pub fn new(network: &Network) -> Self {
        let deltas = network
            .layers
            .iter()
            .map(|layer| vec![0.0; layer.out_dim()])
            .collect();
        Self {
            scratch: Scratch::new(network),
            deltas,
        }
    }

    /// Deltas of layer `layer_idx` from the most recent training step.
    #[inline]
    pub fn deltas(&self, layer_idx: usize) -> &[f64] {
        &self.deltas[layer_idx]
    }
}

impl Scratch {
    pub fn new(network: &Network) -> Self {
        let layer_outputs = network
            .layers
            .iter()
            .map(|layer| vec![0.0; layer.out_dim()])
            .collect();
        Self { layer_outputs }
    }

    #[inline]
    pub fn layer_output(&self, layer_idx: usize) -> &[f64] {
        &self.layer_outputs[layer_idx]
    }

    #[inline]
    pub fn output(&self) -> &[f64] {
        self.layer_outputs
            .last()
            .expect("scratch must have at least one layer output")
            .as_slice()
    }
}
