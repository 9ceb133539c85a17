//! A minimal sigmoid MLP for small binary pixel grids.
//!
//! `shape-mlp` builds a fully-connected feed-forward network from a four-integer
//! [`Topology`], runs forward inference, trains with single-sample online
//! gradient descent (textbook backprop, no biases), and persists weights to a
//! flat text file.
//!
//! # Structure
//!
//! - [`Unit`]: one sigmoid neuron, one weight per input.
//! - [`Layer`]: ordered units sharing the same input vector.
//! - [`Network`]: ordered layers; `forward`, `train`, `save`, `load`.
//!
//! Units only hold weights. The activations recorded by a forward pass live in
//! a [`Scratch`], and the per-unit error terms of a training step live in a
//! [`Trainer`]; both can be allocated once and reused across calls.
//!
//! # Hidden layer convention
//!
//! `hidden_layers` counts the layers before the output layer, with a minimum
//! of one: the network always has `max(hidden_layers, 1) + 1` layers. See
//! [`Topology`].
//!
//! # Quick start
//!
//! ```rust
//! use shape_mlp::{Dataset, FitConfig, Network, Topology};
//!
//! # fn main() -> shape_mlp::Result<()> {
//! let xs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let ys = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];
//! let train = Dataset::from_rows(&xs, &ys)?;
//!
//! let topology = Topology::new(2, 1, 4, 1)?;
//! let mut net = Network::new_with_seed(topology, 0.5, 0)?;
//! let _report = net.fit(
//!     &train,
//!     FitConfig {
//!         max_epochs: 500,
//!         ..FitConfig::default()
//!     },
//! )?;
//!
//! let y = net.forward(&[1.0, 0.0])?;
//! assert_eq!(y.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Allocation-free training (advanced)
//!
//! ```rust
//! use shape_mlp::{Network, Topology};
//!
//! # fn main() -> shape_mlp::Result<()> {
//! let mut net = Network::new_with_seed(Topology::new(3, 2, 8, 2)?, 0.1, 0)?;
//! let mut trainer = net.trainer();
//!
//! let x = [0.1, 0.9, 0.3];
//! let t = [0.0, 1.0];
//! net.train_with(&x, &t, &mut trainer)?;
//! let _output_deltas = trainer.deltas(net.num_layers() - 1);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub mod metrics;
mod model_file;
pub mod network;
pub mod report;
pub mod topology;
pub mod train;
pub mod unit;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::{dsigmoid, sigmoid};
pub use data::{Dataset, Sample};
pub use error::{Error, Result};
pub use layer::Layer;
pub use metrics::{ConfusionMatrix, argmax};
pub use network::{DEFAULT_LEARNING_RATE, Network, Scratch, Trainer};
pub use report::Shape;
pub use topology::Topology;
pub use train::{FitConfig, FitReport};
pub use unit::Unit;
