//! JSON model format (feature: `serde`).
//!
//! A self-describing alternative to the plain-text model file. It records the
//! topology and a nested `layers[layer][unit][weight]` array.
//!
//! Design notes:
//! - We do NOT directly serialize `Network`/`Layer`/`Unit`, so the format stays
//!   stable if the in-memory representation changes.
//! - Deserialization validates the version, shapes against the topology, and
//!   that every weight is finite.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Layer, Network, Result, Topology, Unit};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub topology: SerializedTopology,
    /// `layers[l][u]` holds the weights of unit `u` in layer `l`.
    pub layers: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTopology {
    pub input_size: usize,
    pub hidden_layers: usize,
    pub neurons_per_layer: usize,
    pub output_size: usize,
}

impl From<Topology> for SerializedTopology {
    fn from(t: Topology) -> Self {
        Self {
            input_size: t.input_size,
            hidden_layers: t.hidden_layers,
            neurons_per_layer: t.neurons_per_layer,
            output_size: t.output_size,
        }
    }
}

impl From<&Network> for SerializedNetwork {
    fn from(network: &Network) -> Self {
        let layers = network
            .layers()
            .iter()
            .map(|layer| {
                layer
                    .units()
                    .iter()
                    .map(|unit| unit.weights().to_vec())
                    .collect()
            })
            .collect();
        Self {
            format_version: MODEL_FORMAT_VERSION,
            topology: network.topology().into(),
            layers,
        }
    }
}

impl SerializedNetwork {
    pub fn validate(&self) -> Result<Topology> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::ModelLoad(format!(
                "unsupported model format_version {}; expected {}",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }

        let t = self.topology;
        let topology = Topology::new(t.input_size, t.hidden_layers, t.neurons_per_layer, t.output_size)
            .map_err(|e| Error::ModelLoad(format!("invalid topology: {e}")))?;

        let shapes = topology.layer_shapes();
        if shapes.len() != self.layers.len() {
            return Err(Error::ModelLoad(format!(
                "topology implies {} layers, found {}",
                shapes.len(),
                self.layers.len()
            )));
        }
        for (l, (layer, &(num_units, in_dim))) in self.layers.iter().zip(&shapes).enumerate() {
            if layer.len() != num_units {
                return Err(Error::ModelLoad(format!(
                    "layer {l} has {} units, expected {num_units}",
                    layer.len()
                )));
            }
            for (u, weights) in layer.iter().enumerate() {
                if weights.len() != in_dim {
                    return Err(Error::ModelLoad(format!(
                        "layer {l} unit {u} has {} weights, expected {in_dim}",
                        weights.len()
                    )));
                }
                if weights.iter().any(|w| !w.is_finite()) {
                    return Err(Error::ModelLoad(format!(
                        "layer {l} unit {u} has non-finite weights"
                    )));
                }
            }
        }

        Ok(topology)
    }

    pub fn into_network(self, learning_rate: f64) -> Result<Network> {
        let topology = self.validate()?;
        let layers = self
            .layers
            .into_iter()
            .map(|units| Layer::from_units(units.into_iter().map(Unit::from_weights).collect()))
            .collect::<Result<Vec<_>>>()?;
        Network::from_layers(topology, layers, learning_rate)
    }
}

impl Network {
    /// Serialize the model to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let ser = SerializedNetwork::from(self);
        serde_json::to_string_pretty(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(s: &str, learning_rate: f64) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)
            .map_err(|e| Error::ModelLoad(format!("failed to parse model json: {e}")))?;
        ser.into_network(learning_rate)
    }

    /// Save the model to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s).map_err(|source| Error::ModelSave {
            path: p.to_path_buf(),
            source,
        })
    }

    /// Load a model from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P, learning_rate: f64) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::ModelLoad(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s, learning_rate)
    }
}
