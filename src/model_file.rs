//! Plain-text model file.
//!
//! Layout (whitespace-delimited):
//!
//! ```text
//! <input_size> <hidden_layers> <neurons_per_layer> <output_size>
//! <w0> <w1> ... <wN>
//! ```
//!
//! Weights are listed layer by layer, unit by unit, weight index by weight
//! index. The file carries no weight count: the reader derives it from the
//! topology header and rejects files that hold fewer or more numbers.
//! Weights are written with the shortest representation that parses back to
//! the same `f64`, so save/load round-trips exactly. The learning rate is not
//! stored.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::{Error, Layer, Network, Result, Topology, Unit};

impl Network {
    /// Write the model file to `path`.
    ///
    /// The text goes to a sibling `<name>.tmp` file first and is renamed over
    /// `path` once fully flushed, so a failed save leaves any existing model
    /// untouched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let p = path.as_ref();
        let save_err = |source: io::Error| Error::ModelSave {
            path: p.to_path_buf(),
            source,
        };

        let tmp = staging_path(p);
        let written = File::create(&tmp).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.write_to(&mut writer)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, p)) {
            let _ = fs::remove_file(&tmp);
            return Err(save_err(e));
        }

        debug!(
            "saved {} weights to {}",
            self.topology().weight_count(),
            p.display()
        );
        Ok(())
    }

    /// Write the model in text form to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let t = self.topology();
        writeln!(
            writer,
            "{} {} {} {}",
            t.input_size, t.hidden_layers, t.neurons_per_layer, t.output_size
        )?;

        let mut sep = "";
        for layer in self.layers() {
            for unit in layer.units() {
                for w in unit.weights() {
                    write!(writer, "{sep}{w}")?;
                    sep = " ";
                }
            }
        }
        writeln!(writer)
    }

    /// Load a model file written by [`Network::save`].
    pub fn load<P: AsRef<Path>>(path: P, learning_rate: f64) -> Result<Self> {
        let p = path.as_ref();
        let text = fs::read_to_string(p)
            .map_err(|e| Error::ModelLoad(format!("failed to read {}: {e}", p.display())))?;
        let network = Self::from_model_str(&text, learning_rate)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", p.display(), load_reason(e))))?;

        debug!("loaded {:?} from {}", network.topology(), p.display());
        Ok(network)
    }

    /// Read a model in text form from any reader, e.g. an in-memory buffer.
    pub fn read_from<R: Read>(mut reader: R, learning_rate: f64) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::ModelLoad(format!("failed to read model: {e}")))?;
        Self::from_model_str(&text, learning_rate)
    }

    /// Parse a model from its text form.
    pub fn from_model_str(s: &str, learning_rate: f64) -> Result<Self> {
        let mut tokens = s.split_whitespace();

        let mut header = [0_usize; 4];
        for (i, slot) in header.iter_mut().enumerate() {
            let tok = tokens.next().ok_or_else(|| {
                Error::ModelLoad(format!("missing topology value {} of 4", i + 1))
            })?;
            *slot = tok.parse::<usize>().map_err(|e| {
                Error::ModelLoad(format!("invalid topology value {tok:?}: {e}"))
            })?;
        }
        let [input_size, hidden_layers, neurons_per_layer, output_size] = header;
        let topology = Topology::new(input_size, hidden_layers, neurons_per_layer, output_size)
            .map_err(|e| Error::ModelLoad(format!("invalid topology: {e}")))?;

        let weights = tokens
            .enumerate()
            .map(|(i, tok)| match tok.parse::<f64>() {
                Ok(w) if w.is_finite() => Ok(w),
                Ok(w) => Err(Error::ModelLoad(format!("weight {i} is not finite: {w}"))),
                Err(e) => Err(Error::ModelLoad(format!("invalid weight {i} {tok:?}: {e}"))),
            })
            .collect::<Result<Vec<f64>>>()?;

        let expected = topology.weight_count();
        if weights.len() < expected {
            return Err(Error::ModelLoad(format!(
                "truncated weights: topology {input_size} {hidden_layers} {neurons_per_layer} {output_size} needs {expected}, found {}",
                weights.len()
            )));
        }
        if weights.len() > expected {
            return Err(Error::ModelLoad(format!(
                "trailing data: topology needs {expected} weights, found {}",
                weights.len()
            )));
        }

        let mut rest = weights.as_slice();
        let mut layers = Vec::with_capacity(topology.num_layers());
        for (num_units, in_dim) in topology.layer_shapes() {
            let mut units = Vec::with_capacity(num_units);
            for _ in 0..num_units {
                let (row, tail) = rest.split_at(in_dim);
                units.push(Unit::from_weights(row.to_vec()));
                rest = tail;
            }
            layers.push(Layer::from_units(units)?);
        }
        debug_assert!(rest.is_empty());

        Network::from_layers(topology, layers, learning_rate)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn load_reason(err: Error) -> String {
    match err {
        Error::ModelLoad(msg) => msg,
        other => other.to_string(),
    }
}
