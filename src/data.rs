//! Datasets and pixel-grid sample files.
//!
//! `Dataset` stores samples contiguously in row-major layout so the training
//! loop can hand out slices without per-step allocations.
//!
//! A sample file looks like this:
//!
//! ```text
//! 1 0 0
//! 0 0 1 1 1 0 0
//! 0 1 0 0 0 1 0
//! ...
//! ```
//!
//! The first line is the label: every `0`/`1` character on it is one target
//! component (one-hot for shape classes). Every following non-empty line is one
//! row of the grid, and every `0`/`1` character on it is one pixel. Any other
//! character is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::{Error, Result};

/// One labelled example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// A supervised dataset: inputs (X) and targets (Y).
///
/// Stored as contiguous buffers with row-major layout:
/// - `inputs.len() == len * input_dim`
/// - `targets.len() == len * target_dim`
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<f64>,
    targets: Vec<f64>,
    len: usize,
    input_dim: usize,
    target_dim: usize,
}

impl Dataset {
    /// Build a dataset from flat buffers.
    ///
    /// `inputs` is `(len, input_dim)` and `targets` is `(len, target_dim)`.
    pub fn from_flat(
        inputs: Vec<f64>,
        targets: Vec<f64>,
        input_dim: usize,
        target_dim: usize,
    ) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidData("input_dim must be > 0".to_owned()));
        }
        if target_dim == 0 {
            return Err(Error::InvalidData("target_dim must be > 0".to_owned()));
        }
        if inputs.len() % input_dim != 0 {
            return Err(Error::InvalidData(format!(
                "inputs length {} is not divisible by input_dim {}",
                inputs.len(),
                input_dim
            )));
        }

        let len = inputs.len() / input_dim;
        if targets.len() != len * target_dim {
            return Err(Error::InvalidData(format!(
                "targets length {} does not match len * target_dim ({} * {})",
                targets.len(),
                len,
                target_dim
            )));
        }

        Ok(Self {
            inputs,
            targets,
            len,
            input_dim,
            target_dim,
        })
    }

    /// Build a dataset from per-sample rows.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::InvalidData(format!(
                "inputs/targets length mismatch: {} vs {}",
                inputs.len(),
                targets.len()
            )));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }

        let input_dim = inputs[0].len();
        let target_dim = targets[0].len();
        for (i, (x, y)) in inputs.iter().zip(targets).enumerate() {
            if x.len() != input_dim {
                return Err(Error::InvalidData(format!(
                    "input row {i} has len {}, expected {input_dim}",
                    x.len()
                )));
            }
            if y.len() != target_dim {
                return Err(Error::InvalidData(format!(
                    "target row {i} has len {}, expected {target_dim}",
                    y.len()
                )));
            }
        }

        Self::from_flat(inputs.concat(), targets.concat(), input_dim, target_dim)
    }

    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let (inputs, targets): (Vec<_>, Vec<_>) = samples
            .iter()
            .map(|s| (s.input.clone(), s.target.clone()))
            .unzip();
        Self::from_rows(&inputs, &targets)
    }

    #[inline]
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    #[inline]
    /// Returns the `idx`-th input row (shape: `(input_dim,)`).
    ///
    /// Panics if `idx >= len`.
    pub fn input(&self, idx: usize) -> &[f64] {
        let start = idx * self.input_dim;
        &self.inputs[start..start + self.input_dim]
    }

    #[inline]
    /// Returns the `idx`-th target row (shape: `(target_dim,)`).
    ///
    /// Panics if `idx >= len`.
    pub fn target(&self, idx: usize) -> &[f64] {
        let start = idx * self.target_dim;
        &self.targets[start..start + self.target_dim]
    }
}

fn binary_digits(line: &str) -> impl Iterator<Item = f64> + '_ {
    line.chars().filter_map(|c| match c {
        '0' => Some(0.0),
        '1' => Some(1.0),
        _ => None,
    })
}

/// Parse a sample file's contents (label line followed by grid rows).
pub fn parse_sample(text: &str) -> Result<Sample> {
    let mut lines = text.lines();
    let label = lines
        .next()
        .ok_or_else(|| Error::InvalidData("empty sample".to_owned()))?;

    let target: Vec<f64> = binary_digits(label).collect();
    if target.is_empty() {
        return Err(Error::InvalidData("sample label has no 0/1 digits".to_owned()));
    }

    let input = parse_grid(lines);
    if input.is_empty() {
        return Err(Error::InvalidData("sample has no pixels".to_owned()));
    }

    Ok(Sample { input, target })
}

fn parse_grid<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<f64> {
    lines
        .filter(|line| !line.is_empty())
        .flat_map(binary_digits)
        .collect()
}

/// Load a single labelled sample file.
pub fn load_sample<P: AsRef<Path>>(path: P) -> Result<Sample> {
    let p = path.as_ref();
    let text = fs::read_to_string(p)?;
    parse_sample(&text).map_err(|e| Error::InvalidData(format!("{}: {e}", p.display())))
}

/// Load the pixels of a sample file, ignoring its label line.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let p = path.as_ref();
    let text = fs::read_to_string(p)?;
    let input = parse_grid(text.lines().skip(1));
    if input.is_empty() {
        return Err(Error::InvalidData(format!("{}: no pixels", p.display())));
    }
    Ok(input)
}

/// Load every regular file in `dir` as a sample, in path order.
///
/// Files that cannot be read or parsed are skipped with a warning.
pub fn load_samples_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Sample>> {
    let dir = dir.as_ref();
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    paths.retain(|p| p.is_file());
    paths.sort();

    let mut samples = Vec::with_capacity(paths.len());
    for path in paths {
        match load_sample(&path) {
            Ok(sample) => samples.push(sample),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }

    debug!("loaded {} samples from {}", samples.len(), dir.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCLE: &str = "1 0 0\n\
                          0 0 1 1 1 0 0\n\
                          0 1 0 0 0 1 0\n\
                          \n\
                          0 1 0 0 0 1 0\n";

    #[test]
    fn dataset_from_flat_validates_shapes() {
        let ok = Dataset::from_flat(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0], 2, 1);
        assert!(ok.is_ok());

        let err = Dataset::from_flat(vec![0.0, 1.0, 2.0], vec![0.0], 2, 1);
        assert!(err.is_err());
    }

    #[test]
    fn dataset_rows_are_addressable() {
        let ds = Dataset::from_rows(
            &[vec![0.0, 1.0], vec![1.0, 1.0]],
            &[vec![0.0], vec![1.0]],
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.input(1), &[1.0, 1.0]);
        assert_eq!(ds.target(1), &[1.0]);
    }

    #[test]
    fn dataset_from_rows_rejects_ragged_rows() {
        let err = Dataset::from_rows(&[vec![0.0, 1.0], vec![1.0]], &[vec![0.0], vec![1.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn parses_label_and_grid() {
        let sample = parse_sample(CIRCLE).unwrap();
        assert_eq!(sample.target, vec![1.0, 0.0, 0.0]);
        assert_eq!(sample.input.len(), 21);
        assert_eq!(&sample.input[..7], &[0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn ignores_non_binary_characters() {
        let sample = parse_sample("[0,1]\n1,0\n0;1\n").unwrap();
        assert_eq!(sample.target, vec![0.0, 1.0]);
        assert_eq!(sample.input, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_empty_or_pixelless_samples() {
        assert!(parse_sample("").is_err());
        assert!(parse_sample("1 0 0\n").is_err());
        assert!(parse_sample("abc\n0 1\n").is_err());
    }
}
