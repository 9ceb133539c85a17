//! Classification metrics.
//!
//! Metrics are evaluation helpers (they do not participate in backprop). The
//! predicted class of an output vector is its argmax; the actual class of a
//! one-hot target is the index of its largest entry.

use crate::{Dataset, Error, Network, Result};

/// Index of the largest value; the first one wins ties. `None` for empty input.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Square confusion matrix: `counts[actual][predicted]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    classes: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    pub fn new(classes: usize) -> Result<Self> {
        if classes == 0 {
            return Err(Error::InvalidConfig(
                "confusion matrix needs at least one class".to_owned(),
            ));
        }
        Ok(Self {
            classes,
            counts: vec![0; classes * classes],
        })
    }

    /// Run `network` over `data` and tally argmax predictions against targets.
    pub fn from_predictions(network: &Network, data: &Dataset) -> Result<Self> {
        if data.target_dim() != network.output_dim() {
            return Err(Error::DimensionMismatch {
                what: "dataset target",
                expected: network.output_dim(),
                got: data.target_dim(),
            });
        }

        let mut matrix = Self::new(network.output_dim())?;
        let mut scratch = network.scratch();
        for idx in 0..data.len() {
            let out = network.forward_with(data.input(idx), &mut scratch)?;
            // Both vectors are non-empty: output_dim > 0.
            if let (Some(actual), Some(predicted)) = (argmax(data.target(idx)), argmax(out)) {
                matrix.record(actual, predicted);
            }
        }
        Ok(matrix)
    }

    #[inline]
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Panics if either class index is out of range.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        assert!(
            actual < self.classes && predicted < self.classes,
            "class index out of range: actual={actual} predicted={predicted} classes={}",
            self.classes
        );
        self.counts[actual * self.classes + predicted] += 1;
    }

    #[inline]
    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual * self.classes + predicted]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn correct(&self) -> usize {
        (0..self.classes).map(|c| self.count(c, c)).sum()
    }

    /// Fraction of samples on the diagonal; 0 when empty.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// `TP / (TP + FP)` for `class`; 0 when nothing was predicted as `class`.
    pub fn precision(&self, class: usize) -> f64 {
        let predicted: usize = (0..self.classes).map(|a| self.count(a, class)).sum();
        ratio(self.count(class, class), predicted)
    }

    /// `TP / (TP + FN)` for `class`; 0 when `class` never occurs.
    pub fn recall(&self, class: usize) -> f64 {
        let actual: usize = (0..self.classes).map(|p| self.count(class, p)).sum();
        ratio(self.count(class, class), actual)
    }

    pub fn f1(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }

    /// Unweighted mean of per-class F1.
    pub fn macro_f1(&self) -> f64 {
        (0..self.classes).map(|c| self.f1(c)).sum::<f64>() / self.classes as f64
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[-3.0]), Some(0));
    }

    #[test]
    fn scores_from_known_counts() {
        let mut m = ConfusionMatrix::new(3).unwrap();
        // actual 0: 3 right, 1 predicted as 1
        for _ in 0..3 {
            m.record(0, 0);
        }
        m.record(0, 1);
        // actual 1: 2 right
        m.record(1, 1);
        m.record(1, 1);
        // actual 2: never predicted correctly
        m.record(2, 0);

        assert_eq!(m.total(), 7);
        assert!((m.accuracy() - 5.0 / 7.0).abs() < 1e-12);
        assert!((m.precision(0) - 0.75).abs() < 1e-12);
        assert!((m.recall(0) - 0.75).abs() < 1e-12);
        assert!((m.precision(1) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.recall(1), 1.0);
        assert_eq!(m.precision(2), 0.0);
        assert_eq!(m.f1(2), 0.0);
        assert!((m.f1(1) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix_scores_zero() {
        let m = ConfusionMatrix::new(2).unwrap();
        assert_eq!(m.accuracy(), 0.0);
        assert_eq!(m.macro_f1(), 0.0);
        assert!(ConfusionMatrix::new(0).is_err());
    }
}
