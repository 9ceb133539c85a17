//! Human-facing reporting helpers: shape labels, grid rendering and memory
//! accounting.

use std::fmt;
use std::mem::size_of;

use crate::metrics::argmax;
use crate::{Network, Unit};

/// Shape classes in output-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Rectangle,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Rectangle, Shape::Triangle];

    #[inline]
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// The argmax class of `output` and its activation, if that activation is
    /// strictly above `threshold` and maps to a known shape.
    pub fn classify(output: &[f64], threshold: f64) -> Option<(Self, f64)> {
        let idx = argmax(output)?;
        let confidence = output[idx];
        if confidence > threshold {
            Self::from_index(idx).map(|shape| (shape, confidence))
        } else {
            None
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Circle => "circle",
            Shape::Rectangle => "rectangle",
            Shape::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

/// Render a row-major binary grid, `#` for pixels >= 0.5 and `.` otherwise.
///
/// A trailing partial row is rendered as-is. `width == 0` renders nothing.
pub fn render_grid(input: &[f64], width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut out = String::with_capacity(input.len() + input.len() / width + 1);
    for row in input.chunks(width) {
        out.extend(row.iter().map(|&p| if p >= 0.5 { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

impl Network {
    /// Approximate heap + inline size of the weight storage, in bytes.
    ///
    /// Counts one `Unit` header per unit plus one `f64` per weight. A unit
    /// holds only its weights; the per-unit output and delta recorded during
    /// forward and training live in [`crate::Scratch`] / [`crate::Trainer`]
    /// and are not included, so this is smaller than a count that sizes each
    /// neuron together with its cached activation and error term.
    pub fn memory_usage(&self) -> usize {
        self.layers()
            .iter()
            .map(|layer| {
                layer.out_dim() * size_of::<Unit>() + layer.num_weights() * size_of::<f64>()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topology;

    #[test]
    fn classify_requires_confidence_above_threshold() {
        assert_eq!(
            Shape::classify(&[0.1, 0.95, 0.2], 0.8),
            Some((Shape::Rectangle, 0.95))
        );
        assert_eq!(Shape::classify(&[0.1, 0.8, 0.2], 0.8), None);
        assert_eq!(Shape::classify(&[0.1, 0.2, 0.3, 0.9], 0.8), None);
        assert_eq!(Shape::classify(&[], 0.8), None);
    }

    #[test]
    fn shape_names() {
        let names: Vec<String> = Shape::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["circle", "rectangle", "triangle"]);
    }

    #[test]
    fn renders_rows() {
        let grid = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(render_grid(&grid, 3), "#.#\n.#.\n#\n");
        assert_eq!(render_grid(&grid, 0), "");
    }

    #[test]
    fn memory_usage_counts_units_and_weights() {
        let topology = Topology::new(49, 1, 10, 3).unwrap();
        let net = Network::new_with_seed(topology, 0.1, 0).unwrap();
        let expected = 13 * size_of::<Unit>() + topology.weight_count() * size_of::<f64>();
        assert_eq!(net.memory_usage(), expected);
    }
}
