use serde::{Deserialize, Serialize};

use crate::model::sample::Label;

/// A high-dimensional coordinate with optional provenance. Immutable once
/// constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub coordinates: Vec<f64>,
    pub label: Option<Label>,
    pub sample_index: Option<usize>,
}

impl LabeledPoint {
    pub fn bare(coordinates: Vec<f64>) -> Self {
        Self {
            coordinates,
            label: None,
            sample_index: None,
        }
    }

    pub fn with_label(coordinates: Vec<f64>, label: Label) -> Self {
        Self {
            coordinates,
            label: Some(label),
            sample_index: None,
        }
    }
}

/// Ordered projection input. `focus` tracks the position of the
/// sample-of-interest when one exists; the metrics themselves treat the
/// set symmetrically.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    pub points: Vec<LabeledPoint>,
    pub focus: Option<usize>,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of the first point; the assembler does not validate
    /// that all points agree, distance computation fails loudly if not.
    pub fn dims(&self) -> Option<usize> {
        self.points.first().map(|p| p.coordinates.len())
    }

    pub fn coordinate_rows(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.coordinates.clone()).collect()
    }
}

/// Per-class prototype and support-example embeddings, built and owned by
/// the external model layer. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSupportSet {
    pub label: Label,
    pub prototype: Vec<f64>,
    pub support_examples: Vec<Vec<f64>>,
}
