use serde::{Deserialize, Serialize};

pub type Label = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfidence {
    pub label: Label,
    pub confidence: f64,
}

/// Categorical confidence distribution over class labels.
///
/// Entry order is significant: when two classes carry exactly the same
/// confidence, argmax and top-two selection keep the first-encountered
/// entry. Callers that need a different tie policy must reorder the
/// entries before constructing the vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceVector {
    pub entries: Vec<LabelConfidence>,
}

impl ConfidenceVector {
    pub fn new(entries: Vec<LabelConfidence>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest confidence value, 0.0 for an empty vector.
    pub fn max_confidence(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.confidence)
            .fold(0.0, f64::max)
    }

    /// Index of the most confident entry; first maximum wins on ties.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            match best {
                None => best = Some(i),
                Some(b) if entry.confidence > self.entries[b].confidence => best = Some(i),
                _ => {}
            }
        }
        best
    }

    /// Indices of the two most confident entries, in descending confidence.
    /// Within the selection the first-encountered entry wins exact ties.
    /// Returns `None` when the vector holds fewer than two entries.
    pub fn top_two(&self) -> Option<(usize, usize)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.argmax()?;
        let mut second: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if i == first {
                continue;
            }
            match second {
                None => second = Some(i),
                Some(s) if entry.confidence > self.entries[s].confidence => second = Some(i),
                _ => {}
            }
        }
        Some((first, second?))
    }

    pub fn label(&self, idx: usize) -> &Label {
        &self.entries[idx].label
    }
}

/// Opaque reference to the raw input a sample came from. Carried through
/// untouched for downstream rendering, never read by the metrics engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRef {
    pub file: String,
    pub index: usize,
}

/// One inference sample: the classifier's confidence distribution, its
/// out-of-distribution score, and the sample's own embedding coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub confidences: ConfidenceVector,
    pub ood_score: f64,
    pub coordinates: Vec<f64>,
    /// Ground-truth class, when known. Required only for stratified
    /// global sampling.
    pub true_label: Option<Label>,
    pub input_ref: Option<InputRef>,
}
