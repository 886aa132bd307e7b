use serde::Serialize;

use crate::model::sample::Sample;

/// Which visualization use case a sample falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleCategory {
    Ood,
    Confident,
    ConfusedClass,
}

impl SampleCategory {
    pub const ALL: [SampleCategory; 3] = [
        SampleCategory::Ood,
        SampleCategory::Confident,
        SampleCategory::ConfusedClass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SampleCategory::Ood => "ood",
            SampleCategory::Confident => "confident",
            SampleCategory::ConfusedClass => "confused_class",
        }
    }
}

/// Assigns a sample to a category. Fixed priority: the OOD test first,
/// then the confidence test, else confused. Multiple classes above the
/// confidence threshold still mean `Confident`; only the maximum
/// matters.
pub fn categorize(sample: &Sample, ood_tolerance: f64, confidence_threshold: f64) -> SampleCategory {
    if sample.ood_score > ood_tolerance {
        SampleCategory::Ood
    } else if sample.confidences.max_confidence() > confidence_threshold {
        SampleCategory::Confident
    } else {
        SampleCategory::ConfusedClass
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/categorize.rs"]
mod tests;
