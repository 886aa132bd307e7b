use super::*;
use crate::model::sample::{ConfidenceVector, LabelConfidence};

fn sample(ood: f64, pairs: &[(&str, f64)]) -> Sample {
    Sample {
        confidences: ConfidenceVector::new(
            pairs
                .iter()
                .map(|(l, c)| LabelConfidence {
                    label: l.to_string(),
                    confidence: *c,
                })
                .collect(),
        ),
        ood_score: ood,
        coordinates: vec![0.0, 0.0],
        true_label: None,
        input_ref: None,
    }
}

#[test]
fn test_high_ood_score_wins_regardless_of_confidence() {
    let s = sample(0.96, &[("A", 0.99), ("B", 0.01)]);
    assert_eq!(categorize(&s, 0.95, 0.7), SampleCategory::Ood);
}

#[test]
fn test_confident_sample() {
    let s = sample(0.1, &[("A", 0.8), ("B", 0.1), ("C", 0.1)]);
    assert_eq!(categorize(&s, 0.95, 0.7), SampleCategory::Confident);
    assert_eq!(s.confidences.label(s.confidences.argmax().unwrap()), "A");
}

#[test]
fn test_confused_sample() {
    let s = sample(0.1, &[("A", 0.5), ("B", 0.45), ("C", 0.05)]);
    assert_eq!(categorize(&s, 0.95, 0.7), SampleCategory::ConfusedClass);
    let (first, second) = s.confidences.top_two().unwrap();
    assert_eq!(s.confidences.label(first), "A");
    assert_eq!(s.confidences.label(second), "B");
}

#[test]
fn test_threshold_comparisons_are_strict() {
    // exactly at the tolerance is not OOD; exactly at the threshold is
    // not confident
    let s = sample(0.95, &[("A", 0.7), ("B", 0.3)]);
    assert_eq!(categorize(&s, 0.95, 0.7), SampleCategory::ConfusedClass);
}

#[test]
fn test_multiple_classes_above_threshold_still_confident() {
    let s = sample(0.0, &[("A", 0.75), ("B", 0.72)]);
    assert_eq!(categorize(&s, 0.95, 0.7), SampleCategory::Confident);
}

#[test]
fn test_category_names() {
    assert_eq!(SampleCategory::Ood.name(), "ood");
    assert_eq!(SampleCategory::Confident.name(), "confident");
    assert_eq!(SampleCategory::ConfusedClass.name(), "confused_class");
}
