use super::*;
use crate::model::sample::{ConfidenceVector, LabelConfidence};

fn support_sets(labels: &[&str], dims: usize, n_support: usize) -> BTreeMap<Label, ClassSupportSet> {
    labels
        .iter()
        .enumerate()
        .map(|(c, l)| {
            (
                l.to_string(),
                ClassSupportSet {
                    label: l.to_string(),
                    prototype: vec![c as f64; dims],
                    support_examples: (0..n_support)
                        .map(|s| vec![c as f64 + 0.1 * (s + 1) as f64; dims])
                        .collect(),
                },
            )
        })
        .collect()
}

fn sample(pairs: &[(&str, f64)]) -> Sample {
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
        ood_score: 0.1,
        coordinates: vec![9.0, 9.0],
        true_label: None,
        input_ref: None,
    }
}

#[test]
fn test_confident_point_set_order() {
    let sets = support_sets(&["A", "B"], 2, 3);
    let s = sample(&[("A", 0.8), ("B", 0.2)]);
    let set = assemble(&s, SampleCategory::Confident, &sets).unwrap();

    // prototype, 3 support examples, then the sample
    assert_eq!(set.len(), 5);
    assert_eq!(set.points[0].coordinates, vec![0.0, 0.0]);
    assert_eq!(set.points[0].label.as_deref(), Some("A"));
    for p in &set.points[1..4] {
        assert_eq!(p.label.as_deref(), Some("A"));
    }
    assert_eq!(set.points[4].coordinates, vec![9.0, 9.0]);
    assert_eq!(set.focus, Some(4));
}

#[test]
fn test_ood_uses_single_closest_class() {
    let sets = support_sets(&["A", "B"], 2, 2);
    let s = sample(&[("B", 0.6), ("A", 0.4)]);
    let set = assemble(&s, SampleCategory::Ood, &sets).unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.points[0].label.as_deref(), Some("B"));
}

#[test]
fn test_confused_point_set_holds_both_classes() {
    let sets = support_sets(&["A", "B", "C"], 2, 2);
    let s = sample(&[("A", 0.5), ("B", 0.45), ("C", 0.05)]);
    let set = assemble(&s, SampleCategory::ConfusedClass, &sets).unwrap();

    // proto_A, 2 support_A, proto_B, 2 support_B, sample
    assert_eq!(set.len(), 7);
    assert_eq!(set.points[0].label.as_deref(), Some("A"));
    assert_eq!(set.points[3].label.as_deref(), Some("B"));
    assert_eq!(set.focus, Some(6));
}

#[test]
fn test_duplicate_top_labels_collide() {
    let sets = support_sets(&["A", "B"], 2, 2);
    // corrupt upstream vector listing the same class twice
    let s = sample(&[("A", 0.5), ("A", 0.45), ("B", 0.05)]);
    let err = assemble(&s, SampleCategory::ConfusedClass, &sets).unwrap_err();
    assert!(matches!(err, EvalError::LabelCollision(l) if l == "A"));
}

#[test]
fn test_unknown_label_is_an_error() {
    let sets = support_sets(&["A"], 2, 2);
    let s = sample(&[("Z", 0.9), ("A", 0.1)]);
    let err = assemble(&s, SampleCategory::Confident, &sets).unwrap_err();
    assert!(matches!(err, EvalError::UnknownLabel(l) if l == "Z"));
}

#[test]
fn test_confused_needs_two_classes() {
    let sets = support_sets(&["A"], 2, 2);
    let s = sample(&[("A", 0.5)]);
    let err = assemble(&s, SampleCategory::ConfusedClass, &sets).unwrap_err();
    assert!(matches!(err, EvalError::NotEnoughLabels(1)));
}
