use super::*;
use crate::model::sample::{ConfidenceVector, LabelConfidence};
use crate::projection::BuiltinProjector;

fn sample(class: usize, offset: f64) -> Sample {
    let center = class as f64 * 10.0;
    Sample {
        confidences: ConfidenceVector::new(vec![
            LabelConfidence {
                label: format!("c{class}"),
                confidence: 0.9,
            },
            LabelConfidence {
                label: format!("c{}", (class + 1) % 2),
                confidence: 0.1,
            },
        ]),
        ood_score: 0.1,
        coordinates: vec![center + offset, center - offset, 0.0],
        true_label: Some(format!("c{class}")),
        input_ref: None,
    }
}

fn support_sets(n_classes: usize, n_support: usize) -> BTreeMap<Label, ClassSupportSet> {
    (0..n_classes)
        .map(|c| {
            let center = c as f64 * 10.0;
            (
                format!("c{c}"),
                ClassSupportSet {
                    label: format!("c{c}"),
                    prototype: vec![center, center, 0.0],
                    support_examples: (0..n_support)
                        .map(|s| vec![center + 0.2 * (s + 1) as f64, center, 0.0])
                        .collect(),
                },
            )
        })
        .collect()
}

#[test]
fn test_evaluate_sample_pca_on_separable_data() {
    let sets = support_sets(2, 5);
    let s = sample(0, 0.3);
    let record = evaluate_sample(&BuiltinProjector, &s, &sets, ProjectionMethod::Pca, 0.95, 0.7, 3, 42)
        .unwrap();
    // embedded data is planar, so PCA preserves the structure
    assert!(record.continuity > 0.9);
    assert!(record.trustworthiness > 0.9);
    assert!(record.normalized_stress < 0.1);
    assert!(record.scree.is_some());
}

#[test]
fn test_default_k_stays_finite_on_eight_point_local_set() {
    // a confident sample whose class carries 6 support examples yields an
    // 8-point local set; k = 5 must not push the normalization constant
    // of continuity/trustworthiness to zero
    let sets = support_sets(2, 6);
    let s = sample(0, 0.3);
    let record = evaluate_sample(&BuiltinProjector, &s, &sets, ProjectionMethod::Pca, 0.95, 0.7, 5, 42)
        .unwrap();
    assert!(record.continuity.is_finite());
    assert!(record.trustworthiness.is_finite());
    assert!((0.0..=1.0).contains(&record.continuity));
    assert!((0.0..=1.0).contains(&record.trustworthiness));
}

#[test]
fn test_global_point_set_count_is_exact() {
    // 10 classes, 20 samples per class per half, 5 support examples each
    let n_classes = 10;
    let mut samples = Vec::new();
    for half in 0..2 {
        for class in 0..n_classes {
            for i in 0..20 {
                let mut s = sample(class % 2, i as f64 * 0.01);
                s.true_label = Some(format!("c{class}"));
                s.ood_score = half as f64 * 0.99;
                samples.push(s);
            }
        }
    }
    let sets = support_sets(n_classes, 5);

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let set = build_global_point_set(&samples, &sets, 25, &mut rng);

    // 25 draws x 10 classes x 2 halves, plus (1 prototype + 5 support) x 10
    assert_eq!(set.len(), 25 * 10 * 2 + (1 + 5) * 10);
}

#[test]
fn test_global_sampling_with_replacement_on_small_pool() {
    // pools of 2 samples per class per half still yield num_select draws
    let mut samples = Vec::new();
    for _half in 0..2 {
        for class in 0..2 {
            for i in 0..2 {
                let mut s = sample(class, i as f64);
                s.true_label = Some(format!("c{class}"));
                samples.push(s);
            }
        }
    }
    let sets = support_sets(2, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let set = build_global_point_set(&samples, &sets, 25, &mut rng);
    assert_eq!(set.len(), 25 * 2 * 2 + (1 + 3) * 2);
}

#[test]
fn test_global_sampling_skips_absent_class() {
    // no sample carries class c1, so only c0 contributes draws
    let samples: Vec<Sample> = (0..8).map(|i| sample(0, i as f64 * 0.1)).collect();
    let sets = support_sets(2, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let set = build_global_point_set(&samples, &sets, 10, &mut rng);
    assert_eq!(set.len(), 10 * 2 + (1 + 3) * 2);
}

#[test]
fn test_global_sampling_deterministic_given_seed() {
    let samples: Vec<Sample> = (0..20).map(|i| sample(i % 2, i as f64 * 0.1)).collect();
    let sets = support_sets(2, 3);

    let mut rng_a = ChaCha8Rng::seed_from_u64(42);
    let mut rng_b = ChaCha8Rng::seed_from_u64(42);
    let a = build_global_point_set(&samples, &sets, 5, &mut rng_a);
    let b = build_global_point_set(&samples, &sets, 5, &mut rng_b);
    let coords_a: Vec<_> = a.points.iter().map(|p| p.coordinates.clone()).collect();
    let coords_b: Vec<_> = b.points.iter().map(|p| p.coordinates.clone()).collect();
    assert_eq!(coords_a, coords_b);
}

#[test]
fn test_projection_failure_propagates() {
    // all points identical: PCA reports degenerate input
    let sets: BTreeMap<Label, ClassSupportSet> = [(
        "c0".to_string(),
        ClassSupportSet {
            label: "c0".to_string(),
            prototype: vec![1.0, 1.0, 1.0],
            support_examples: vec![vec![1.0, 1.0, 1.0]; 4],
        },
    )]
    .into_iter()
    .collect();
    let mut s = sample(0, 0.0);
    s.coordinates = vec![1.0, 1.0, 1.0];
    let err = evaluate_sample(&BuiltinProjector, &s, &sets, ProjectionMethod::Pca, 0.95, 0.7, 3, 42)
        .unwrap_err();
    assert!(matches!(err, EvalError::Projection(_)));
}
