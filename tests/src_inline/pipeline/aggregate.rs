use super::*;
use crate::model::sample::{ConfidenceVector, LabelConfidence};
use crate::projection::BuiltinProjector;

fn sample(class: usize, ood: f64, top_conf: f64, offset: f64) -> Sample {
    let center = class as f64 * 10.0;
    Sample {
        confidences: ConfidenceVector::new(vec![
            LabelConfidence {
                label: format!("c{class}"),
                confidence: top_conf,
            },
            LabelConfidence {
                label: format!("c{}", (class + 1) % 2),
                confidence: 1.0 - top_conf,
            },
        ]),
        ood_score: ood,
        coordinates: vec![center + offset, center - 0.5 * offset, offset],
        true_label: Some(format!("c{class}")),
        input_ref: None,
    }
}

fn fold(n_per_class: usize) -> FoldData {
    let mut samples = Vec::new();
    for half in 0..2 {
        for class in 0..2 {
            for i in 0..n_per_class {
                let offset = 0.1 * (i + 1) as f64 + half as f64 * 0.05;
                samples.push(sample(class, 0.1, 0.9, offset));
            }
        }
    }
    let support_sets = (0..2)
        .map(|c| {
            let center = c as f64 * 10.0;
            (
                format!("c{c}"),
                ClassSupportSet {
                    label: format!("c{c}"),
                    prototype: vec![center, center, 0.0],
                    support_examples: (1..=5)
                        .map(|s| vec![center + 0.3 * s as f64, center, 0.1 * s as f64])
                        .collect(),
                },
            )
        })
        .collect();
    FoldData {
        samples,
        support_sets,
    }
}

#[test]
fn test_identical_folds_have_zero_std() {
    let folds = vec![fold(4), fold(4), fold(4)];
    let agg = Aggregator::new(&BuiltinProjector, EvalProfile::default_v1());
    let reports = agg
        .run(&folds, &[ProjectionMethod::Pca], &Granularity::ALL)
        .unwrap();

    let report = &reports[0];
    let global = report.global.as_ref().unwrap();
    assert_eq!(global.count, 3);
    assert!(global.continuity.std < 1e-7);
    assert!(global.trustworthiness.std < 1e-7);
    assert!(global.normalized_stress.std < 1e-7);
}

#[test]
fn test_per_category_cap_bounds_admissions() {
    // 30 confident samples per half, cap 2 per category per half
    let mut f = fold(15);
    assert_eq!(f.samples.len(), 60);
    f.samples.truncate(60);
    let mut profile = EvalProfile::default_v1();
    profile.per_category_cap = 2;
    profile.n_neighbors = 3;

    let agg = Aggregator::new(&BuiltinProjector, profile);
    let reports = agg
        .run(&[f], &[ProjectionMethod::Pca], &[Granularity::Local])
        .unwrap();

    let report = &reports[0];
    // 2 admitted per half across both halves, all confident
    assert_eq!(report.local.as_ref().unwrap().count, 4);
    let confident = report
        .per_category
        .iter()
        .find(|(c, _)| *c == SampleCategory::Confident)
        .unwrap();
    assert_eq!(confident.1.as_ref().unwrap().count, 4);
}

#[test]
fn test_empty_buckets_are_absent() {
    // every sample is confident, so ood and confused buckets stay empty
    let f = fold(3);
    let mut profile = EvalProfile::default_v1();
    profile.n_neighbors = 3;
    let agg = Aggregator::new(&BuiltinProjector, profile);
    let reports = agg
        .run(&[f], &[ProjectionMethod::Pca], &[Granularity::Local])
        .unwrap();

    let report = &reports[0];
    for (category, summary) in &report.per_category {
        match category {
            SampleCategory::Confident => assert!(summary.is_some()),
            _ => assert!(summary.is_none()),
        }
    }
    assert!(report.global.is_none());
}

#[test]
fn test_categories_route_to_their_buckets() {
    let mut f = fold(2);
    // rewrite halves: mix of ood, confident, confused in each half
    let mut samples = Vec::new();
    for _half in 0..2 {
        samples.push(sample(0, 0.99, 0.9, 0.2)); // ood
        samples.push(sample(0, 0.1, 0.9, 0.4)); // confident
        samples.push(sample(0, 0.1, 0.55, 0.6)); // confused c0 vs c1
        samples.push(sample(1, 0.1, 0.9, 0.3)); // confident
    }
    f.samples = samples;

    let mut profile = EvalProfile::default_v1();
    profile.n_neighbors = 3;
    let agg = Aggregator::new(&BuiltinProjector, profile);
    let reports = agg
        .run(&[f], &[ProjectionMethod::Pca], &[Granularity::Local])
        .unwrap();

    let report = &reports[0];
    let count_of = |cat: SampleCategory| {
        report
            .per_category
            .iter()
            .find(|(c, _)| *c == cat)
            .and_then(|(_, s)| s.as_ref().map(|s| s.count))
            .unwrap_or(0)
    };
    assert_eq!(count_of(SampleCategory::Ood), 2);
    assert_eq!(count_of(SampleCategory::Confident), 4);
    assert_eq!(count_of(SampleCategory::ConfusedClass), 2);
    assert_eq!(report.local.as_ref().unwrap().count, 8);
}

#[test]
fn test_one_summary_per_requested_method() {
    let f = fold(3);
    let mut profile = EvalProfile::default_v1();
    profile.n_neighbors = 3;
    let agg = Aggregator::new(&BuiltinProjector, profile);
    let methods = [ProjectionMethod::Pca, ProjectionMethod::Mds];
    let reports = agg.run(&[f], &methods, &[Granularity::Local]).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].method, ProjectionMethod::Pca);
    assert_eq!(reports[1].method, ProjectionMethod::Mds);
}
