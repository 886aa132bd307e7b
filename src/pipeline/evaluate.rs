use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::error::EvalError;
use crate::metrics::score_projection;
use crate::model::points::{ClassSupportSet, LabeledPoint, PointSet};
use crate::model::record::MetricRecord;
use crate::model::sample::{Label, Sample};
use crate::pipeline::assemble::assemble;
use crate::pipeline::categorize::categorize;
use crate::projection::{ProjectionMethod, Projector};

/// Single-sample entry point: categorize, assemble the local point set,
/// project it, score the projection.
pub fn evaluate_sample<P: Projector>(
    projector: &P,
    sample: &Sample,
    support_sets: &BTreeMap<Label, ClassSupportSet>,
    method: ProjectionMethod,
    ood_tolerance: f64,
    confidence_threshold: f64,
    k: usize,
    seed: u64,
) -> Result<MetricRecord, EvalError> {
    let category = categorize(sample, ood_tolerance, confidence_threshold);
    let point_set = assemble(sample, category, support_sets)?;
    project_and_score(projector, &point_set, method, k, seed)
}

/// Whole-dataset entry point: one projection over a stratified sample of
/// the dataset plus every prototype and support example.
pub fn evaluate_global<P: Projector>(
    projector: &P,
    all_samples: &[Sample],
    support_sets: &BTreeMap<Label, ClassSupportSet>,
    method: ProjectionMethod,
    num_select_per_class: usize,
    k: usize,
    seed: u64,
) -> Result<MetricRecord, EvalError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let point_set = build_global_point_set(all_samples, support_sets, num_select_per_class, &mut rng);
    project_and_score(projector, &point_set, method, k, seed)
}

pub fn project_and_score<P: Projector>(
    projector: &P,
    point_set: &PointSet,
    method: ProjectionMethod,
    k: usize,
    seed: u64,
) -> Result<MetricRecord, EvalError> {
    let rows = point_set.coordinate_rows();
    debug!(
        method = method.name(),
        n_points = rows.len(),
        "projecting point set"
    );
    let result = projector.project(&rows, method, k, seed)?;
    let projected: Vec<Vec<f64>> = result.coords.iter().map(|c| c.to_vec()).collect();
    score_projection(&rows, &projected, k, result.scree)
}

/// Builds the global point set: for each class, `num_select` samples
/// drawn independently and uniformly from that class's pool in the first
/// (in-distribution) half and again in the second (out-of-distribution)
/// half, with repetition allowed within a class. Drawing with
/// replacement keeps the point-set size constant regardless of class
/// imbalance. Every prototype and support example follows the sampled
/// points.
pub fn build_global_point_set(
    all_samples: &[Sample],
    support_sets: &BTreeMap<Label, ClassSupportSet>,
    num_select_per_class: usize,
    rng: &mut ChaCha8Rng,
) -> PointSet {
    let mid = all_samples.len() / 2;
    let halves = [&all_samples[..mid], &all_samples[mid..]];

    let mut points = Vec::new();
    for half in halves {
        for label in support_sets.keys() {
            let pool: Vec<&Sample> = half
                .iter()
                .filter(|s| s.true_label.as_ref() == Some(label))
                .collect();
            if pool.is_empty() {
                warn!(label = label.as_str(), "empty class pool in stratified sampling, skipping class");
                continue;
            }
            for _ in 0..num_select_per_class {
                let chosen = pool[rng.gen_range(0..pool.len())];
                points.push(LabeledPoint {
                    coordinates: chosen.coordinates.clone(),
                    label: chosen.true_label.clone(),
                    sample_index: chosen.input_ref.as_ref().map(|r| r.index),
                });
            }
        }
    }

    for set in support_sets.values() {
        points.push(LabeledPoint::with_label(
            set.prototype.clone(),
            set.label.clone(),
        ));
        for example in &set.support_examples {
            points.push(LabeledPoint::with_label(example.clone(), set.label.clone()));
        }
    }

    PointSet {
        points,
        focus: None,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/evaluate.rs"]
mod tests;
