pub mod distance;
pub mod neighborhood;
pub mod shepard;
pub mod stress;

use crate::error::EvalError;
use crate::metrics::distance::DistanceMatrix;
use crate::model::record::MetricRecord;

/// Scores one projection against its original points: pairwise distance
/// matrices on both sides, then all four fidelity metrics.
pub fn score_projection(
    original: &[Vec<f64>],
    projected: &[Vec<f64>],
    k: usize,
    scree: Option<Vec<f64>>,
) -> Result<MetricRecord, EvalError> {
    let high = DistanceMatrix::from_points(original)?;
    let low = DistanceMatrix::from_points(projected)?;

    Ok(MetricRecord {
        continuity: neighborhood::continuity(&high, &low, k)?,
        normalized_stress: stress::normalized_stress(&high, &low)?,
        shepard_correlation: shepard::shepard_correlation(&high, &low)?,
        trustworthiness: neighborhood::trustworthiness(&high, &low, k)?,
        scree,
    })
}
