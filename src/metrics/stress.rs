use crate::error::EvalError;
use crate::metrics::distance::{DistanceMatrix, check_same_shape};

/// Normalized stress: `sum((high - low)^2) / sum(high^2)` over the full
/// matrices. The zero diagonal contributes nothing to either sum. Lower
/// is better; 0 is a perfect projection.
pub fn normalized_stress(high: &DistanceMatrix, low: &DistanceMatrix) -> Result<f64, EvalError> {
    check_same_shape(high, low)?;
    let mut num = 0.0;
    let mut den = 0.0;
    for (h, l) in high.values().iter().zip(low.values().iter()) {
        let diff = h - l;
        num += diff * diff;
        den += h * h;
    }
    Ok(num / den)
}
