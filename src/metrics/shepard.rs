use crate::error::EvalError;
use crate::metrics::distance::{DistanceMatrix, check_same_shape};

/// Shepard diagram correlation: Spearman rank correlation between the
/// row-major flattened distance matrices. Positions correspond to the
/// same point pair on both sides.
///
/// The diagonal zero/zero pairs and both (i,j)/(j,i) entries are included,
/// matching the matrix-flattening convention this metric was defined
/// with; the N tied zeros add a mild bias that is deliberately not
/// corrected here.
///
/// A side with no rank variance, such as a projection that collapses
/// every point pair to the same distance, has no defined correlation
/// and is reported as 0.0.
pub fn shepard_correlation(high: &DistanceMatrix, low: &DistanceMatrix) -> Result<f64, EvalError> {
    check_same_shape(high, low)?;
    let high_ranks = average_ranks(high.values());
    let low_ranks = average_ranks(low.values());
    Ok(pearson(&high_ranks, &low_ranks))
}

/// Fractional ranks with ties assigned the average of their positions,
/// the standard Spearman tie treatment.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j hold equal values; ranks are 1-indexed
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}
