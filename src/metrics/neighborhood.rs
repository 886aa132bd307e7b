use crate::error::EvalError;
use crate::metrics::distance::{DistanceMatrix, check_same_shape};

/// Per-point orderings of all other points by ascending distance.
/// Ties are broken by index so the ordering is fully deterministic.
fn orderings(dist: &DistanceMatrix) -> Vec<Vec<usize>> {
    let n = dist.n();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let row = dist.row(i);
        let mut order: Vec<usize> = (0..n).filter(|&j| j != i).collect();
        order.sort_by(|&a, &b| {
            row[a]
                .partial_cmp(&row[b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        out.push(order);
    }
    out
}

/// 1-indexed rank of every point in an ordering (self excluded).
fn ranks_from_order(order: &[usize], n: usize) -> Vec<usize> {
    let mut ranks = vec![0usize; n];
    for (pos, &j) in order.iter().enumerate() {
        ranks[j] = pos + 1;
    }
    ranks
}

/// Penalty sum over points present in the k-NN set of `from` but absent
/// from the k-NN set of `to`, ranked by the `to` ordering.
fn rank_penalty(from: &[Vec<usize>], to: &[Vec<usize>], k: usize, n: usize) -> f64 {
    let mut sum = 0i64;
    for i in 0..n {
        let knn_from = &from[i][..k];
        let knn_to = &to[i][..k];
        let ranks_to = ranks_from_order(&to[i], n);
        for &j in knn_from {
            if !knn_to.contains(&j) {
                sum += ranks_to[j] as i64 - k as i64;
            }
        }
    }
    sum as f64
}

/// Effective neighborhood size: the requested `k` capped at `(N-1)/2`,
/// the largest value for which the normalization constant
/// `2N - 3k - 1` stays positive. An oversized `k` would make that
/// constant zero (N=8, k=5) or negative, turning the metric into NaN
/// or values past its range; the cap mirrors the `k < N/2` validity
/// bound of the trustworthiness formula. Fewer than 3 points leave no
/// valid `k` at all.
fn effective_k(n: usize, k: usize) -> Result<usize, EvalError> {
    if n < 3 {
        return Err(EvalError::TooFewPoints(n));
    }
    Ok(k.min((n - 1) / 2).max(1))
}

fn normalization(n: usize, k: usize) -> f64 {
    2.0 / (n as f64 * k as f64 * (2.0 * n as f64 - 3.0 * k as f64 - 1.0))
}

/// Continuity: penalizes original neighbors lost by the projection.
/// 1.0 for a projection that preserves every k-NN set; the raw value is
/// reported without clamping. `k` is capped per `effective_k`.
pub fn continuity(
    high: &DistanceMatrix,
    low: &DistanceMatrix,
    k: usize,
) -> Result<f64, EvalError> {
    check_same_shape(high, low)?;
    let n = high.n();
    let k = effective_k(n, k)?;
    let orig = orderings(high);
    let proj = orderings(low);
    Ok(1.0 - normalization(n, k) * rank_penalty(&orig, &proj, k, n))
}

/// Trustworthiness: penalizes neighbors invented by the projection, the
/// dual of continuity with ranks taken from the original ordering.
/// `k` is capped per `effective_k`.
pub fn trustworthiness(
    high: &DistanceMatrix,
    low: &DistanceMatrix,
    k: usize,
) -> Result<f64, EvalError> {
    check_same_shape(high, low)?;
    let n = high.n();
    let k = effective_k(n, k)?;
    let orig = orderings(high);
    let proj = orderings(low);
    Ok(1.0 - normalization(n, k) * rank_penalty(&proj, &orig, k, n))
}

#[cfg(test)]
#[path = "../../tests/src_inline/metrics/neighborhood.rs"]
mod tests;
