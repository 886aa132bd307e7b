use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::projection::pca::project_pca;
use crate::projection::{ProjectionFailure, ProjectionResult};

// curve parameters for min_dist 0.1, spread 1.0
const CURVE_A: f64 = 1.577;
const CURVE_B: f64 = 0.8951;
const N_EPOCHS: usize = 300;
const NEGATIVE_SAMPLES: usize = 5;
const GRAD_CLIP: f64 = 4.0;

/// Compact density-aware UMAP: exact k-NN graph, smooth-knn bandwidth
/// search, fuzzy-union symmetrization with local-radius edge weighting,
/// then negative-sampling SGD from a PCA initialization.
///
/// The effective neighborhood size is `min(D, N, requested)`, floored
/// at 2 and capped at `N - 1`: the graph never asks for more neighbors
/// than other points exist, and a single-neighbor graph carries no
/// usable topology.
pub fn project_umap(
    points: &[Vec<f64>],
    requested_neighbors: usize,
    seed: u64,
) -> Result<ProjectionResult, ProjectionFailure> {
    let n = points.len();
    let d = points[0].len();
    if n < 4 {
        return Err(ProjectionFailure::Degenerate(format!(
            "umap needs at least 4 points, got {n}"
        )));
    }

    let k = requested_neighbors.min(d).min(n).max(2).min(n - 1);

    let dist = pairwise(points);
    if dist.iter().all(|&v| v <= f64::EPSILON) {
        return Err(ProjectionFailure::Degenerate(
            "zero variance: all points identical".to_string(),
        ));
    }

    // k nearest neighbors per point, index-stable ordering
    let mut knn: Vec<Vec<usize>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut order: Vec<usize> = (0..n).filter(|&j| j != i).collect();
        order.sort_by(|&a, &b| {
            dist[i * n + a]
                .partial_cmp(&dist[i * n + b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        order.truncate(k);
        knn.push(order);
    }

    // rho: distance to nearest neighbor; sigma: smooth-knn bandwidth
    let target = (k as f64).log2();
    let mut rho = vec![0.0; n];
    let mut sigma = vec![1.0; n];
    for i in 0..n {
        rho[i] = knn[i]
            .iter()
            .map(|&j| dist[i * n + j])
            .filter(|&v| v > 0.0)
            .fold(f64::INFINITY, f64::min);
        if !rho[i].is_finite() {
            rho[i] = 0.0;
        }

        let mut lo = 0.0f64;
        let mut hi = f64::INFINITY;
        let mut mid = 1.0f64;
        for _ in 0..64 {
            let sum: f64 = knn[i]
                .iter()
                .map(|&j| (-(dist[i * n + j] - rho[i]).max(0.0) / mid).exp())
                .sum();
            if (sum - target).abs() < 1e-5 {
                break;
            }
            if sum > target {
                hi = mid;
                mid = (lo + hi) / 2.0;
            } else {
                lo = mid;
                mid = if hi.is_finite() { (lo + hi) / 2.0 } else { mid * 2.0 };
            }
        }
        sigma[i] = mid.max(1e-12);
    }

    // directed memberships, then fuzzy union: w = a + b - a*b
    let mut member = vec![0.0; n * n];
    for i in 0..n {
        for &j in &knn[i] {
            member[i * n + j] = (-(dist[i * n + j] - rho[i]).max(0.0) / sigma[i]).exp();
        }
    }
    let mut graph = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let a = member[i * n + j];
            let b = member[j * n + i];
            let w = a + b - a * b;
            graph[i * n + j] = w;
            graph[j * n + i] = w;
        }
    }

    // density weighting: edges between dense neighborhoods count more,
    // standing in for the full densmap correlation term
    let radius: Vec<f64> = (0..n)
        .map(|i| {
            let sum: f64 = knn[i].iter().map(|&j| dist[i * n + j]).sum();
            (sum / k as f64).max(1e-12)
        })
        .collect();
    let mean_radius = radius.iter().sum::<f64>() / n as f64;
    for i in 0..n {
        for j in (i + 1)..n {
            if graph[i * n + j] > 0.0 {
                let factor = (mean_radius * mean_radius / (radius[i] * radius[j]))
                    .sqrt()
                    .clamp(0.25, 4.0);
                let w = (graph[i * n + j] * factor).min(1.0);
                graph[i * n + j] = w;
                graph[j * n + i] = w;
            }
        }
    }

    // deterministic initialization from the principal plane
    let init = project_pca(points)?;
    let max_abs = init
        .coords
        .iter()
        .flat_map(|c| c.iter().map(|v| v.abs()))
        .fold(0.0, f64::max)
        .max(1e-12);
    let mut y: Vec<[f64; 2]> = init
        .coords
        .iter()
        .map(|c| [c[0] / max_abs * 10.0, c[1] / max_abs * 10.0])
        .collect();

    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    let mut max_w = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let w = graph[i * n + j];
            if w > 0.0 {
                edges.push((i, j, w));
                max_w = max_w.max(w);
            }
        }
    }
    if edges.is_empty() {
        return Err(ProjectionFailure::NonConvergence {
            method: "umap",
            reason: "neighbor graph has no edges".to_string(),
        });
    }

    let epochs_per_sample: Vec<f64> = edges.iter().map(|&(_, _, w)| max_w / w).collect();
    let mut next_sample: Vec<f64> = epochs_per_sample.clone();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for epoch in 1..=N_EPOCHS {
        let alpha = 1.0 - (epoch - 1) as f64 / N_EPOCHS as f64;
        for (e, &(i, j, _)) in edges.iter().enumerate() {
            if next_sample[e] > epoch as f64 {
                continue;
            }
            next_sample[e] += epochs_per_sample[e];

            attract(&mut y, i, j, alpha);
            for _ in 0..NEGATIVE_SAMPLES {
                let other = rng.gen_range(0..n);
                if other != i {
                    repulse(&mut y, i, other, alpha);
                }
            }
        }
    }

    if y.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(ProjectionFailure::NonConvergence {
            method: "umap",
            reason: "embedding diverged to non-finite coordinates".to_string(),
        });
    }

    Ok(ProjectionResult {
        coords: y,
        scree: None,
    })
}

fn attract(y: &mut [[f64; 2]], i: usize, j: usize, alpha: f64) {
    let dx = y[i][0] - y[j][0];
    let dy = y[i][1] - y[j][1];
    let d_sq = dx * dx + dy * dy;
    if d_sq <= 0.0 {
        return;
    }
    let coeff = -2.0 * CURVE_A * CURVE_B * d_sq.powf(CURVE_B - 1.0)
        / (1.0 + CURVE_A * d_sq.powf(CURVE_B));
    let gx = clip(coeff * dx) * alpha;
    let gy = clip(coeff * dy) * alpha;
    y[i][0] += gx;
    y[i][1] += gy;
    y[j][0] -= gx;
    y[j][1] -= gy;
}

fn repulse(y: &mut [[f64; 2]], i: usize, j: usize, alpha: f64) {
    let dx = y[i][0] - y[j][0];
    let dy = y[i][1] - y[j][1];
    let d_sq = dx * dx + dy * dy;
    let coeff = 2.0 * CURVE_B / ((0.001 + d_sq) * (1.0 + CURVE_A * d_sq.powf(CURVE_B)));
    y[i][0] += clip(coeff * dx) * alpha;
    y[i][1] += clip(coeff * dy) * alpha;
}

#[inline]
fn clip(v: f64) -> f64 {
    v.clamp(-GRAD_CLIP, GRAD_CLIP)
}

fn pairwise(points: &[Vec<f64>]) -> Vec<f64> {
    let n = points.len();
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d: f64 = points[i]
                .iter()
                .zip(points[j].iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            out[i * n + j] = d;
            out[j * n + i] = d;
        }
    }
    out
}
