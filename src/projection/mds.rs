use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::projection::{ProjectionFailure, ProjectionResult};

const MAX_ITERS: usize = 300;
const EPS: f64 = 1e-6;

/// Non-metric (ordinal) multidimensional scaling via SMACOF.
///
/// Each iteration fits disparities to the current configuration's
/// distances by isotonic regression over the dissimilarity ordering,
/// then applies the Guttman transform. Seeded random initialization; no
/// clamp for tiny point sets.
pub fn project_mds(points: &[Vec<f64>], seed: u64) -> Result<ProjectionResult, ProjectionFailure> {
    let n = points.len();
    if n == 1 {
        return Ok(ProjectionResult {
            coords: vec![[0.0, 0.0]],
            scree: None,
        });
    }

    let diss = pairwise(points);
    if diss.iter().all(|&d| d <= f64::EPSILON) {
        return Err(ProjectionFailure::Degenerate(
            "zero variance: all points identical".to_string(),
        ));
    }

    // upper-triangle pair order by ascending dissimilarity, index-stable
    let mut pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    pairs.sort_by(|&(a, b), &(c, d)| {
        diss[a * n + b]
            .partial_cmp(&diss[c * n + d])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then((a, b).cmp(&(c, d)))
    });
    let n_pairs = pairs.len() as f64;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut x: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
        .collect();

    let mut old_stress: Option<f64> = None;
    for _ in 0..MAX_ITERS {
        let rows: Vec<Vec<f64>> = x.iter().map(|p| p.to_vec()).collect();
        let dist = pairwise(&rows);

        // isotonic disparities over the dissimilarity ordering
        let ordered: Vec<f64> = pairs.iter().map(|&(i, j)| dist[i * n + j]).collect();
        let fitted = isotonic_non_decreasing(&ordered);

        let mut disp = vec![0.0; n * n];
        let mut disp_sq_sum = 0.0;
        for (&(i, j), &v) in pairs.iter().zip(fitted.iter()) {
            disp[i * n + j] = v;
            disp[j * n + i] = v;
            disp_sq_sum += v * v;
        }
        if disp_sq_sum <= f64::EPSILON {
            return Err(ProjectionFailure::NonConvergence {
                method: "mds",
                reason: "disparities collapsed to zero".to_string(),
            });
        }
        let scale = (n_pairs / disp_sq_sum).sqrt();
        for v in &mut disp {
            *v *= scale;
        }

        let mut stress = 0.0;
        let mut dist_sq_sum = 0.0;
        for &(i, j) in &pairs {
            let diff = disp[i * n + j] - dist[i * n + j];
            stress += diff * diff;
            dist_sq_sum += dist[i * n + j] * dist[i * n + j];
        }
        let normalized = (stress / (2.0 * dist_sq_sum)).sqrt();

        // Guttman transform
        let mut next = vec![[0.0f64; 2]; n];
        for i in 0..n {
            let mut b_row_sum = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = dist[i * n + j];
                let b = if d > f64::EPSILON {
                    -disp[i * n + j] / d
                } else {
                    0.0
                };
                b_row_sum -= b;
                next[i][0] += b * x[j][0];
                next[i][1] += b * x[j][1];
            }
            next[i][0] += b_row_sum * x[i][0];
            next[i][1] += b_row_sum * x[i][1];
            next[i][0] /= n as f64;
            next[i][1] /= n as f64;
        }
        x = next;

        if x.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(ProjectionFailure::NonConvergence {
                method: "mds",
                reason: "configuration diverged to non-finite coordinates".to_string(),
            });
        }

        if let Some(prev) = old_stress {
            if (prev - normalized).abs() < EPS {
                break;
            }
        }
        old_stress = Some(normalized);
    }

    Ok(ProjectionResult {
        coords: x,
        scree: None,
    })
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

/// Pool-adjacent-violators: least-squares non-decreasing fit.
fn isotonic_non_decreasing(values: &[f64]) -> Vec<f64> {
    // (mean, count) blocks
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(values.len());
    for &v in values {
        blocks.push((v, 1));
        while blocks.len() > 1 {
            let last = blocks[blocks.len() - 1];
            let prev = blocks[blocks.len() - 2];
            if prev.0 <= last.0 {
                break;
            }
            blocks.pop();
            blocks.pop();
            let count = prev.1 + last.1;
            let mean = (prev.0 * prev.1 as f64 + last.0 * last.1 as f64) / count as f64;
            blocks.push((mean, count));
        }
    }
    let mut out = Vec::with_capacity(values.len());
    for (mean, count) in blocks {
        out.extend(std::iter::repeat(mean).take(count));
    }
    out
}
