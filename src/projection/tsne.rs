use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::projection::{ProjectionFailure, ProjectionResult};

/// Fixed neighborhood-size parameter. The point sets this engine
/// projects are small, so the value is not runtime-negotiable.
const PERPLEXITY: f64 = 5.0;
const EARLY_EXAGGERATION: f64 = 12.0;
const EXAGGERATION_ITERS: usize = 250;
const MAX_ITERS: usize = 750;
const LEARNING_RATE: f64 = 200.0;
const MIN_PROB: f64 = 1e-12;

/// Exact t-SNE: per-point bandwidth search to match the perplexity,
/// gradient descent with early exaggeration, momentum and adaptive
/// gains. Seeded gaussian initialization; deterministic given the seed.
///
/// No clamp is applied for tiny point sets: fewer points than the
/// perplexity is a failure, by design.
pub fn project_tsne(points: &[Vec<f64>], seed: u64) -> Result<ProjectionResult, ProjectionFailure> {
    let n = points.len();
    if (n as f64) <= PERPLEXITY {
        return Err(ProjectionFailure::Degenerate(format!(
            "perplexity {PERPLEXITY} requires more than {PERPLEXITY} points, got {n}"
        )));
    }

    let sq = squared_distances(points);
    if sq.iter().all(|&d| d <= f64::EPSILON) {
        return Err(ProjectionFailure::Degenerate(
            "zero variance: all points identical".to_string(),
        ));
    }

    let p = joint_probabilities(&sq, n);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1e-4).expect("valid normal parameters");
    let mut y: Vec<[f64; 2]> = (0..n)
        .map(|_| [normal.sample(&mut rng), normal.sample(&mut rng)])
        .collect();

    let mut update = vec![[0.0f64; 2]; n];
    let mut gains = vec![[1.0f64; 2]; n];

    for iter in 0..MAX_ITERS {
        let exaggeration = if iter < EXAGGERATION_ITERS {
            EARLY_EXAGGERATION
        } else {
            1.0
        };
        let momentum = if iter < EXAGGERATION_ITERS { 0.5 } else { 0.8 };

        // student-t affinities in the embedding
        let mut num = vec![0.0f64; n * n];
        let mut num_sum = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = y[i][0] - y[j][0];
                let dy = y[i][1] - y[j][1];
                let v = 1.0 / (1.0 + dx * dx + dy * dy);
                num[i * n + j] = v;
                num[j * n + i] = v;
                num_sum += 2.0 * v;
            }
        }

        let mut grads = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let q = (num[i * n + j] / num_sum).max(MIN_PROB);
                let mult = (exaggeration * p[i * n + j] - q) * num[i * n + j];
                grads[i][0] += 4.0 * mult * (y[i][0] - y[j][0]);
                grads[i][1] += 4.0 * mult * (y[i][1] - y[j][1]);
            }
        }

        for i in 0..n {
            let grad = grads[i];
            for axis in 0..2 {
                let g = if grad[axis].signum() != update[i][axis].signum() {
                    gains[i][axis] + 0.2
                } else {
                    gains[i][axis] * 0.8
                };
                gains[i][axis] = g.max(0.01);
                update[i][axis] =
                    momentum * update[i][axis] - LEARNING_RATE * gains[i][axis] * grad[axis];
                y[i][axis] += update[i][axis];
            }
        }

        // keep the embedding centered
        let mut mean = [0.0f64; 2];
        for point in &y {
            mean[0] += point[0];
            mean[1] += point[1];
        }
        mean[0] /= n as f64;
        mean[1] /= n as f64;
        for point in &mut y {
            point[0] -= mean[0];
            point[1] -= mean[1];
        }
    }

    if y.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(ProjectionFailure::NonConvergence {
            method: "tsne",
            reason: "embedding diverged to non-finite coordinates".to_string(),
        });
    }

    Ok(ProjectionResult {
        coords: y,
        scree: None,
    })
}

fn squared_distances(points: &[Vec<f64>]) -> Vec<f64> {
    let n = points.len();
    let mut sq = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d: f64 = points[i]
                .iter()
                .zip(points[j].iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            sq[i * n + j] = d;
            sq[j * n + i] = d;
        }
    }
    sq
}

/// Symmetrized joint probabilities with per-point precision found by
/// binary search so each conditional distribution has the target
/// perplexity.
fn joint_probabilities(sq: &[f64], n: usize) -> Vec<f64> {
    let target_entropy = PERPLEXITY.ln();
    let mut cond = vec![0.0; n * n];

    for i in 0..n {
        let mut beta = 1.0f64;
        let mut beta_min = f64::NEG_INFINITY;
        let mut beta_max = f64::INFINITY;

        for _ in 0..50 {
            let mut sum = 0.0;
            let mut weighted = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let pj = (-sq[i * n + j] * beta).exp();
                sum += pj;
                weighted += sq[i * n + j] * pj;
            }
            if sum <= 0.0 {
                break;
            }
            let entropy = sum.ln() + beta * weighted / sum;
            let diff = entropy - target_entropy;
            if diff.abs() < 1e-5 {
                break;
            }
            if diff > 0.0 {
                beta_min = beta;
                beta = if beta_max.is_finite() {
                    (beta + beta_max) / 2.0
                } else {
                    beta * 2.0
                };
            } else {
                beta_max = beta;
                beta = if beta_min.is_finite() {
                    (beta + beta_min) / 2.0
                } else {
                    beta / 2.0
                };
            }
        }

        let mut sum = 0.0;
        for j in 0..n {
            if i != j {
                let pj = (-sq[i * n + j] * beta).exp();
                cond[i * n + j] = pj;
                sum += pj;
            }
        }
        if sum > 0.0 {
            for j in 0..n {
                cond[i * n + j] /= sum;
            }
        }
    }

    let mut joint = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                joint[i * n + j] =
                    ((cond[i * n + j] + cond[j * n + i]) / (2.0 * n as f64)).max(MIN_PROB);
            }
        }
    }
    joint
}
