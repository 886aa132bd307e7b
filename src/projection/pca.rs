use nalgebra::{DMatrix, SymmetricEigen};

use crate::projection::{ProjectionFailure, ProjectionResult};

/// Principal component analysis via the Gram matrix, so the
/// eigendecomposition is `N x N` regardless of input dimensionality.
///
/// Retains `min(D, N, 5)` components internally for the scree values and
/// reports the first two as coordinates. Deterministic.
pub fn project_pca(points: &[Vec<f64>]) -> Result<ProjectionResult, ProjectionFailure> {
    let n = points.len();
    let d = points[0].len();

    // center the data
    let mut mean = vec![0.0; d];
    for p in points {
        for (m, v) in mean.iter_mut().zip(p.iter()) {
            *m += v;
        }
    }
    for m in &mut mean {
        *m /= n as f64;
    }
    let centered: Vec<Vec<f64>> = points
        .iter()
        .map(|p| p.iter().zip(mean.iter()).map(|(v, m)| v - m).collect())
        .collect();

    let denom = (n as f64 - 1.0).max(1.0);
    let total_variance: f64 = centered
        .iter()
        .map(|row| row.iter().map(|v| v * v).sum::<f64>())
        .sum::<f64>()
        / denom;
    if total_variance <= f64::EPSILON {
        return Err(ProjectionFailure::Degenerate(
            "zero variance: all points identical".to_string(),
        ));
    }

    // gram[i][j] = <x_i, x_j> / (n - 1); its nonzero eigenvalues are the
    // covariance eigenvalues and its eigenvectors give the PC scores
    let gram = DMatrix::from_fn(n, n, |i, j| {
        centered[i]
            .iter()
            .zip(centered[j].iter())
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / denom
    });

    let eig = SymmetricEigen::new(gram);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eig.eigenvalues[b]
            .partial_cmp(&eig.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n_components = d.min(n).min(5);
    let mut scree = Vec::with_capacity(n_components);
    let mut scores: Vec<Vec<f64>> = Vec::with_capacity(n_components);
    for &c in order.iter().take(n_components) {
        let lambda = eig.eigenvalues[c].max(0.0);
        scree.push(lambda / total_variance);
        let scale = (lambda * denom).sqrt();
        scores.push((0..n).map(|i| eig.eigenvectors[(i, c)] * scale).collect());
    }

    let coords = (0..n)
        .map(|i| {
            let x = scores[0][i];
            let y = if scores.len() > 1 { scores[1][i] } else { 0.0 };
            [x, y]
        })
        .collect();

    Ok(ProjectionResult {
        coords,
        scree: Some(scree),
    })
}
