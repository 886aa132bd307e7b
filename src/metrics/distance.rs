use crate::error::EvalError;

/// Symmetric pairwise Euclidean distance matrix with zero diagonal,
/// stored flat in row-major order.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the full matrix from row-per-point coordinates. Fails
    /// loudly on ragged dimensionality.
    pub fn from_points(points: &[Vec<f64>]) -> Result<Self, EvalError> {
        let n = points.len();
        let dims = points.first().map(|p| p.len()).unwrap_or(0);
        for (i, p) in points.iter().enumerate() {
            if p.len() != dims {
                return Err(EvalError::ShapeMismatch(format!(
                    "point 0 has {} dimensions but point {} has {}",
                    dims,
                    i,
                    p.len()
                )));
            }
        }

        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(&points[i], &points[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        Ok(Self { n, values })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Row-major flattened entries, diagonal included.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Checks that two matrices describe the same number of points.
pub fn check_same_shape(high: &DistanceMatrix, low: &DistanceMatrix) -> Result<(), EvalError> {
    if high.n() != low.n() {
        return Err(EvalError::ShapeMismatch(format!(
            "distance matrices disagree: {}x{} vs {}x{}",
            high.n(),
            high.n(),
            low.n(),
            low.n()
        )));
    }
    Ok(())
}

#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
