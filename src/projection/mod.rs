pub mod mds;
pub mod pca;
pub mod tsne;
pub mod umap;

use thiserror::Error;

/// The four interchangeable projection methods. A closed set dispatched
/// by pattern matching so adding a method is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionMethod {
    Pca,
    Tsne,
    Mds,
    Umap,
}

impl ProjectionMethod {
    pub const ALL: [ProjectionMethod; 4] = [
        ProjectionMethod::Pca,
        ProjectionMethod::Tsne,
        ProjectionMethod::Mds,
        ProjectionMethod::Umap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionMethod::Pca => "pca",
            ProjectionMethod::Tsne => "tsne",
            ProjectionMethod::Mds => "mds",
            ProjectionMethod::Umap => "umap",
        }
    }
}

impl std::str::FromStr for ProjectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pca" => Ok(ProjectionMethod::Pca),
            "tsne" => Ok(ProjectionMethod::Tsne),
            "mds" => Ok(ProjectionMethod::Mds),
            "umap" => Ok(ProjectionMethod::Umap),
            other => Err(format!("unknown projection method: {other}")),
        }
    }
}

impl std::fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 2-D coordinates in input order, plus explained-variance ratios when
/// the method retains them (PCA only).
#[derive(Debug, Clone)]
pub struct ProjectionResult {
    pub coords: Vec<[f64; 2]>,
    pub scree: Option<Vec<f64>>,
}

/// Numerical failure of a projection routine. Surfaced to the caller,
/// never retried, never silently defaulted.
#[derive(Debug, Error)]
pub enum ProjectionFailure {
    #[error("projection input is empty")]
    EmptyInput,

    #[error("degenerate input: {0}")]
    Degenerate(String),

    #[error("{method} did not converge: {reason}")]
    NonConvergence { method: &'static str, reason: String },
}

/// The projection capability consumed by the evaluation pipeline. The
/// built-in implementation lives in this module; callers may substitute
/// an external engine.
pub trait Projector {
    fn project(
        &self,
        points: &[Vec<f64>],
        method: ProjectionMethod,
        n_neighbors: usize,
        seed: u64,
    ) -> Result<ProjectionResult, ProjectionFailure>;
}

/// Built-in implementations of all four methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProjector;

impl Projector for BuiltinProjector {
    fn project(
        &self,
        points: &[Vec<f64>],
        method: ProjectionMethod,
        n_neighbors: usize,
        seed: u64,
    ) -> Result<ProjectionResult, ProjectionFailure> {
        validate_input(points)?;
        match method {
            ProjectionMethod::Pca => pca::project_pca(points),
            ProjectionMethod::Tsne => tsne::project_tsne(points, seed),
            ProjectionMethod::Mds => mds::project_mds(points, seed),
            ProjectionMethod::Umap => umap::project_umap(points, n_neighbors, seed),
        }
    }
}

fn validate_input(points: &[Vec<f64>]) -> Result<(), ProjectionFailure> {
    if points.is_empty() {
        return Err(ProjectionFailure::EmptyInput);
    }
    let dims = points[0].len();
    if dims == 0 {
        return Err(ProjectionFailure::Degenerate(
            "points have zero dimensions".to_string(),
        ));
    }
    for p in points {
        if p.len() != dims {
            return Err(ProjectionFailure::Degenerate(format!(
                "inconsistent dimensionality: {} vs {}",
                dims,
                p.len()
            )));
        }
        if p.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionFailure::Degenerate(
                "non-finite coordinate in input".to_string(),
            ));
        }
    }
    Ok(())
}
