use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub mod dataset;

use crate::model::points::ClassSupportSet;
use crate::model::sample::{Label, Sample};
use crate::pipeline::aggregate::FoldData;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid input in {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },
}

pub fn load_samples(path: &Path) -> Result<Vec<Sample>, InputError> {
    dataset::load_samples(path)
}

pub fn load_support_sets(path: &Path) -> Result<BTreeMap<Label, ClassSupportSet>, InputError> {
    dataset::load_support_sets(path)
}

/// Pairs each samples file with its support file into one fold. A single
/// support file is reused across all folds; otherwise the counts must
/// match one to one.
pub fn load_folds(
    sample_paths: &[PathBuf],
    support_paths: &[PathBuf],
) -> Result<Vec<FoldData>, InputError> {
    if support_paths.len() != 1 && support_paths.len() != sample_paths.len() {
        let path = support_paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("<missing>"));
        return Err(InputError::InvalidInput {
            path,
            reason: format!(
                "expected 1 or {} support files, got {}",
                sample_paths.len(),
                support_paths.len()
            ),
        });
    }

    let mut folds = Vec::with_capacity(sample_paths.len());
    for (i, sample_path) in sample_paths.iter().enumerate() {
        let support_path = if support_paths.len() == 1 {
            &support_paths[0]
        } else {
            &support_paths[i]
        };
        let samples = load_samples(sample_path)?;
        let support_sets = load_support_sets(support_path)?;
        info!(
            fold = i,
            samples = samples.len(),
            classes = support_sets.len(),
            path = %sample_path.display(),
            "fold loaded"
        );
        folds.push(FoldData {
            samples,
            support_sets,
        });
    }
    Ok(folds)
}
