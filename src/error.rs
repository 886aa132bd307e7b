use thiserror::Error;

use crate::model::sample::Label;
use crate::projection::ProjectionFailure;

/// Fatal evaluation errors. None of these are retried; they propagate to
/// the caller of the evaluation entry points.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The two most confident labels of a confused sample resolved to the
    /// same class. Indicates a corrupt upstream confidence vector.
    #[error("label collision: most and second most confident labels are both \"{0}\"")]
    LabelCollision(Label),

    /// A confused sample needs at least two classes to assemble against.
    #[error("confused sample needs at least two classes, confidence vector has {0}")]
    NotEnoughLabels(usize),

    /// A selected label has no prototype/support data.
    #[error("no support set for label \"{0}\"")]
    UnknownLabel(Label),

    /// Distance matrices or point dimensionalities disagree. A
    /// programming error, not an input condition.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Neighborhood metrics are undefined below 3 points; no `k` keeps
    /// their normalization constant positive.
    #[error("neighborhood metrics need at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error(transparent)]
    Projection(#[from] ProjectionFailure),
}
