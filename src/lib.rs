//! Quality metrics for 2-D projections of classifier embedding spaces.
//!
//! Given a test set of classifier outputs (per-class confidences, an
//! out-of-distribution score, embedding coordinates) and per-class
//! support sets (prototype plus training examples), this crate builds
//! the point sets a projection-based visualization would show, projects
//! them with PCA, t-SNE, MDS or UMAP, and scores how faithfully the
//! 2-D picture preserves the high-dimensional structure: continuity,
//! trustworthiness, normalized stress, and Shepard rank correlation.
//!
//! Every projection is seeded, so repeated runs over the same data
//! produce identical metrics.

pub mod error;
pub mod input;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod projection;
pub mod report;

pub use error::EvalError;
pub use model::config::EvalProfile;
pub use model::record::{MetricRecord, MetricSummary};
pub use pipeline::aggregate::{Aggregator, FoldData, Granularity, MethodSummary};
pub use pipeline::categorize::SampleCategory;
pub use pipeline::evaluate::{evaluate_global, evaluate_sample};
pub use projection::{BuiltinProjector, ProjectionMethod, Projector};
