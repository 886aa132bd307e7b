use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::EvalError;
use crate::model::config::EvalProfile;
use crate::model::points::ClassSupportSet;
use crate::model::record::{MetricAccumulator, MetricSummary};
use crate::model::sample::{Label, Sample};
use crate::pipeline::categorize::{categorize, SampleCategory};
use crate::pipeline::evaluate::{evaluate_global, evaluate_sample};
use crate::projection::{ProjectionMethod, Projector};

/// Scope of one evaluation pass: per-sample local point sets, or one
/// stratified point set over the whole fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Local,
    Global,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Local, Granularity::Global];

    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Local => "local",
            Granularity::Global => "global",
        }
    }
}

/// One evaluation fold: a test set plus the class support sets it is
/// scored against. Folds are aggregated but never mixed.
#[derive(Debug, Clone)]
pub struct FoldData {
    pub samples: Vec<Sample>,
    pub support_sets: BTreeMap<Label, ClassSupportSet>,
}

/// Aggregated statistics for one projection method across all folds.
#[derive(Debug, Clone)]
pub struct MethodSummary {
    pub method: ProjectionMethod,
    /// Per-category local buckets, in `SampleCategory::ALL` order.
    /// `None` when no sample of that category was evaluated.
    pub per_category: Vec<(SampleCategory, Option<MetricSummary>)>,
    /// All local evaluations pooled across categories.
    pub local: Option<MetricSummary>,
    pub global: Option<MetricSummary>,
}

/// Drives the full evaluation: categorize each sample, build and score
/// its point set, pool the records into per-method buckets.
pub struct Aggregator<'a, P: Projector> {
    projector: &'a P,
    profile: EvalProfile,
}

impl<'a, P: Projector> Aggregator<'a, P> {
    pub fn new(projector: &'a P, profile: EvalProfile) -> Self {
        Self { projector, profile }
    }

    pub fn profile(&self) -> &EvalProfile {
        &self.profile
    }

    /// Evaluates every requested method over every fold. Any projection
    /// or assembly failure aborts the run; partially filled buckets are
    /// never reported.
    pub fn run(
        &self,
        folds: &[FoldData],
        methods: &[ProjectionMethod],
        granularities: &[Granularity],
    ) -> Result<Vec<MethodSummary>, EvalError> {
        let mut out = Vec::with_capacity(methods.len());
        for &method in methods {
            out.push(self.run_method(folds, method, granularities)?);
        }
        Ok(out)
    }

    fn run_method(
        &self,
        folds: &[FoldData],
        method: ProjectionMethod,
        granularities: &[Granularity],
    ) -> Result<MethodSummary, EvalError> {
        let p = &self.profile;
        let mut per_category = vec![MetricAccumulator::default(); SampleCategory::ALL.len()];
        let mut local = MetricAccumulator::default();
        let mut global = MetricAccumulator::default();

        for (fold_idx, fold) in folds.iter().enumerate() {
            if granularities.contains(&Granularity::Local) {
                self.run_local_fold(fold, method, &mut per_category, &mut local)?;
            }
            if granularities.contains(&Granularity::Global) {
                debug!(fold = fold_idx, method = method.name(), "global evaluation");
                let record = evaluate_global(
                    self.projector,
                    &fold.samples,
                    &fold.support_sets,
                    method,
                    p.num_select_per_class,
                    p.n_neighbors,
                    p.base_seed,
                )?;
                global.push(&record);
            }
        }

        info!(
            method = method.name(),
            local = local.count(),
            global = global.count(),
            "method evaluated"
        );

        let per_category = SampleCategory::ALL
            .iter()
            .zip(&per_category)
            .map(|(&category, acc)| {
                let summary = acc.summarize();
                if summary.is_none() {
                    warn!(
                        method = method.name(),
                        category = category.name(),
                        "empty metric bucket"
                    );
                }
                (category, summary)
            })
            .collect();

        Ok(MethodSummary {
            method,
            per_category,
            local: local.summarize(),
            global: global.summarize(),
        })
    }

    /// Local pass over one fold. The fold is split in half and each half
    /// admits at most `per_category_cap` samples per category; samples
    /// beyond the cap are skipped, not scored.
    fn run_local_fold(
        &self,
        fold: &FoldData,
        method: ProjectionMethod,
        per_category: &mut [MetricAccumulator],
        local: &mut MetricAccumulator,
    ) -> Result<(), EvalError> {
        let p = &self.profile;
        let mid = fold.samples.len() / 2;
        for half in [&fold.samples[..mid], &fold.samples[mid..]] {
            let mut admitted = [0usize; SampleCategory::ALL.len()];
            for sample in half {
                let category = categorize(sample, p.ood_tolerance, p.confidence_threshold);
                let slot = category_slot(category);
                if admitted[slot] >= p.per_category_cap {
                    continue;
                }
                admitted[slot] += 1;

                let record = evaluate_sample(
                    self.projector,
                    sample,
                    &fold.support_sets,
                    method,
                    p.ood_tolerance,
                    p.confidence_threshold,
                    p.n_neighbors,
                    p.base_seed,
                )?;
                per_category[slot].push(&record);
                local.push(&record);
            }
        }
        Ok(())
    }
}

fn category_slot(category: SampleCategory) -> usize {
    SampleCategory::ALL
        .iter()
        .position(|&c| c == category)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/aggregate.rs"]
mod tests;
