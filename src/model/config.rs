/// Evaluation knobs, passed explicitly rather than read from process-wide
/// constants so parameter sweeps are ordinary calls.
#[derive(Debug, Clone)]
pub struct EvalProfile {
    /// OOD scores above this make a sample `Ood` regardless of confidence.
    pub ood_tolerance: f64,
    /// Max confidence above this makes a non-OOD sample `Confident`.
    pub confidence_threshold: f64,
    /// Neighborhood size for continuity / trustworthiness and the
    /// neighbor-based projection methods.
    pub n_neighbors: usize,
    /// Samples evaluated per category per stratum before the rest are
    /// skipped. A sampling policy to bound projection cost, not a
    /// correctness rule.
    pub per_category_cap: usize,
    /// Stratified draws per true class when building the global point set.
    pub num_select_per_class: usize,
    /// Seed handed to every stochastic projection and to the stratified
    /// sampler.
    pub base_seed: u64,
}

impl EvalProfile {
    pub fn default_v1() -> Self {
        Self {
            ood_tolerance: 0.95,
            confidence_threshold: 0.7,
            n_neighbors: 5,
            per_category_cap: 11,
            num_select_per_class: 25,
            base_seed: 42,
        }
    }
}
