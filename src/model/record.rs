use serde::Serialize;

/// Quality metrics for one (point set, projection) pair. Never mutated
/// after creation.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRecord {
    pub continuity: f64,
    pub normalized_stress: f64,
    pub shepard_correlation: f64,
    pub trustworthiness: f64,
    /// Explained-variance ratios of the retained components, PCA only.
    pub scree: Option<Vec<f64>>,
}

/// Running sum / sum-of-squares for one scalar metric. Order-independent,
/// so reduction results do not depend on accumulation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatAccumulator {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl StatAccumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn merge(&mut self, other: &StatAccumulator) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Population standard deviation. Rounding can push the variance
    /// estimate slightly negative for identical inputs, hence the clamp.
    pub fn population_std(&self) -> f64 {
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0).sqrt()
    }
}

/// Accumulates MetricRecords for one (method, granularity, category)
/// bucket.
#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    continuity: StatAccumulator,
    normalized_stress: StatAccumulator,
    shepard_correlation: StatAccumulator,
    trustworthiness: StatAccumulator,
}

impl MetricAccumulator {
    pub fn push(&mut self, record: &MetricRecord) {
        self.continuity.push(record.continuity);
        self.normalized_stress.push(record.normalized_stress);
        self.shepard_correlation.push(record.shepard_correlation);
        self.trustworthiness.push(record.trustworthiness);
    }

    pub fn merge(&mut self, other: &MetricAccumulator) {
        self.continuity.merge(&other.continuity);
        self.normalized_stress.merge(&other.normalized_stress);
        self.shepard_correlation.merge(&other.shepard_correlation);
        self.trustworthiness.merge(&other.trustworthiness);
    }

    pub fn count(&self) -> usize {
        self.continuity.count()
    }

    /// `None` for an empty bucket; statistics are never computed over
    /// zero records.
    pub fn summarize(&self) -> Option<MetricSummary> {
        if self.count() == 0 {
            return None;
        }
        Some(MetricSummary {
            count: self.count(),
            continuity: MetricStat::of(&self.continuity),
            normalized_stress: MetricStat::of(&self.normalized_stress),
            shepard_correlation: MetricStat::of(&self.shepard_correlation),
            trustworthiness: MetricStat::of(&self.trustworthiness),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricStat {
    pub mean: f64,
    pub std: f64,
}

impl MetricStat {
    fn of(acc: &StatAccumulator) -> Self {
        Self {
            mean: acc.mean(),
            std: acc.population_std(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub count: usize,
    pub continuity: MetricStat,
    pub normalized_stress: MetricStat,
    pub shepard_correlation: MetricStat,
    pub trustworthiness: MetricStat,
}
