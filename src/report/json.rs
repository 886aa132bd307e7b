use serde::Serialize;

use crate::model::record::MetricSummary;
use crate::report::ReportContext;

/// Machine-readable counterpart of the text report. Bucket order and
/// key names are stable across releases.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub parameters: JsonParameters,
    pub folds: usize,
    pub methods: Vec<JsonMethod>,
}

#[derive(Debug, Serialize)]
pub struct JsonParameters {
    pub ood_tolerance: f64,
    pub confidence_threshold: f64,
    pub n_neighbors: usize,
    pub per_category_cap: usize,
    pub num_select_per_class: usize,
    pub seed: u64,
}

#[derive(Debug, Serialize)]
pub struct JsonMethod {
    pub method: String,
    pub buckets: Vec<JsonBucket>,
}

#[derive(Debug, Serialize)]
pub struct JsonBucket {
    pub granularity: String,
    /// `None` for the pooled local bucket and for global.
    pub category: Option<String>,
    /// `None` when the bucket collected no records.
    pub summary: Option<MetricSummary>,
}

pub fn render_report_json(ctx: &ReportContext) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        parameters: JsonParameters {
            ood_tolerance: ctx.profile.ood_tolerance,
            confidence_threshold: ctx.profile.confidence_threshold,
            n_neighbors: ctx.profile.n_neighbors,
            per_category_cap: ctx.profile.per_category_cap,
            num_select_per_class: ctx.profile.num_select_per_class,
            seed: ctx.profile.base_seed,
        },
        folds: ctx.n_folds,
        methods: ctx
            .methods
            .iter()
            .map(|m| JsonMethod {
                method: m.method.to_string(),
                buckets: buckets_of(m),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

fn buckets_of(method: &crate::pipeline::aggregate::MethodSummary) -> Vec<JsonBucket> {
    let mut buckets: Vec<JsonBucket> = method
        .per_category
        .iter()
        .map(|(category, summary)| JsonBucket {
            granularity: "local".to_string(),
            category: Some(category.name().to_string()),
            summary: summary.clone(),
        })
        .collect();
    buckets.push(JsonBucket {
        granularity: "local".to_string(),
        category: None,
        summary: method.local.clone(),
    });
    buckets.push(JsonBucket {
        granularity: "global".to_string(),
        category: None,
        summary: method.global.clone(),
    });
    buckets
}
