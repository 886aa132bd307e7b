pub mod json;
pub mod text;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::model::config::EvalProfile;
use crate::model::record::MetricStat;
use crate::pipeline::aggregate::MethodSummary;

/// Everything the renderers need: the knobs the run used plus the
/// aggregated per-method results.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub profile: EvalProfile,
    pub n_folds: usize,
    pub methods: Vec<MethodSummary>,
}

/// `mean (± std)` at fixed 10-decimal precision, so text reports diff
/// cleanly across runs.
pub fn format_avg_std(stat: &MetricStat) -> String {
    format!("{:.10} (\u{b1} {:.10})", stat.mean, stat.std)
}

/// Writes `report.txt` and `summary.json` under `out_dir`, creating the
/// directory if needed.
pub fn write_reports(ctx: &ReportContext, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let report_path = out_dir.join("report.txt");
    fs::write(&report_path, text::render_report_text(ctx))?;

    let summary_path = out_dir.join("summary.json");
    fs::write(&summary_path, json::render_report_json(ctx)?)?;

    info!(out = %out_dir.display(), "reports written");
    Ok(())
}
