use crate::model::record::MetricSummary;
use crate::report::{ReportContext, format_avg_std};

pub fn render_report_text(ctx: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str("Projection Fidelity Report\n");
    out.push_str("==========================\n\n");

    out.push_str(&format!("Folds: {}\n", ctx.n_folds));
    out.push_str(&format!(
        "OOD tolerance: {}\n",
        ctx.profile.ood_tolerance
    ));
    out.push_str(&format!(
        "Confidence threshold: {}\n",
        ctx.profile.confidence_threshold
    ));
    out.push_str(&format!("Neighborhood size: {}\n", ctx.profile.n_neighbors));
    out.push_str(&format!(
        "Per-category cap per stratum: {}\n",
        ctx.profile.per_category_cap
    ));
    out.push_str(&format!(
        "Global draws per class: {}\n",
        ctx.profile.num_select_per_class
    ));
    out.push_str(&format!("Seed: {}\n\n", ctx.profile.base_seed));

    for method in &ctx.methods {
        out.push_str(&format!("Method: {}\n", method.method));
        out.push_str("-----------\n");

        for (category, summary) in &method.per_category {
            push_bucket(
                &mut out,
                &format!("local / {}", category.name()),
                summary.as_ref(),
            );
        }
        push_bucket(&mut out, "local / all", method.local.as_ref());
        push_bucket(&mut out, "global", method.global.as_ref());
        out.push('\n');
    }

    out
}

fn push_bucket(out: &mut String, name: &str, summary: Option<&MetricSummary>) {
    match summary {
        None => out.push_str(&format!("{name}: no metrics recorded\n")),
        Some(s) => {
            out.push_str(&format!("{name} ({} records)\n", s.count));
            out.push_str(&format!(
                "  Continuity:          {}\n",
                format_avg_std(&s.continuity)
            ));
            out.push_str(&format!(
                "  Trustworthiness:     {}\n",
                format_avg_std(&s.trustworthiness)
            ));
            out.push_str(&format!(
                "  Normalized stress:   {}\n",
                format_avg_std(&s.normalized_stress)
            ));
            out.push_str(&format!(
                "  Shepard correlation: {}\n",
                format_avg_std(&s.shepard_correlation)
            ));
        }
    }
}
