use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scatterqc::input::load_folds;
use scatterqc::pipeline::aggregate::{Aggregator, Granularity};
use scatterqc::report::{ReportContext, format_avg_std, write_reports};
use scatterqc::{BuiltinProjector, EvalProfile, ProjectionMethod};

#[derive(Parser)]
#[command(name = "scatterqc", version, about = "Scores how faithfully 2-D projections preserve classifier embedding structure")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate projection fidelity over one or more folds.
    Run(RunArgs),
    /// Re-run the local evaluation over a grid of category thresholds.
    Sweep(SweepArgs),
}

#[derive(Args)]
struct DataArgs {
    /// Samples files, one per fold.
    #[arg(long = "samples", required = true, num_args = 1..)]
    samples: Vec<PathBuf>,

    /// Support files: one per fold, or a single file reused for every fold.
    #[arg(long = "support", required = true, num_args = 1..)]
    support: Vec<PathBuf>,

    /// Projection methods to evaluate.
    #[arg(long, value_delimiter = ',', default_values_t = ProjectionMethod::ALL)]
    methods: Vec<ProjectionMethod>,

    #[arg(long, default_value_t = 5)]
    n_neighbors: usize,

    #[arg(long, default_value_t = 11)]
    per_category_cap: usize,

    #[arg(long, default_value_t = 25)]
    num_select: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Output directory for report.txt and summary.json.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 0.95)]
    ood_tolerance: f64,

    #[arg(long, default_value_t = 0.7)]
    confidence_threshold: f64,

    /// Skip the whole-dataset (global) evaluation.
    #[arg(long)]
    local_only: bool,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    data: DataArgs,

    /// OOD tolerances to sweep.
    #[arg(long, value_delimiter = ',', default_values_t = [0.9, 0.95, 0.99])]
    ood_tolerances: Vec<f64>,

    /// Confidence thresholds to sweep.
    #[arg(long, value_delimiter = ',', default_values_t = [0.5, 0.7, 0.9])]
    confidence_thresholds: Vec<f64>,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), String> {
    match Cli::parse().command {
        Command::Run(args) => run_eval(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn profile_for(data: &DataArgs, ood_tolerance: f64, confidence_threshold: f64) -> EvalProfile {
    EvalProfile {
        ood_tolerance,
        confidence_threshold,
        n_neighbors: data.n_neighbors,
        per_category_cap: data.per_category_cap,
        num_select_per_class: data.num_select,
        base_seed: data.seed,
    }
}

fn run_eval(args: RunArgs) -> Result<(), String> {
    let folds = load_folds(&args.data.samples, &args.data.support).map_err(|e| e.to_string())?;
    let profile = profile_for(&args.data, args.ood_tolerance, args.confidence_threshold);

    let granularities: &[Granularity] = if args.local_only {
        &[Granularity::Local]
    } else {
        &Granularity::ALL
    };

    let aggregator = Aggregator::new(&BuiltinProjector, profile.clone());
    let methods = aggregator
        .run(&folds, &args.data.methods, granularities)
        .map_err(|e| e.to_string())?;

    let ctx = ReportContext {
        profile,
        n_folds: folds.len(),
        methods,
    };
    write_reports(&ctx, &args.out).map_err(|e| e.to_string())?;
    Ok(())
}

/// Grid sweep over the two category thresholds. Local granularity only:
/// the global evaluation never looks at either threshold, so re-running
/// it per grid point would repeat identical work.
fn run_sweep(args: SweepArgs) -> Result<(), String> {
    let folds = load_folds(&args.data.samples, &args.data.support).map_err(|e| e.to_string())?;

    for &ood_tolerance in &args.ood_tolerances {
        for &confidence_threshold in &args.confidence_thresholds {
            let profile = profile_for(&args.data, ood_tolerance, confidence_threshold);
            let aggregator = Aggregator::new(&BuiltinProjector, profile);
            let methods = aggregator
                .run(&folds, &args.data.methods, &[Granularity::Local])
                .map_err(|e| e.to_string())?;

            println!(
                "ood_tolerance={ood_tolerance} confidence_threshold={confidence_threshold}"
            );
            for method in &methods {
                for (category, summary) in &method.per_category {
                    match summary {
                        None => println!("  {} {}: no records", method.method, category.name()),
                        Some(s) => println!(
                            "  {} {} (n={}): continuity {}, trustworthiness {}, stress {}, shepard {}",
                            method.method,
                            category.name(),
                            s.count,
                            format_avg_std(&s.continuity),
                            format_avg_std(&s.trustworthiness),
                            format_avg_std(&s.normalized_stress),
                            format_avg_std(&s.shepard_correlation),
                        ),
                    }
                }
            }
        }
    }
    Ok(())
}
