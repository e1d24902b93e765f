//! VSearch batch CLI
//!
//! Shell driver for constant recognition: one process is one worker, so
//! a shell loop (or `--jobs`) fans the search out across cores.
//!
//! ```text
//! vsearch-batch <target> [cpu_id] [ncpus] [k_max] [k_min] [delta]
//! ```
//!
//! Exit code 0 means the target was matched, 1 means it was not.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::process::ExitCode;
use vsearch::{
    calc, search_constant, CancelToken, Calculator, CompareMode, ErrorMetric, HumanFormatter,
    JsonFormatter, ReportFormatter, SearchOptions, SearchReport,
};

/// Exhaustive RPN search for a symbolic form of a numeric constant.
///
/// Searches a configurable calculator for the shortest RPN expressions
/// matching the target and prints the result stream.
#[derive(Parser, Debug)]
#[command(name = "vsearch-batch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target value to recognize
    target: f64,

    /// This worker's shard index (0-based)
    #[arg(default_value_t = 0)]
    cpu_id: u32,

    /// Total number of workers sharing the search space
    #[arg(default_value_t = 1)]
    ncpus: u32,

    /// Largest RPN code length to try
    #[arg(default_value_t = 6)]
    k_max: u32,

    /// Smallest RPN code length to try
    #[arg(default_value_t = 1)]
    k_min: u32,

    /// Declared absolute uncertainty of the target (0 = none)
    #[arg(default_value_t = 0.0)]
    delta: f64,

    /// Error metric
    #[arg(short, long, default_value = "rel")]
    metric: MetricArg,

    /// Best-candidate comparison mode
    #[arg(long, default_value = "strict")]
    compare: CompareArg,

    /// Built-in calculator to use (CALC4 or CASIO)
    #[arg(short, long, default_value = "CALC4")]
    calc: String,

    /// Comma-separated constant names to keep (default: all)
    #[arg(long)]
    consts: Option<String>,

    /// Comma-separated unary function names to keep (default: all)
    #[arg(long)]
    funcs: Option<String>,

    /// Comma-separated binary operator names to keep (default: all)
    #[arg(long)]
    ops: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Run this many parallel workers instead of a single shard
    /// (0 = one per core); overrides cpu_id/ncpus
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Error metric options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Abs,
    Rel,
    Mse,
    Mae,
    Max,
    Ulp,
    Hamming,
}

impl From<MetricArg> for ErrorMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Abs => ErrorMetric::Abs,
            MetricArg::Rel => ErrorMetric::Rel,
            MetricArg::Mse => ErrorMetric::Mse,
            MetricArg::Mae => ErrorMetric::Mae,
            MetricArg::Max => ErrorMetric::Max,
            MetricArg::Ulp => ErrorMetric::Ulp,
            MetricArg::Hamming => ErrorMetric::Hamming,
        }
    }
}

/// Comparison mode options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompareArg {
    Strict,
    Equal,
}

impl From<CompareArg> for CompareMode {
    fn from(arg: CompareArg) -> Self {
        match arg {
            CompareArg::Strict => CompareMode::Strict,
            CompareArg::Equal => CompareMode::Equal,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON stream
    Json,
    /// Human-readable summary
    Human,
    /// Single summary line
    Quiet,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("vsearch=debug")
            .init();
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let base = calc::by_name(&args.calc)?;
    let calculator = base
        .subset(
            args.consts.as_deref(),
            args.funcs.as_deref(),
            args.ops.as_deref(),
        )
        .context("building sub-calculator from name lists")?;

    let reports = match args.jobs {
        Some(jobs) => run_parallel(args, &calculator, jobs),
        None => {
            let opts = options(args, args.cpu_id, args.ncpus);
            vec![search_constant(args.target, args.delta, &calculator, &opts)]
        }
    };

    for report in &reports {
        print_report(args.format, report);
    }

    Ok(reports.iter().any(SearchReport::is_success))
}

/// Fan the search out over `jobs` workers, one shard each. The first
/// worker to succeed cancels the rest through the shared token.
fn run_parallel(args: &Args, calculator: &Calculator, jobs: usize) -> Vec<SearchReport> {
    let jobs = if jobs == 0 { num_cpus::get() } else { jobs } as u32;
    let cancel = CancelToken::new();

    (0..jobs)
        .into_par_iter()
        .map(|worker| {
            let opts = options(args, worker, jobs).with_cancel(cancel.clone());
            let report = search_constant(args.target, args.delta, calculator, &opts);
            if report.is_success() {
                tracing::debug!(worker, rpn = %report.rpn, "worker found a match");
                cancel.cancel();
            }
            report
        })
        .collect()
}

fn options(args: &Args, cpu_id: u32, ncpus: u32) -> SearchOptions {
    SearchOptions::new()
        .with_k_range(args.k_min, args.k_max)
        .with_shard(cpu_id, ncpus)
        .with_metric(args.metric.into())
        .with_compare(args.compare.into())
}

fn print_report(format: OutputFormat, report: &SearchReport) {
    match format {
        OutputFormat::Json => println!("{}", JsonFormatter::new().format_report(report)),
        OutputFormat::Human => print!("{}", HumanFormatter::new().format_report(report)),
        OutputFormat::Quiet => print!("{}", HumanFormatter::quiet().format_report(report)),
    }
}
