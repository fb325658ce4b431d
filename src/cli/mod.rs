//! drift-bagging CLI Module
//!
//! Command-line interface for running the replacement bagging ensemble over
//! synthetic drifting streams or CSV files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::ensemble::{EnsembleConfig, ReplacementBagging, VoteCombination};
use crate::streaming::{
    DriftSchedule, PrequentialEvaluator, PrequentialReport, SeaGenerator, StaggerGenerator,
};
use crate::training::{BaseLearner, BaseLearnerType, Instance};
use crate::utils::DataLoader;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "drift-bagging")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Online bagging with drift-driven member replacement")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate on a synthetic drifting stream
    Simulate {
        /// Stream generator
        #[arg(short, long, value_enum, default_value = "sea")]
        generator: GeneratorKind,

        /// Number of instances to generate
        #[arg(short = 'n', long, default_value = "100000")]
        instances: usize,

        /// Instances between concept switches
        #[arg(long, default_value = "25000")]
        drift_every: usize,

        /// Label noise probability
        #[arg(long, default_value = "0.1")]
        noise: f64,

        /// Seed of the stream
        #[arg(long, default_value = "7")]
        stream_seed: u64,

        #[command(flatten)]
        ensemble: EnsembleArgs,
    },

    /// Evaluate on a CSV file, read in row order
    Evaluate {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        #[command(flatten)]
        ensemble: EnsembleArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GeneratorKind {
    Sea,
    Stagger,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CombinationArg {
    Cumulative,
    LastVoter,
}

impl From<CombinationArg> for VoteCombination {
    fn from(arg: CombinationArg) -> Self {
        match arg {
            CombinationArg::Cumulative => VoteCombination::Cumulative,
            CombinationArg::LastVoter => VoteCombination::LastVoter,
        }
    }
}

/// Ensemble options shared by every subcommand
#[derive(Args, Clone, Debug)]
pub struct EnsembleArgs {
    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of members in the bag
    #[arg(short, long)]
    pub ensemble_size: Option<usize>,

    /// Predictions between replacement evaluations
    #[arg(short, long)]
    pub window_size: Option<usize>,

    /// Seed of the resampling stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// Vote combination rule
    #[arg(long, value_enum)]
    pub combination: Option<CombinationArg>,

    /// Train members in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Base learner (naive_bayes, majority_class)
    #[arg(short, long, default_value = "naive_bayes")]
    pub base_learner: String,

    /// Also evaluate a single base learner for comparison
    #[arg(long)]
    pub compare: bool,

    /// Scored instances between curve points
    #[arg(long, default_value = "5000")]
    pub report_every: usize,

    /// Write the JSON report here
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl EnsembleArgs {
    /// Configuration file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> anyhow::Result<EnsembleConfig> {
        let mut config = match &self.config {
            Some(path) => EnsembleConfig::from_json_file(path)?,
            None => EnsembleConfig::default(),
        };
        if let Some(size) = self.ensemble_size {
            config.ensemble_size = size;
        }
        if let Some(window) = self.window_size {
            config.window_size = window;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(combination) = self.combination {
            config.combination = combination.into();
        }
        if self.parallel {
            config.parallel_training = true;
        }
        config.validate()?;
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_simulate(
    generator: GeneratorKind,
    instances: usize,
    drift_every: usize,
    noise: f64,
    stream_seed: u64,
    args: &EnsembleArgs,
) -> anyhow::Result<()> {
    section("Simulate");

    let schedule = DriftSchedule {
        drift_every: Some(drift_every),
        noise,
        seed: stream_seed,
    };
    println!("  {:<16} {:?}", muted("Generator"), generator);
    println!("  {:<16} {}", muted("Instances"), instances);
    println!("  {:<16} every {}", muted("Drift"), drift_every);

    let make_stream = || -> anyhow::Result<Box<dyn Iterator<Item = Instance>>> {
        let stream: Box<dyn Iterator<Item = Instance>> = match generator {
            GeneratorKind::Sea => Box::new(SeaGenerator::new(schedule)?.take(instances)),
            GeneratorKind::Stagger => Box::new(StaggerGenerator::new(schedule)?.take(instances)),
        };
        Ok(stream)
    };

    run_evaluation(args, make_stream)
}

pub fn cmd_evaluate(data_path: &Path, target: &str, args: &EnsembleArgs) -> anyhow::Result<()> {
    section("Evaluate");

    step_run("Loading data");
    let start = Instant::now();
    let path = data_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Non UTF-8 path: {}", data_path.display()))?;
    let dataset = DataLoader::new().load_instances(path, target)?;
    step_done(&format!(
        "{} rows × {} features, {} classes in {:?}",
        dataset.instances.len(),
        dataset.feature_names.len(),
        dataset.n_classes(),
        start.elapsed()
    ));

    let instances = dataset.instances;
    run_evaluation(args, || {
        Ok(Box::new(instances.clone().into_iter()) as Box<dyn Iterator<Item = Instance>>)
    })
}

fn run_evaluation<F>(args: &EnsembleArgs, make_stream: F) -> anyhow::Result<()>
where
    F: Fn() -> anyhow::Result<Box<dyn Iterator<Item = Instance>>>,
{
    let config = args.resolve_config()?;
    let learner_type: BaseLearnerType = args.base_learner.parse()?;
    let evaluator = PrequentialEvaluator::new()
        .with_window(config.window_size)
        .with_report_every(args.report_every);

    let mut ensemble = ReplacementBagging::new(config.clone(), BaseLearner::from_type(learner_type))?;

    step_run(&format!(
        "Running {} ({} members, window {})",
        learner_type.to_string().cyan(),
        config.ensemble_size,
        config.window_size
    ));
    let report = evaluator.evaluate(&mut ensemble, make_stream()?)?;
    step_done(&format!("{:.0} ms", report.elapsed_ms));

    let mut reports = vec![report];
    if args.compare {
        step_run("Running single base learner");
        let mut single = BaseLearner::from_type(learner_type);
        let baseline = evaluator.evaluate(&mut single, make_stream()?)?;
        step_done(&format!("{:.0} ms", baseline.elapsed_ms));
        reports.push(baseline);
    }

    print_reports(&reports);

    let measurements = ensemble.measurements();
    println!("  {:<16} {}", muted("Evaluations"), measurements.evaluations);
    println!("  {:<16} {}", muted("Replacements"), measurements.replacements);
    println!();

    if let Some(path) = &args.output {
        let body = serde_json::json!({
            "config": config,
            "reports": reports,
            "measurements": measurements,
        });
        std::fs::write(path, serde_json::to_string_pretty(&body)?)?;
        println!("  {} {}", ok("✓"), format!("Report written to {}", path.display()));
        println!();
    }

    Ok(())
}

fn print_reports(reports: &[PrequentialReport]) {
    println!();
    println!("  {:<44} {:>10} {:>12}", muted("Learner"), muted("Accuracy"), muted("Inst/s"));
    println!("  {}", dim(&"─".repeat(68)));
    for report in reports {
        println!(
            "  {:<44} {:>10.4} {:>12.0}",
            report.learner, report.accuracy, report.throughput
        );
    }
    println!("  {}", dim(&"─".repeat(68)));

    if let Some(first) = reports.first() {
        if !first.curve.is_empty() {
            println!();
            println!("  {:<16} {:>10} {:>12}", muted("Instances"), muted("Window"), muted("Cumulative"));
            for point in &first.curve {
                println!(
                    "  {:<16} {:>10.4} {:>12.4}",
                    point.instances, point.window_accuracy, point.cumulative_accuracy
                );
            }
        }
    }
    println!();
}
