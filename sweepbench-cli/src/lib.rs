#![warn(missing_docs)]
//! SweepBench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Build a list of [`Suite`]s and hand it to `sweepbench::run()` (or
//! `sweepbench_cli::run()`) in your main function.
//!
//! # Example
//!
//! ```ignore
//! use sweepbench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let grid = multi_range![(1.0, 64.0, 1.0)];
//!     sweepbench::run(vec![Suite::new(
//!         "vec_push",
//!         BenchmarkConfig::with_params(grid, |p| push_n(p.values()[0] as usize)),
//!     )])
//! }
//! ```

mod config;
mod planner;

pub use config::*;
pub use planner::{ExecutionPlan, build_plan};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::path::PathBuf;
use std::time::Instant;
use sweepbench_core::{BenchmarkConfig, run_benchmark};
use sweepbench_report::{
    OutputConfig, OutputFormat, default_prefix, format_human_output, save_profile,
};
use tracing::info;

/// A named benchmark registered with the harness
#[derive(Debug, Clone)]
pub struct Suite {
    /// Name used for filtering and output file names
    pub name: String,
    /// What to run
    pub config: BenchmarkConfig,
}

impl Suite {
    /// Register `config` under `name`
    pub fn new(name: impl Into<String>, config: BenchmarkConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Entries one run produces, `None` if the grid is unbounded
    pub fn point_count(&self) -> Option<usize> {
        self.config.target.point_count()
    }
}

/// SweepBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sweepbench")]
#[command(author, version, about = "SweepBench - parameter sweep benchmarking for Rust")]
pub struct Cli {
    /// Optional subcommand; defaults to running the suites
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter suites by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Configuration file (default: discover sweep.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Calls averaged into each entry
    #[arg(long, short = 'n')]
    pub runs: Option<usize>,

    /// Disable memory profiling
    #[arg(long)]
    pub no_mem: bool,

    /// Memory sampling interval (e.g., "1ms", "250us")
    #[arg(long)]
    pub mem_poll: Option<String>,

    /// Record the return value of every call
    #[arg(long)]
    pub monitor_output: bool,

    /// Output format: json, csv, human
    #[arg(long)]
    pub format: Option<String>,

    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Output file name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Dry run - list suites without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered suites and their point counts
    List,
}

/// Run the SweepBench CLI over `suites`.
/// This is the main entry point for benchmark binaries.
pub fn run(suites: Vec<Suite>) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, suites)
}

/// Run the SweepBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, suites: Vec<Suite>) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SweepConfig::load(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => SweepConfig::discover().unwrap_or_default(),
    };

    let filter = Regex::new(&cli.filter)
        .with_context(|| format!("Invalid filter pattern: {}", cli.filter))?;
    let plan = build_plan(&suites, Some(&filter));

    if matches!(cli.command, Some(Commands::List)) || cli.dry_run {
        list_suites(&plan);
        return Ok(());
    }

    let overrides = config.overrides()?.merge(cli_overrides(&cli)?);
    let output = resolve_output(&cli, &config)?;
    run_suites(&plan, &overrides, &output)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "sweepbench=debug"
    } else {
        "sweepbench=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

fn cli_overrides(cli: &Cli) -> anyhow::Result<SettingsOverride> {
    let memory_poll_time = cli
        .mem_poll
        .as_deref()
        .map(SweepConfig::parse_duration)
        .transpose()?;

    Ok(SettingsOverride {
        runs_to_average: cli.runs,
        memory_enabled: cli.no_mem.then_some(false),
        memory_poll_time,
        monitor_output: cli.monitor_output.then_some(true),
        ..SettingsOverride::default()
    })
}

/// Where the harness sends each suite's profile
#[derive(Debug, Clone)]
struct OutputTarget {
    format: OutputFormat,
    directory: PathBuf,
    prefix: String,
}

impl OutputTarget {
    fn for_suite(&self, suite: &Suite) -> OutputConfig {
        let name = format!("{}.{}", sanitize(&suite.name), self.prefix);
        OutputConfig::new(self.format, Some(name.as_str())).with_directory(&self.directory)
    }
}

fn resolve_output(cli: &Cli, config: &SweepConfig) -> anyhow::Result<OutputTarget> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()?;
    let directory = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let prefix = cli
        .prefix
        .clone()
        .or_else(|| config.output.prefix.clone())
        .unwrap_or_else(default_prefix);

    Ok(OutputTarget {
        format,
        directory,
        prefix,
    })
}

/// Keep suite names usable as file names
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn format_points(points: Option<usize>) -> String {
    points.map_or_else(|| "unbounded".to_string(), |n| n.to_string())
}

fn list_suites(plan: &ExecutionPlan<'_>) {
    println!("SweepBench Plan:");
    for suite in &plan.suites {
        println!(
            "├── {} ({:?}, {} points)",
            suite.name,
            suite.config.shape(),
            format_points(suite.point_count())
        );
    }
    println!(
        "{} suites found, {} points total.",
        plan.suites.len(),
        format_points(plan.total_points())
    );
}

fn run_suites(
    plan: &ExecutionPlan<'_>,
    overrides: &SettingsOverride,
    output: &OutputTarget,
) -> anyhow::Result<()> {
    if plan.suites.is_empty() {
        println!("No suites found.");
        return Ok(());
    }

    println!("Running {} suites...\n", plan.suites.len());
    let start_time = Instant::now();

    let pb = ProgressBar::new(plan.suites.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for suite in &plan.suites {
        pb.set_message(suite.name.clone());

        let mut config = suite.config.clone();
        config.settings = overrides.apply(config.settings);

        match run_benchmark(&config) {
            Ok(profile) => {
                info!(
                    suite = %suite.name,
                    entries = profile.len(),
                    "finished suite"
                );
                let result = match output.format {
                    OutputFormat::Human => {
                        pb.suspend(|| println!("{}", format_human_output(&suite.name, &profile)));
                        Ok(())
                    }
                    _ => save_profile(&profile, &output.for_suite(suite)).map(|path| {
                        pb.suspend(|| println!("{}: {}", suite.name, path.display()));
                    }),
                };
                if let Err(e) = result {
                    pb.suspend(|| eprintln!("Suite '{}' output failed: {e}", suite.name));
                    failures.push(suite.name.clone());
                }
            }
            Err(e) => {
                pb.suspend(|| eprintln!("Suite '{}' failed: {e}", suite.name));
                failures.push(suite.name.clone());
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    println!(
        "\n{} of {} suites completed in {:.2}s",
        plan.suites.len() - failures.len(),
        plan.suites.len(),
        start_time.elapsed().as_secs_f64()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} suite(s) failed: {}", failures.len(), failures.join(", "));
    }
    Ok(())
}
