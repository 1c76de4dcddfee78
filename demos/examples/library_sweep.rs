//! Library Use - Engine and output without the CLI harness
//!
//! `run_benchmark` returns a `Profile`; `save_profile` writes it as JSON or
//! CSV under `<directory>/<prefix>.bench.<ext>`.
//!
//! Run with: cargo run --example library_sweep -p sweepbench-demos --release

use sweepbench::prelude::*;
use sweepbench::{current_allocation, format_human_output, reset_allocation_counter};
use sweepbench_demos::sort_pseudo_random;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    reset_allocation_counter();

    let conf = BenchmarkConfig::with_params(multi_range![(10_000.0, 50_000.0, 10_000.0)], |p| {
        sort_pseudo_random(p.values()[0] as usize, 42)
    })
    .runs_to_average(5)
    .monitor_output(true);

    let profile = run_benchmark(&conf)?;
    let (bytes, count) = current_allocation();
    println!("{}", format_human_output("sort_scaling", &profile));
    println!("sweep allocated {bytes} bytes in {count} allocations");

    for format in [OutputFormat::Json, OutputFormat::Csv] {
        let out = OutputConfig::new(format, Some("sort_scaling")).with_directory("target/sweepbench");
        let path = save_profile(&profile, &out)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
