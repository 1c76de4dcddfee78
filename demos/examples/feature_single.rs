//! Single Functions - No parameters, optional output monitoring
//!
//! A parameter-less function yields exactly one profile entry. With
//! `monitor_output(true)` every call's return value is kept and written to
//! the `run_outputs` field of the saved profile.
//!
//! Run with: cargo run --example feature_single -p sweepbench-demos --release -- --format human

use sweepbench::prelude::*;
use sweepbench_demos::{fill_buffer, sum_to};

fn main() -> anyhow::Result<()> {
    sweepbench::run(vec![
        Suite::new(
            "sum_million",
            BenchmarkConfig::no_params(|| sum_to(1_000_000)).runs_to_average(10),
        ),
        Suite::new(
            "fill_64k_monitored",
            BenchmarkConfig::no_params(|| fill_buffer(64))
                .runs_to_average(25)
                .monitor_output(true),
        ),
    ])
}
