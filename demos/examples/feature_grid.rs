//! Grid Sweeps - Cartesian products of parameter ranges
//!
//! `multi_range!` takes one `(start, end, step)` triple per dimension. The
//! last dimension varies fastest, so `(1..=2) x (10..=20 step 10)` runs
//! (1, 10), (1, 20), (2, 10), (2, 20).
//!
//! Run with: cargo run --example feature_grid -p sweepbench-demos --release

use sweepbench::prelude::*;
use sweepbench_demos::{sort_pseudo_random, sum_to};

fn main() -> anyhow::Result<()> {
    let sum_grid = multi_range![(1_000.0, 5_000.0, 1_000.0)];
    let sort_grid = multi_range![(1_000.0, 4_000.0, 1_000.0), (1.0, 3.0, 1.0)];
    let cube = multi_range![(1.0, 3.0, 1.0), (1.0, 3.0, 1.0), (1.0, 3.0, 1.0)];

    sweepbench::run(vec![
        Suite::new(
            "sum_linear",
            BenchmarkConfig::with_params(sum_grid, |p| sum_to(p.values()[0] as u64))
                .runs_to_average(50),
        ),
        Suite::new(
            "sort_by_size_and_seed",
            BenchmarkConfig::with_params(sort_grid, |p| {
                sort_pseudo_random(p.values()[0] as usize, p.values()[1] as u64)
            })
            .runs_to_average(20),
        ),
        Suite::new(
            "sum_cube",
            BenchmarkConfig::with_params(cube, |p| {
                let product: f64 = p.values().iter().product();
                sum_to(product as u64 * 1_000)
            }),
        ),
    ])
}
