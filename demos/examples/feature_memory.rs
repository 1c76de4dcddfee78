//! Memory Profiling - Peak heap growth per parameter point
//!
//! Install `TrackingAllocator` as the global allocator so the profiler thread
//! can observe live heap bytes. Without it, `max_mem_usage` is always 0.
//!
//! Run with: cargo run --example feature_memory -p sweepbench-demos --release -- --mem-poll 100us

use sweepbench::prelude::*;
use sweepbench_demos::{fill_buffer, sum_to};

// Install the tracking allocator for the entire process.
#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() -> anyhow::Result<()> {
    let sizes = multi_range![(256.0, 4_096.0, 256.0)];

    sweepbench::run(vec![
        Suite::new(
            "fill_buffer_kib",
            BenchmarkConfig::with_params(sizes, |p| fill_buffer(p.values()[0] as usize))
                .runs_to_average(10),
        ),
        // Heap-free baseline: peaks stay at 0
        Suite::new(
            "sum_no_heap",
            BenchmarkConfig::no_params(|| sum_to(100_000)).runs_to_average(10),
        ),
        // Same work with memory profiling off, to compare timing overhead
        Suite::new(
            "fill_buffer_unprofiled",
            BenchmarkConfig::no_params(|| fill_buffer(1_024))
                .runs_to_average(10)
                .memory(MemoryConfig::disabled()),
        ),
    ])
}
