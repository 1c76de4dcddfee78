//! Exact heap deltas with the tracking allocator installed.
//!
//! This binary holds a single test so no other test thread allocates while
//! the profiler is sampling.

use std::time::Duration;
use sweepbench::{
    BenchmarkConfig, MemoryConfig, MemoryProfiler, TrackingAllocator, live_heap_bytes,
    run_benchmark,
};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn no_alloc() -> i32 {
    let mut acc = 0i32;
    for i in 0..1_000 {
        acc = acc.wrapping_add(std::hint::black_box(i));
    }
    acc
}

#[test]
fn test_heap_baseline() {
    assert!(live_heap_bytes() > 0, "tracking allocator is installed");

    // Calibrate then read immediately: nothing happened in between
    let profiler = MemoryProfiler::start(Duration::from_millis(1)).unwrap();
    profiler.calibrate();
    assert_eq!(profiler.read_peak(), 0);
    profiler.stop();

    // A function that never touches the heap reports no peak growth
    let conf = BenchmarkConfig::no_params(no_alloc)
        .runs_to_average(20)
        .memory(MemoryConfig::default());
    let profile = run_benchmark(&conf).unwrap();
    assert_eq!(profile.entries[0].max_mem_usage, 0);
}
