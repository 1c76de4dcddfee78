#![warn(missing_docs)]
//! SweepBench Core - Sweep Runtime
//!
//! This crate provides the measurement machinery:
//! - `Range` / `MultiRange` odometer over a Cartesian grid of parameters
//! - `MemoryProfiler` background thread sampling peak heap usage
//! - `TrackingAllocator` global allocator exposing live heap bytes
//! - `run_benchmark` engine producing one averaged `ProfileEntry` per point

mod allocator;
mod bench;
mod measure;
mod profile;
mod profiler;
mod ranges;

pub use allocator::{
    TrackingAllocator, current_allocation, live_heap_bytes, reset_allocation_counter,
};
pub use bench::{BenchError, BenchmarkConfig, NoParamFn, ParamFn, Target, run_benchmark};
pub use measure::{Timer, duration_us, mean_us};
pub use profile::{
    CpuConfig, DEFAULT_CPU_POLL_TIME, DEFAULT_MEM_POLL_TIME, DEFAULT_RUNS_TO_AVERAGE,
    FunctionShape, MemoryConfig, Profile, ProfileEntry, RunSettings,
};
pub use profiler::{HeapSampler, MIN_POLL_TIME, MemoryProfiler, ProfilerError, TrackedHeap};
pub use ranges::{MultiRange, Range, RangeError, Vector};
