#![warn(missing_docs)]
//! # SweepBench
//!
//! Micro-benchmarking over parameter grids, with peak heap profiling.
//!
//! SweepBench runs a function many times per parameter point and records:
//! - **Mean call time**: one timed batch of `runs_to_average` calls per point
//! - **Peak heap growth**: a background thread samples live heap bytes while the batch runs
//! - **Raw outputs**: optionally, the return value of every call
//!
//! Parameter points come from a [`MultiRange`], an odometer over independent
//! `[start, end]` ranges where the last dimension varies fastest.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sweepbench::prelude::*;
//!
//! #[global_allocator]
//! static GLOBAL: TrackingAllocator = TrackingAllocator;
//!
//! fn main() -> anyhow::Result<()> {
//!     let grid = multi_range![(1.0, 8.0, 1.0), (0.0, 1.0, 0.25)];
//!     sweepbench::run(vec![Suite::new(
//!         "scaled_buffers",
//!         BenchmarkConfig::with_params(grid, |p| {
//!             let buf = vec![0u8; (p.values()[0] * 1024.0 * (1.0 + p.values()[1])) as usize];
//!             buf.len() as i32
//!         }),
//!     )])
//! }
//! ```
//!
//! ## Library Use
//!
//! ```ignore
//! let profile = run_benchmark(&BenchmarkConfig::no_params(|| work()).runs_to_average(10))?;
//! save_profile(&profile, &OutputConfig::new(OutputFormat::Json, Some("work")))?;
//! ```

// Re-export core types
pub use sweepbench_core::{
    BenchError, BenchmarkConfig, CpuConfig, FunctionShape, HeapSampler, MemoryConfig,
    MemoryProfiler, MultiRange, NoParamFn, ParamFn, Profile, ProfileEntry, ProfilerError, Range,
    RangeError, RunSettings, Target, TrackedHeap, TrackingAllocator, Vector, current_allocation,
    live_heap_bytes, multi_range, reset_allocation_counter, run_benchmark,
};

// Re-export output
pub use sweepbench_report::{
    OutputConfig, OutputFormat, ReportError, format_human_output, generate_csv_profile,
    generate_json_profile, save_profile,
};

// Re-export harness
pub use sweepbench_cli::{Cli, Suite, SweepConfig, run_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkConfig, MemoryConfig, MultiRange, OutputConfig, OutputFormat, Range, Suite,
        TrackingAllocator, Vector, multi_range, run_benchmark, save_profile,
    };
}

/// Run the SweepBench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     sweepbench::run(suites())
/// }
/// ```
pub use sweepbench_cli::run;
