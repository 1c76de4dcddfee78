//! Benchmark Engine
//!
//! Runs the target function `runs_to_average` times per parameter point,
//! timing the whole batch and optionally sampling peak heap usage around
//! every call:
//!
//! ```text
//! MultiRange ──next_vector──▶ params
//!                               │
//!        ┌──────────────────────┴──────────────┐
//!        │ for each run:                        │
//!        │   calibrate ─▶ f(&params) ─▶ peak/N  │  (timed as one batch)
//!        └──────────────────────┬──────────────┘
//!                               ▼
//!                          ProfileEntry
//! ```

use crate::measure::{Timer, mean_us};
use crate::profile::{
    CpuConfig, FunctionShape, MemoryConfig, Profile, ProfileEntry, RunSettings,
};
use crate::profiler::{MemoryProfiler, ProfilerError};
use crate::ranges::{MultiRange, RangeError, Vector};
use std::collections::TryReserveError;
use std::hint::black_box;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Function without parameters
pub type NoParamFn = Arc<dyn Fn() -> i32>;

/// Function taking one parameter point
pub type ParamFn = Arc<dyn Fn(&Vector) -> i32>;

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    /// `runs_to_average` was 0
    #[error("runs_to_average must be at least 1")]
    NoRuns,

    /// The entry list could not grow
    #[error("Cannot grow profile entries beyond {entries}: {source}")]
    EntryAllocation {
        /// Entries already recorded
        entries: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },

    /// The buffer for raw outputs could not be allocated
    #[error("Cannot allocate run outputs array for {runs} runs: {source}")]
    OutputAllocation {
        /// Requested buffer length
        runs: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },

    /// The parameter generator failed
    #[error("Cannot generate new range: {0}")]
    Range(#[from] RangeError),

    /// The memory profiler could not start
    #[error(transparent)]
    Profiler(#[from] ProfilerError),
}

/// The function under test
#[derive(Clone)]
pub enum Target {
    /// Called with no arguments, producing a single entry
    NoParams(NoParamFn),
    /// Called once per point of `generator`
    Params {
        /// Function under test
        func: ParamFn,
        /// Parameter grid
        generator: MultiRange,
    },
}

impl Target {
    /// Shape tag for this target
    pub fn shape(&self) -> FunctionShape {
        match self {
            Target::NoParams(_) => FunctionShape::NoParams,
            Target::Params { .. } => FunctionShape::Params,
        }
    }

    /// Parameter dimensions, 0 without a generator
    pub fn dimensions(&self) -> usize {
        match self {
            Target::NoParams(_) => 0,
            Target::Params { generator, .. } => generator.dimensions(),
        }
    }

    /// Entries a run will produce, `None` if the grid is unbounded
    pub fn point_count(&self) -> Option<usize> {
        match self {
            Target::NoParams(_) => Some(1),
            Target::Params { generator, .. } => generator.point_count(),
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::NoParams(_) => f.write_str("NoParams"),
            Target::Params { generator, .. } => f
                .debug_struct("Params")
                .field("generator", generator)
                .finish_non_exhaustive(),
        }
    }
}

/// Everything needed to run one benchmark
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Run settings
    pub settings: RunSettings,
    /// Function under test
    pub target: Target,
}

impl BenchmarkConfig {
    /// Benchmark a function without parameters
    pub fn no_params<F>(func: F) -> Self
    where
        F: Fn() -> i32 + 'static,
    {
        Self {
            settings: RunSettings::default(),
            target: Target::NoParams(Arc::new(func)),
        }
    }

    /// Benchmark a function over every point of `generator`
    pub fn with_params<F>(generator: MultiRange, func: F) -> Self
    where
        F: Fn(&Vector) -> i32 + 'static,
    {
        Self {
            settings: RunSettings::default(),
            target: Target::Params {
                func: Arc::new(func),
                generator,
            },
        }
    }

    /// Set the number of calls averaged per point
    pub fn runs_to_average(mut self, runs: usize) -> Self {
        self.settings.runs_to_average = runs;
        self
    }

    /// Set memory profiling options
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.settings.memory = memory;
        self
    }

    /// Set core time options (reserved)
    pub fn cpu(mut self, cpu: CpuConfig) -> Self {
        self.settings.cpu = cpu;
        self
    }

    /// Keep every call's return value
    pub fn monitor_output(mut self, monitor: bool) -> Self {
        self.settings.monitor_output = monitor;
        self
    }

    /// Shape of the function under test
    pub fn shape(&self) -> FunctionShape {
        self.target.shape()
    }
}

/// Run a benchmark and collect its profile.
///
/// The configuration is not modified; the parameter grid is iterated on a
/// private copy. On error no partial profile is returned and the memory
/// profiler, if started, has been joined.
pub fn run_benchmark(conf: &BenchmarkConfig) -> Result<Profile, BenchError> {
    let settings = conf.settings;
    if settings.runs_to_average == 0 {
        error!("Cannot benchmark with zero runs to average");
        return Err(BenchError::NoRuns);
    }

    let profiler = if settings.memory.enabled {
        Some(MemoryProfiler::start(settings.memory.poll_time)?)
    } else {
        None
    };

    if settings.cpu.enabled {
        debug!("core time accounting is not collected, cpu_core_time_us stays 0");
    }

    let entries = match &conf.target {
        Target::NoParams(func) => {
            let mut entries = Vec::new();
            reserve_entry(&mut entries)?;
            entries.push(measure_point(
                &settings,
                profiler.as_ref(),
                Vector::empty(),
                |_| func(),
            )?);
            entries
        }
        Target::Params { func, generator } => {
            let mut generator = generator.clone();
            generator.start();

            let mut entries = Vec::new();
            loop {
                let params = match generator.next_vector() {
                    Ok(Some(params)) => params,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Cannot generate new range: {e}");
                        return Err(e.into());
                    }
                };

                reserve_entry(&mut entries)?;
                let entry = measure_point(&settings, profiler.as_ref(), params, |p| func(p))?;
                entries.push(entry);
            }
            entries
        }
    };

    if let Some(profiler) = profiler {
        profiler.stop();
    }

    Ok(Profile {
        shape: conf.target.shape(),
        dimensions: conf.target.dimensions(),
        settings,
        entries,
    })
}

fn reserve_entry(entries: &mut Vec<ProfileEntry>) -> Result<(), BenchError> {
    entries.try_reserve(1).map_err(|source| {
        error!("Cannot realloc entries");
        BenchError::EntryAllocation {
            entries: entries.len(),
            source,
        }
    })
}

/// Run one batch for `params` and average it into an entry
fn measure_point<F>(
    settings: &RunSettings,
    profiler: Option<&MemoryProfiler>,
    params: Vector,
    mut invoke: F,
) -> Result<ProfileEntry, BenchError>
where
    F: FnMut(&Vector) -> i32,
{
    let runs = settings.runs_to_average;
    let divisor = runs as u64;

    let mut run_outputs = if settings.monitor_output {
        let mut outputs = Vec::new();
        outputs.try_reserve_exact(runs).map_err(|source| {
            error!("Cannot allocate run outputs array");
            BenchError::OutputAllocation { runs, source }
        })?;
        Some(outputs)
    } else {
        None
    };

    let mut max_mem_usage = 0u64;
    let timer = Timer::start();

    for _ in 0..runs {
        if let Some(profiler) = profiler {
            profiler.calibrate();
        }

        let output = black_box(invoke(black_box(&params)));

        if let Some(profiler) = profiler {
            max_mem_usage += profiler.read_peak() / divisor;
        }
        if let Some(outputs) = run_outputs.as_mut() {
            outputs.push(output);
        }
    }

    let cpu_time_us = mean_us(timer.stop(), runs);
    debug!(
        params = ?params.values(),
        cpu_time_us,
        max_mem_usage,
        "measured parameter point"
    );

    Ok(ProfileEntry {
        params,
        cpu_time_us,
        cpu_core_time_us: 0,
        max_mem_usage,
        run_outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi_range;
    use std::cell::RefCell;
    use std::rc::Rc;

    const RUNS: usize = 50;

    fn busy_work(v: &Vector) -> i32 {
        let mut acc = 2.0f64;
        for _ in 0..500 {
            for &x in v.values() {
                acc += black_box(2.0f64).powf(10.0 * x).sqrt();
            }
        }
        black_box(acc);
        1
    }

    fn grid_conf() -> BenchmarkConfig {
        BenchmarkConfig::with_params(
            multi_range![(1.0, 3.0, 1.0), (1.0, 3.0, 1.0), (1.0, 3.0, 1.0)],
            busy_work,
        )
        .runs_to_average(RUNS)
        .memory(MemoryConfig::disabled())
    }

    #[test]
    fn test_no_params_single_entry() {
        let conf = BenchmarkConfig::no_params(|| {
            std::thread::sleep(std::time::Duration::from_micros(50));
            1
        })
        .runs_to_average(10)
        .memory(MemoryConfig::disabled());

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.shape, FunctionShape::NoParams);
        assert_eq!(profile.dimensions, 0);
        assert_eq!(profile.len(), 1);
        assert!(profile.entries[0].cpu_time_us > 0);
        assert_eq!(profile.entries[0].params.dimensions(), 0);
        assert!(profile.entries[0].run_outputs.is_none());
    }

    #[test]
    fn test_params_grid() {
        let profile = run_benchmark(&grid_conf()).unwrap();
        assert_eq!(profile.shape, FunctionShape::Params);
        assert_eq!(profile.dimensions, 3);
        assert_eq!(profile.len(), 27);
        assert!(profile.entries.iter().all(|e| e.params.dimensions() == 3));
        assert_eq!(profile.entries[0].params.values(), &[1.0, 1.0, 1.0]);
        assert_eq!(profile.entries[26].params.values(), &[3.0, 3.0, 3.0]);
        assert!(profile.total_cpu_time_us() > 0);
    }

    #[test]
    fn test_monitor_output_records_every_run() {
        let conf = BenchmarkConfig::no_params(|| 1)
            .runs_to_average(RUNS)
            .memory(MemoryConfig::disabled())
            .monitor_output(true);

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.entries[0].outputs(), vec![1; RUNS].as_slice());

        let profile = run_benchmark(&grid_conf().monitor_output(true)).unwrap();
        for entry in &profile.entries {
            assert_eq!(entry.outputs().len(), RUNS);
            assert!(entry.outputs().iter().all(|&o| o == 1));
        }
    }

    #[test]
    fn test_outputs_keep_call_order() {
        let counter = Rc::new(RefCell::new(0));
        let calls = Rc::clone(&counter);
        let conf = BenchmarkConfig::no_params(move || {
            let mut n = calls.borrow_mut();
            *n += 1;
            *n
        })
        .runs_to_average(5)
        .memory(MemoryConfig::disabled())
        .monitor_output(true);

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.entries[0].outputs(), &[1, 2, 3, 4, 5]);
        assert_eq!(*counter.borrow(), 5);
    }

    #[test]
    fn test_function_sees_each_point_runs_times() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let conf = BenchmarkConfig::with_params(multi_range![(0.0, 1.0, 1.0), (5.0, 6.0, 1.0)], move |v| {
            sink.borrow_mut().push(v.values().to_vec());
            0
        })
        .runs_to_average(3)
        .memory(MemoryConfig::disabled());

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.len(), 4);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 12);
        assert_eq!(seen[0], vec![0.0, 5.0]);
        assert_eq!(seen[2], vec![0.0, 5.0]);
        assert_eq!(seen[3], vec![0.0, 6.0]);
        assert_eq!(seen[11], vec![1.0, 6.0]);
    }

    #[test]
    fn test_config_generator_untouched() {
        let conf = grid_conf().runs_to_average(1);
        let before = match &conf.target {
            Target::Params { generator, .. } => generator.clone(),
            Target::NoParams(_) => unreachable!(),
        };
        run_benchmark(&conf).unwrap();
        run_benchmark(&conf).unwrap();
        match &conf.target {
            Target::Params { generator, .. } => assert_eq!(generator, &before),
            Target::NoParams(_) => unreachable!(),
        }
    }

    #[test]
    fn test_memory_disabled_reports_zero() {
        let conf = BenchmarkConfig::no_params(|| {
            let v = black_box(vec![0u8; 1 << 20]);
            v.len() as i32
        })
        .runs_to_average(5)
        .memory(MemoryConfig::disabled());

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.entries[0].max_mem_usage, 0);
    }

    #[test]
    fn test_memory_enabled_runs_profiler() {
        let conf = grid_conf()
            .runs_to_average(2)
            .memory(MemoryConfig {
                enabled: true,
                poll_time: std::time::Duration::from_micros(100),
            });

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.len(), 27);
        assert!(profile.settings.memory.enabled);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let conf = BenchmarkConfig::no_params(|| 1).runs_to_average(0);
        assert!(matches!(run_benchmark(&conf), Err(BenchError::NoRuns)));
    }

    #[test]
    fn test_cpu_time_is_reserved() {
        let conf = BenchmarkConfig::no_params(|| 1)
            .runs_to_average(3)
            .memory(MemoryConfig::disabled())
            .cpu(CpuConfig {
                enabled: true,
                ..CpuConfig::default()
            });

        let profile = run_benchmark(&conf).unwrap();
        assert_eq!(profile.entries[0].cpu_core_time_us, 0);
        assert!(profile.settings.cpu.enabled);
    }

    #[test]
    fn test_target_point_count() {
        assert_eq!(grid_conf().target.point_count(), Some(27));
        assert_eq!(BenchmarkConfig::no_params(|| 0).target.point_count(), Some(1));
    }
}
