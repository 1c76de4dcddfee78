//! Background Memory Profiler
//!
//! A sampling thread polls heap usage every `poll_time` and keeps the
//! maximum seen since the last calibration. The engine calibrates before
//! each measured call and reads the peak delta afterwards.
//!
//! ```text
//!   engine thread                    sampling thread
//!   ─────────────                    ───────────────
//!   start() ──spawn──────────────▶   lock, alive = true, notify
//!     wait for alive ◀────────────   loop { sample, max, wait(poll) }
//!   calibrate()  ─ lock ─┐
//!   f()                  │ shared state (Mutex)
//!   read_peak()  ─ lock ─┘
//!   stop()/drop ──running = false──▶ exit loop
//!     join ◀──────────────────────
//! ```

use crate::allocator::live_heap_bytes;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Shortest interval the sampling thread waits between polls
pub const MIN_POLL_TIME: Duration = Duration::from_micros(1);

/// Errors raised while starting the profiler
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// The sampling thread could not be spawned
    #[error("Cannot spawn memory profiler thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Source of heap usage readings
pub trait HeapSampler: Send + Sync + 'static {
    /// Bytes currently in use
    fn heap_usage(&self) -> u64;
}

/// Reads the counters kept by [`crate::TrackingAllocator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedHeap;

impl HeapSampler for TrackedHeap {
    fn heap_usage(&self) -> u64 {
        live_heap_bytes()
    }
}

impl<F> HeapSampler for F
where
    F: Fn() -> u64 + Send + Sync + 'static,
{
    fn heap_usage(&self) -> u64 {
        self()
    }
}

#[derive(Debug)]
struct ProfilerState {
    running: bool,
    alive: bool,
    start_mem_usage: u64,
    max_mem_usage: u64,
}

struct Shared {
    state: Mutex<ProfilerState>,
    wake: Condvar,
    poll_time: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ProfilerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running sampling thread.
///
/// Dropping the handle stops and joins the thread, so an early return
/// never leaves the sampler behind.
pub struct MemoryProfiler<S: HeapSampler = TrackedHeap> {
    shared: Arc<Shared>,
    sampler: Arc<S>,
    handle: Option<JoinHandle<()>>,
}

impl MemoryProfiler<TrackedHeap> {
    /// Start profiling the process heap through the tracking allocator
    pub fn start(poll_time: Duration) -> Result<Self, ProfilerError> {
        Self::with_sampler(TrackedHeap, poll_time)
    }
}

impl<S: HeapSampler> MemoryProfiler<S> {
    /// Start a profiler reading from `sampler`.
    ///
    /// Returns once the sampling thread is running, already calibrated.
    pub fn with_sampler(sampler: S, poll_time: Duration) -> Result<Self, ProfilerError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(ProfilerState {
                running: true,
                alive: false,
                start_mem_usage: 0,
                max_mem_usage: 0,
            }),
            wake: Condvar::new(),
            poll_time: poll_time.max(MIN_POLL_TIME),
        });
        let sampler = Arc::new(sampler);

        let handle = {
            let shared = Arc::clone(&shared);
            let sampler = Arc::clone(&sampler);
            thread::Builder::new()
                .name("sweepbench-memprof".to_string())
                .spawn(move || sampling_loop(&shared, sampler.as_ref()))
                .map_err(|e| {
                    error!("Cannot start memory profiler thread: {e}");
                    ProfilerError::Spawn(e)
                })?
        };

        // Handshake: the thread flips `alive` under the lock on its first pass
        {
            let mut state = shared.lock();
            while !state.alive {
                state = shared
                    .wake
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        let profiler = Self {
            shared,
            sampler,
            handle: Some(handle),
        };
        profiler.calibrate();
        debug!(poll_time = ?profiler.poll_time(), "memory profiler started");

        Ok(profiler)
    }

    /// Interval between samples
    pub fn poll_time(&self) -> Duration {
        self.shared.poll_time
    }

    /// Whether the sampling thread is still attached
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Take the current heap usage as the new baseline and reset the maximum
    pub fn calibrate(&self) {
        let mut state = self.shared.lock();
        let usage = self.sampler.heap_usage();
        state.start_mem_usage = usage;
        state.max_mem_usage = usage;
    }

    /// Highest heap usage above the baseline since the last calibration.
    ///
    /// A maximum below the baseline can only come from a sample racing the
    /// calibration; it is reported as 0.
    pub fn read_peak(&self) -> u64 {
        let state = self.shared.lock();
        match state.max_mem_usage.checked_sub(state.start_mem_usage) {
            Some(delta) => delta,
            None => {
                warn!(
                    start = state.start_mem_usage,
                    max = state.max_mem_usage,
                    "Memory usage is negative, calibration may be wrong"
                );
                0
            }
        }
    }

    /// Stop the sampling thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.shared.lock().running = false;
        self.shared.wake.notify_all();

        if handle.join().is_err() {
            error!("Memory profiler thread panicked");
        } else {
            debug!("memory profiler stopped");
        }
    }
}

impl<S: HeapSampler> Drop for MemoryProfiler<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: HeapSampler> std::fmt::Debug for MemoryProfiler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProfiler")
            .field("poll_time", &self.shared.poll_time)
            .field("running", &self.is_running())
            .finish()
    }
}

fn sampling_loop<S: HeapSampler>(shared: &Shared, sampler: &S) {
    let mut state = shared.lock();
    state.alive = true;
    shared.wake.notify_all();

    while state.running {
        let usage = sampler.heap_usage();
        if usage > state.max_mem_usage {
            state.max_mem_usage = usage;
        }

        // Releases the lock while waiting; `stop` cuts the wait short
        let (next, _) = shared
            .wake
            .wait_timeout(state, shared.poll_time)
            .unwrap_or_else(PoisonError::into_inner);
        state = next;
    }
}
