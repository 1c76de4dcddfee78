//! Wall-Clock Timing
//!
//! Batches are timed with the monotonic `std::time::Instant`, so elapsed
//! durations are never negative. Results are reported in microseconds.

use std::time::{Duration, Instant};

/// Timer for measuring one batch of calls
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time elapsed since `start`
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return elapsed microseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        duration_us(self.elapsed())
    }
}

/// Whole microseconds in `duration`, saturating at `u64::MAX`
pub fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Per-call mean of a batch total, truncated to whole microseconds
pub fn mean_us(total_us: u64, calls: usize) -> u64 {
    match u64::try_from(calls) {
        Ok(0) | Err(_) => 0,
        Ok(calls) => total_us / calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let micros = timer.stop();

        // Should be at least 5ms
        assert!(micros >= 5_000);
        // Should be less than 1s (accounting for scheduling)
        assert!(micros < 1_000_000);
    }

    #[test]
    fn test_duration_us() {
        assert_eq!(duration_us(Duration::from_millis(3)), 3_000);
        assert_eq!(duration_us(Duration::from_nanos(999)), 0);
        assert_eq!(duration_us(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_mean_us() {
        assert_eq!(mean_us(1_000, 3), 333);
        assert_eq!(mean_us(1_000, 1), 1_000);
        assert_eq!(mean_us(1_000, 0), 0);
    }
}
