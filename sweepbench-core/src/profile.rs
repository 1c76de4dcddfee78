//! Profile Data Structures
//!
//! A [`Profile`] is the output of one benchmark run: one [`ProfileEntry`]
//! per parameter point, plus a copy of the settings that produced it.

use crate::ranges::Vector;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of calls averaged into one entry
pub const DEFAULT_RUNS_TO_AVERAGE: usize = 100;

/// Default memory sampling interval.
///
/// Anything down to [`MIN_POLL_TIME`](crate::MIN_POLL_TIME) can be configured
/// for a tighter sampler at the cost of a busier thread.
pub const DEFAULT_MEM_POLL_TIME: Duration = Duration::from_millis(1);

/// Default core-time sampling interval
pub const DEFAULT_CPU_POLL_TIME: Duration = Duration::from_millis(2500);

/// Shape of the benchmarked function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionShape {
    /// `fn() -> i32`, produces exactly one entry
    NoParams,
    /// `fn(&Vector) -> i32`, produces one entry per parameter point
    Params,
}

/// Memory profiling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Whether to sample peak heap usage
    pub enabled: bool,
    /// Interval between heap samples
    pub poll_time: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_time: DEFAULT_MEM_POLL_TIME,
        }
    }
}

impl MemoryConfig {
    /// Memory profiling switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Core-level CPU accounting settings.
///
/// Carried through to the profile but not acted on by the engine:
/// `cpu_core_time_us` is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuConfig {
    /// Whether core time accounting was requested
    pub enabled: bool,
    /// Requested sampling interval
    pub poll_time: Duration,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_time: DEFAULT_CPU_POLL_TIME,
        }
    }
}

/// Run settings shared by every parameter point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Calls per parameter point; timings and peaks are averaged over these
    pub runs_to_average: usize,
    /// Memory profiling
    pub memory: MemoryConfig,
    /// Core time accounting (reserved)
    pub cpu: CpuConfig,
    /// Keep the return value of every call
    pub monitor_output: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            runs_to_average: DEFAULT_RUNS_TO_AVERAGE,
            memory: MemoryConfig::default(),
            cpu: CpuConfig::default(),
            monitor_output: false,
        }
    }
}

/// Averaged results for one parameter point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Parameter point, zero-dimensional for functions without parameters
    pub params: Vector,
    /// Mean wall-clock time per call
    pub cpu_time_us: u64,
    /// Reserved, always 0
    pub cpu_core_time_us: u64,
    /// Mean peak heap growth per call in bytes, 0 when memory profiling is off
    pub max_mem_usage: u64,
    /// Return value of every call, in call order, when output monitoring is on
    pub run_outputs: Option<Vec<i32>>,
}

impl ProfileEntry {
    /// Recorded outputs, empty when output monitoring was off
    pub fn outputs(&self) -> &[i32] {
        self.run_outputs.as_deref().unwrap_or_default()
    }
}

/// Results of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Shape of the benchmarked function
    pub shape: FunctionShape,
    /// Parameter dimensions, 0 for functions without parameters
    pub dimensions: usize,
    /// Settings the run used
    pub settings: RunSettings,
    /// One entry per parameter point, in generation order
    pub entries: Vec<ProfileEntry>,
}

impl Profile {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the profile has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the per-call means across entries
    pub fn total_cpu_time_us(&self) -> u64 {
        self.entries.iter().map(|e| e.cpu_time_us).sum()
    }

    /// Largest mean peak across entries
    pub fn max_mem_usage(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.max_mem_usage)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RunSettings::default();
        assert_eq!(settings.runs_to_average, DEFAULT_RUNS_TO_AVERAGE);
        assert!(settings.memory.enabled);
        assert_eq!(settings.memory.poll_time, Duration::from_millis(1));
        assert!(!settings.cpu.enabled);
        assert_eq!(settings.cpu.poll_time, Duration::from_millis(2500));
        assert!(!settings.monitor_output);
        assert!(!MemoryConfig::disabled().enabled);
    }

    #[test]
    fn test_entry_outputs_default_empty() {
        let entry = ProfileEntry {
            params: Vector::empty(),
            cpu_time_us: 5,
            cpu_core_time_us: 0,
            max_mem_usage: 0,
            run_outputs: None,
        };
        assert!(entry.outputs().is_empty());
    }
}
