//! Configuration loading from sweep.toml
//!
//! SweepBench configuration can be specified in a `sweep.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.
//!
//! Run settings left out of the file keep whatever the suite itself configured.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sweepbench_core::RunSettings;
use tracing::warn;

/// Name of the configuration file looked up by [`SweepConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "sweep.toml";

/// SweepBench configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Memory profiling configuration
    #[serde(default)]
    pub memory: MemorySection,
    /// Core time configuration (reserved)
    #[serde(default)]
    pub cpu: CpuSection,
    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Calls averaged into each entry
    #[serde(default)]
    pub runs_to_average: Option<usize>,
    /// Record the return value of every call
    #[serde(default)]
    pub monitor_output: Option<bool>,
}

/// Memory profiling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MemorySection {
    /// Sample peak heap usage
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Sampling interval (e.g., "1ms", "250us")
    #[serde(default)]
    pub poll_time: Option<String>,
}

/// Core time configuration, carried into profiles but never measured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CpuSection {
    /// Request core time accounting
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Sampling interval (e.g., "2500ms")
    #[serde(default)]
    pub poll_time: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output format: "json", "csv", "human"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for profiles
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// File name prefix; a local timestamp when absent
    #[serde(default)]
    pub prefix: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
            prefix: None,
        }
    }
}

fn default_format() -> String {
    "json".to_string()
}
fn default_output_dir() -> String {
    "target/sweepbench".to_string()
}

/// Run setting overrides; `None` leaves the suite's value alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsOverride {
    /// Calls averaged into each entry
    pub runs_to_average: Option<usize>,
    /// Memory profiling switch
    pub memory_enabled: Option<bool>,
    /// Memory sampling interval
    pub memory_poll_time: Option<Duration>,
    /// Core time switch
    pub cpu_enabled: Option<bool>,
    /// Core time sampling interval
    pub cpu_poll_time: Option<Duration>,
    /// Output monitoring switch
    pub monitor_output: Option<bool>,
}

impl SettingsOverride {
    /// Layer `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: SettingsOverride) -> Self {
        Self {
            runs_to_average: other.runs_to_average.or(self.runs_to_average),
            memory_enabled: other.memory_enabled.or(self.memory_enabled),
            memory_poll_time: other.memory_poll_time.or(self.memory_poll_time),
            cpu_enabled: other.cpu_enabled.or(self.cpu_enabled),
            cpu_poll_time: other.cpu_poll_time.or(self.cpu_poll_time),
            monitor_output: other.monitor_output.or(self.monitor_output),
        }
    }

    /// Apply the overrides to a suite's settings
    pub fn apply(&self, mut settings: RunSettings) -> RunSettings {
        if let Some(runs) = self.runs_to_average {
            settings.runs_to_average = runs;
        }
        if let Some(enabled) = self.memory_enabled {
            settings.memory.enabled = enabled;
        }
        if let Some(poll) = self.memory_poll_time {
            settings.memory.poll_time = poll;
        }
        if let Some(enabled) = self.cpu_enabled {
            settings.cpu.enabled = enabled;
        }
        if let Some(poll) = self.cpu_poll_time {
            settings.cpu.poll_time = poll;
        }
        if let Some(monitor) = self.monitor_output {
            settings.monitor_output = monitor;
        }
        settings
    }
}

impl SweepConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `sweep.toml`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let path = Self::find_file(start)?;
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring unreadable {}: {e}", path.display());
                None
            }
        }
    }

    fn find_file(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Run setting overrides declared in the file
    pub fn overrides(&self) -> anyhow::Result<SettingsOverride> {
        let parse = |s: &Option<String>| s.as_deref().map(Self::parse_duration).transpose();
        Ok(SettingsOverride {
            runs_to_average: self.runner.runs_to_average,
            memory_enabled: self.memory.enabled,
            memory_poll_time: parse(&self.memory.poll_time)?,
            cpu_enabled: self.cpu.enabled,
            cpu_poll_time: parse(&self.cpu.poll_time)?,
            monitor_output: self.runner.monitor_output,
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# SweepBench Configuration
# https://github.com/ml-rust/sweepbench
#
# Run settings that are commented out keep the value each suite sets in code.

[runner]
# Calls averaged into each profile entry
# runs_to_average = 100
# Record the return value of every call
# monitor_output = false

[memory]
# Sample peak heap usage (needs TrackingAllocator as #[global_allocator])
# enabled = true
# Sampling interval
# poll_time = "1ms"

[cpu]
# Core time accounting is reserved; cpu_core_time_us is always 0
# enabled = false
# poll_time = "2500ms"

[output]
# Output format: json, csv, human
format = "json"
# Output directory for profiles
directory = "target/sweepbench"
# File name prefix (defaults to a local timestamp)
# prefix = "nightly"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}
