#![warn(missing_docs)]
//! SweepBench Report - Profile Output
//!
//! Writes a [`Profile`](sweepbench_core::Profile) in one of:
//! - JSON (compact array, one object per parameter point)
//! - CSV (one row per parameter point)
//! - Human (terminal table)

mod csv;
mod human;
mod json;
mod output;

pub use csv::generate_csv_profile;
pub use human::{format_bytes, format_human_output, format_micros};
pub use json::generate_json_profile;
pub use output::{OutputConfig, default_prefix, save_profile};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing a profile
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output directory or file could not be written
    #[error("cannot write {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Output type tag not recognized
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Compact JSON array
    #[default]
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl OutputFormat {
    /// File extension used when the profile is saved
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Human => "txt",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Human => "human",
        };
        f.write_str(name)
    }
}
