//! Output Files
//!
//! Resolves `<directory>/<prefix>.bench.<ext>` and writes the profile in the
//! selected format.

use crate::{OutputFormat, ReportError};
use crate::{csv::generate_csv_profile, human::format_human_output, json::generate_json_profile};
use chrono::Local;
use std::path::{Path, PathBuf};
use sweepbench_core::Profile;
use tracing::{error, info};

/// Where and how a profile is saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Directory the file is written to
    pub directory: PathBuf,
    /// File name prefix, `.bench.<ext>` is appended
    pub prefix: String,
}

impl OutputConfig {
    /// Output in the current directory; a `None` prefix uses [`default_prefix`]
    pub fn new(format: OutputFormat, prefix: Option<&str>) -> Self {
        Self {
            format,
            directory: PathBuf::from("."),
            prefix: prefix.map_or_else(default_prefix, str::to_string),
        }
    }

    /// Write into `directory` instead
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Full path of the output file
    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.bench.{}", self.prefix, self.format.extension()))
    }
}

/// Local timestamp prefix, e.g. `2026-10-19_14-29-03.benchmark`
pub fn default_prefix() -> String {
    format!("{}.benchmark", Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| {
        error!("Cannot open output file {}", path.display());
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Save `profile` according to `conf`, returning the written path
pub fn save_profile(profile: &Profile, conf: &OutputConfig) -> Result<PathBuf, ReportError> {
    let contents = match conf.format {
        OutputFormat::Json => generate_json_profile(profile)?,
        OutputFormat::Csv => generate_csv_profile(profile),
        OutputFormat::Human => format_human_output(&conf.prefix, profile),
    };

    std::fs::create_dir_all(&conf.directory).map_err(io_error(&conf.directory))?;
    let path = conf.path();
    std::fs::write(&path, contents).map_err(io_error(&path))?;

    info!(path = %path.display(), entries = profile.len(), "saved benchmark profile");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::param_profile;

    #[test]
    fn test_explicit_prefix_path() {
        let conf = OutputConfig::new(OutputFormat::Json, Some("testing_cpu_time_bench_np"))
            .with_directory("out");
        assert_eq!(
            conf.path(),
            PathBuf::from("out/testing_cpu_time_bench_np.bench.json")
        );

        let csv = OutputConfig::new(OutputFormat::Csv, Some("grid"));
        assert_eq!(csv.path(), PathBuf::from("./grid.bench.csv"));
    }

    #[test]
    fn test_default_prefix_is_timestamp() {
        let conf = OutputConfig::new(OutputFormat::Json, None);
        assert!(conf.prefix.ends_with(".benchmark"));
        assert!(!conf.prefix.contains('/'));
        // YYYY-MM-DD_HH-MM-SS
        assert_eq!(conf.prefix.len(), "2026-01-01_00-00-00.benchmark".len());
    }

    #[test]
    fn test_save_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let profile = param_profile();

        let json_conf =
            OutputConfig::new(OutputFormat::Json, Some("sweep")).with_directory(dir.path());
        let json_path = save_profile(&profile, &json_conf).unwrap();
        assert_eq!(json_path, dir.path().join("sweep.bench.json"));
        let text = std::fs::read_to_string(&json_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);

        let csv_conf =
            OutputConfig::new(OutputFormat::Csv, Some("sweep")).with_directory(dir.path());
        let csv_path = save_profile(&profile, &csv_conf).unwrap();
        let text = std::fs::read_to_string(csv_path).unwrap();
        assert!(text.starts_with("v0,v1,cpu_time_us"));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let conf = OutputConfig::new(OutputFormat::Human, Some("run")).with_directory(&nested);
        let path = save_profile(&param_profile(), &conf).unwrap();
        assert_eq!(path, nested.join("run.bench.txt"));
        assert!(path.exists());
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let conf = OutputConfig::new(OutputFormat::Json, Some("run")).with_directory(&blocker);
        assert!(matches!(
            save_profile(&param_profile(), &conf),
            Err(ReportError::Io { .. })
        ));
    }
}
