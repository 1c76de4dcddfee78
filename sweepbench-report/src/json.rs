//! JSON Output
//!
//! One compact array, one object per profile entry:
//!
//! ```text
//! [{"params":[1.0,2.0],"run_outputs":[1,1],"cpu_time_us":12,"cpu_core_time_us":0,"max_mem_usage":0}]
//! ```

use serde::Serialize;
use sweepbench_core::{Profile, ProfileEntry};

/// Serialized form of one entry
#[derive(Debug, Serialize)]
struct EntryRecord<'a> {
    params: &'a [f64],
    run_outputs: &'a [i32],
    cpu_time_us: u64,
    cpu_core_time_us: u64,
    max_mem_usage: u64,
}

impl<'a> From<&'a ProfileEntry> for EntryRecord<'a> {
    fn from(entry: &'a ProfileEntry) -> Self {
        Self {
            params: entry.params.values(),
            run_outputs: entry.outputs(),
            cpu_time_us: entry.cpu_time_us,
            cpu_core_time_us: entry.cpu_core_time_us,
            max_mem_usage: entry.max_mem_usage,
        }
    }
}

/// Generate a compact JSON array for the profile
pub fn generate_json_profile(profile: &Profile) -> Result<String, serde_json::Error> {
    let records: Vec<EntryRecord<'_>> = profile.entries.iter().map(EntryRecord::from).collect();
    serde_json::to_string(&records)
}
