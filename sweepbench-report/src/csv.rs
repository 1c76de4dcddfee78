//! CSV Output
//!
//! Header `v0,...,v{d-1},cpu_time_us,cpu_core_time_us,max_mem_usage,run_outputs`,
//! then one row per entry. Recorded outputs spill into extra columns after
//! `max_mem_usage`.

use sweepbench_core::Profile;

/// Generate CSV text for the profile
pub fn generate_csv_profile(profile: &Profile) -> String {
    let mut output = String::new();

    for i in 0..profile.dimensions {
        output.push_str(&format!("v{i},"));
    }
    output.push_str("cpu_time_us,cpu_core_time_us,max_mem_usage,run_outputs\n");

    for entry in &profile.entries {
        for value in entry.params.values() {
            output.push_str(&format!("{value:.6},"));
        }
        output.push_str(&format!(
            "{},{},{}",
            entry.cpu_time_us, entry.cpu_core_time_us, entry.max_mem_usage
        ));
        for run_output in entry.outputs() {
            output.push_str(&format!(",{run_output}"));
        }
        output.push('\n');
    }

    output
}
