//! Human-Readable Output
//!
//! Terminal table for one profile: parameter point, mean call time,
//! mean peak heap growth and the number of recorded outputs.

use sweepbench_core::{FunctionShape, Profile, Vector};

/// Format microseconds with a unit that keeps the number short
pub fn format_micros(us: u64) -> String {
    if us < 1_000 {
        format!("{us} µs")
    } else if us < 1_000_000 {
        format!("{:.2} ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2} s", us as f64 / 1_000_000.0)
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

fn format_point(params: &Vector) -> String {
    if params.dimensions() == 0 {
        return "()".to_string();
    }
    let values: Vec<String> = params.values().iter().map(|v| format!("{v}")).collect();
    format!("({})", values.join(", "))
}

/// Format a profile for terminal display
pub fn format_human_output(name: &str, profile: &Profile) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("SweepBench Results: {name}\n"));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let shape = match profile.shape {
        FunctionShape::NoParams => "no parameters".to_string(),
        FunctionShape::Params => format!("{} parameter dimensions", profile.dimensions),
    };
    output.push_str(&format!(
        "{shape}, {} points, {} runs each\n",
        profile.len(),
        profile.settings.runs_to_average
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    let points: Vec<String> = profile.entries.iter().map(|e| format_point(&e.params)).collect();
    let width = points.iter().map(String::len).max().unwrap_or(6).max(6);

    output.push_str(&format!(
        "  {:<width$}  {:>12}  {:>12}  {:>8}\n",
        "params", "mean", "peak mem", "outputs"
    ));
    for (entry, point) in profile.entries.iter().zip(&points) {
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>12}  {:>8}\n",
            point,
            format_micros(entry.cpu_time_us),
            format_bytes(entry.max_mem_usage),
            entry.outputs().len()
        ));
    }

    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "total mean time: {}  largest peak: {}\n",
        format_micros(profile.total_cpu_time_us()),
        format_bytes(profile.max_mem_usage())
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{no_param_profile, param_profile};

    #[test]
    fn test_format_micros() {
        assert_eq!(format_micros(999), "999 µs");
        assert_eq!(format_micros(1_500), "1.50 ms");
        assert_eq!(format_micros(2_000_000), "2.00 s");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_human_output_lists_points() {
        let text = format_human_output("grid", &param_profile());
        assert!(text.contains("SweepBench Results: grid"));
        assert!(text.contains("2 parameter dimensions, 2 points, 3 runs each"));
        assert!(text.contains("(1, 2.5)"));
        assert!(text.contains("(2, 2.5)"));
        assert!(text.contains("largest peak: 2.0 KiB"));
    }

    #[test]
    fn test_human_output_no_params() {
        let text = format_human_output("single", &no_param_profile());
        assert!(text.contains("no parameters, 1 points"));
        assert!(text.contains("()"));
    }
}
