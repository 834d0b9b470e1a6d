//! Formatting utilities for sizes, durations, and the build summary.

use bunder::{BuildReport, BundleStatus};
use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Format file size in human-readable format.
///
/// # Examples
///
/// ```
/// use bunder_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bunder_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Marker shown in front of each bundle in the summary.
pub fn status_symbol(status: &BundleStatus) -> &'static str {
    match status {
        BundleStatus::Built { .. } | BundleStatus::Copied { .. } => "▸",
        BundleStatus::Skipped | BundleStatus::UpToDate => "·",
        BundleStatus::Failed(_) => "✗",
    }
}

fn detail(status: &BundleStatus) -> String {
    match status {
        BundleStatus::Built {
            output_path,
            sources,
            bytes,
        } => format!(
            "{} ({}, {} source{})",
            output_path.display(),
            format_size(*bytes as u64),
            sources,
            if *sources == 1 { "" } else { "s" }
        ),
        BundleStatus::Copied { output_path, bytes } => {
            format!("{} ({}, copied)", output_path.display(), format_size(*bytes as u64))
        }
        BundleStatus::Skipped => "reference only".to_string(),
        BundleStatus::UpToDate => "up to date".to_string(),
        BundleStatus::Failed(err) => err.to_string(),
    }
}

fn summary_counts(report: &BuildReport) -> String {
    ["built", "copied", "skipped", "up-to-date", "failed"]
        .iter()
        .filter_map(|label| {
            let count = report.count(label);
            (count > 0).then(|| format!("{} {}", count, label))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the per-bundle build summary to stderr.
pub fn print_build_summary(report: &BuildReport) {
    let width = (Term::stderr().size().1 as usize).min(80);
    let colors = colors_enabled();

    if colors {
        eprintln!("\n{}", "Build Summary".bold().underline());
    } else {
        eprintln!("\nBuild Summary");
    }
    eprintln!("{}", "─".repeat(width));

    for outcome in &report.outcomes {
        let symbol = status_symbol(&outcome.status);
        let detail = detail(&outcome.status);
        if !colors {
            eprintln!("  {} {} {}", symbol, outcome.name, detail);
        } else if outcome.status.is_failure() {
            eprintln!(
                "  {} {} {}",
                symbol.red(),
                outcome.name.bright_white().bold(),
                detail.red()
            );
        } else {
            eprintln!(
                "  {} {} {}",
                symbol.blue(),
                outcome.name.bright_white().bold(),
                detail.dimmed()
            );
        }
    }

    eprintln!("{}", "─".repeat(width));

    let counts = summary_counts(report);
    let duration = format_duration(report.duration);
    if colors {
        eprintln!("  {} {} in {}", "Total:".bold(), counts.green(), duration.green());
    } else {
        eprintln!("  Total: {} in {}", counts, duration);
    }
}
