//! Build command implementation.

use bunder::BuildReport;
use tracing::debug;

use crate::cli::BuildArgs;
use crate::commands::utils::{self, RunOverrides};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the build command.
///
/// # Steps
///
/// 1. Layer run options (defaults, `BUNDER_*` environment, flags)
/// 2. Load settings, clean if requested, derive bundles
/// 3. Build every bundle and print the summary
///
/// # Errors
///
/// Configuration errors and reference cycles abort before anything is
/// written. Individual bundle failures are reported in the summary and turn
/// into `CliError::BundlesFailed`.
pub async fn execute(args: BuildArgs) -> Result<BuildReport> {
    let overrides = RunOverrides::from_build(&args);
    let (mut bunder, options) = utils::prepare(&overrides, &args.settings)?;
    if let Some(jobs) = args.jobs {
        bunder = bunder.with_max_parallel(jobs);
    }
    debug!("Run options: {:?}", options);

    ui::info("Bundling...");
    let report = bunder.run(&options).await?;

    if report.outcomes.is_empty() {
        ui::warning("No bundles found.");
        return Ok(report);
    }

    ui::print_build_summary(&report);

    let failed = report.failures().count();
    if failed > 0 {
        for (bundle, err) in report.failures() {
            ui::error(&format!("{}: {}", bundle, err));
        }
        return Err(CliError::BundlesFailed { count: failed });
    }

    ui::success(&format!(
        "Bundled {} in {}",
        plural(report.outcomes.len(), "bundle"),
        ui::format_duration(report.duration)
    ));
    Ok(report)
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
