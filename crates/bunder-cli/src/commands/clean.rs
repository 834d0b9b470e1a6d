//! Clean command implementation.

use crate::cli::CleanArgs;
use crate::commands::utils::{self, RunOverrides};
use crate::error::Result;
use crate::ui;

/// Execute the clean command.
///
/// Empties every configured output directory under the base path. Missing
/// directories are skipped.
pub async fn execute(args: CleanArgs) -> Result<()> {
    let overrides = RunOverrides::from_settings(&args.settings);
    let (bunder, options) = utils::prepare(&overrides, &args.settings)?;

    let settings = bunder.settings(&options)?;
    let base_path = bunder.base_path(&options);
    let cleaned = bunder.clean(&settings, &base_path).await?;

    if cleaned.is_empty() {
        ui::warning("No output directories configured.");
    } else {
        for dir in &cleaned {
            ui::success(&format!("Cleaned {}", dir.display()));
        }
    }
    Ok(())
}
