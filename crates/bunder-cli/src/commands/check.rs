//! Check command implementation.
//!
//! Validates configuration without building.

use std::path::Path;

use bunder::{FileListResolver, PreparedRun, Runtime};

use crate::cli::CheckArgs;
use crate::commands::build::plural;
use crate::commands::utils::{self, RunOverrides};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load settings and bundle records
/// 2. Derive every bundle (names, extensions, output paths)
/// 3. Resolve every buildable bundle's file list, failing on cycles
/// 4. Report unsupported extensions and, with `--sources`, missing files
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let overrides = RunOverrides::from_settings(&args.settings);
    let (bunder, options) = utils::prepare(&overrides, &args.settings)?;
    let prepared = bunder.prepare(&options).await?;

    ui::success(&format!(
        "Loaded {} from {}",
        plural(prepared.bundles.len(), "bundle"),
        bunder.cwd().display()
    ));

    let problems = report_bundles(bunder.runtime().as_ref(), &prepared, args.sources).await;
    if problems > 0 {
        return Err(CliError::InvalidArgument(format!(
            "{} found in bundle configuration",
            plural(problems, "problem")
        )));
    }

    ui::success("Configuration is valid!");
    Ok(())
}

async fn report_bundles(
    runtime: &dyn Runtime,
    prepared: &PreparedRun,
    check_sources: bool,
) -> usize {
    let resolver = FileListResolver::new(&prepared.bundles, &prepared.base_path);
    let mut problems = 0;

    for bundle in &prepared.bundles {
        if bundle.is_reference_only() {
            match bundle.static_output_path() {
                Some(path) => ui::info(&format!(
                    "{} (reference only) copies {} -> {}",
                    bundle.name(),
                    path,
                    bundle.output_path()
                )),
                None => ui::info(&format!("{} (reference only)", bundle.name())),
            }
            continue;
        }

        if let Err(err) = bundle.minifier() {
            ui::error(&err.to_string());
            problems += 1;
        }

        let files = match resolver.resolve(bundle) {
            Ok(files) => files,
            Err(err) => {
                ui::error(&err.to_string());
                problems += 1;
                continue;
            }
        };

        ui::info(&format!("{} -> {}", bundle.name(), bundle.output_path()));
        for file in &files {
            let missing = check_sources && !source_exists(runtime, file).await;
            if missing {
                ui::error(&format!("  missing source {}", file));
                problems += 1;
            } else {
                ui::item(file);
            }
        }
    }

    problems
}

async fn source_exists(runtime: &dyn Runtime, file: &str) -> bool {
    runtime
        .metadata(Path::new(file))
        .await
        .map(|metadata| metadata.is_file)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunder::runtime::test_utils::MemoryRuntime;
    use bunder::{Bunder, BunderSettings, RunOptions};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_sources_are_looked_up_through_the_runtime() {
        let runtime = Arc::new(
            MemoryRuntime::new()
                .with_file(
                    "/site/bundles.json",
                    r#"[{ "Name": "Site", "Files": ["a.js", "b.js"] }]"#,
                )
                .with_file("/site/a.js", "var a = 1;"),
        );
        let settings = BunderSettings::new()
            .with_output_directory("js", "/dist")
            .with_bundles_config_file_path("bundles.json");
        let bunder = Bunder::new(runtime.clone(), "/site");
        let prepared = bunder
            .prepare(&RunOptions::new().with_settings(settings))
            .await
            .unwrap();

        assert!(source_exists(runtime.as_ref(), "/site/a.js").await);
        assert!(!source_exists(runtime.as_ref(), "/site/b.js").await);
        assert_eq!(report_bundles(runtime.as_ref(), &prepared, true).await, 1);
        assert_eq!(report_bundles(runtime.as_ref(), &prepared, false).await, 0);
    }
}
