//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use bunder::{Bunder, RunOptions};
use bunder_config::load_run_options;
use serde::Serialize;
use tracing::debug;

use crate::cli::{BuildArgs, SettingsArgs};
use crate::error::{Result, ResultExt};

/// Settings file picked up from the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Run option overrides taken from the command line.
///
/// Unset values are skipped so that `BUNDER_*` environment variables and
/// defaults still apply.
#[derive(Debug, Default, Serialize)]
pub struct RunOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_settings_json_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_output: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
}

impl RunOverrides {
    pub fn from_settings(args: &SettingsArgs) -> Self {
        Self {
            app_settings_json_path: args.settings.clone(),
            base_path: args.base_path.clone(),
            ..Self::default()
        }
    }

    pub fn from_build(args: &BuildArgs) -> Self {
        Self {
            clean_output: args.clean,
            newer_only: args.newer_only,
            fail_fast: args.fail_fast.then_some(true),
            ..Self::from_settings(&args.settings)
        }
    }
}

/// Working directory for a command: `--cwd` or the process directory.
pub fn get_cwd(args: &SettingsArgs) -> Result<PathBuf> {
    match &args.cwd {
        Some(cwd) => Ok(cwd.clone()),
        None => std::env::current_dir().context("Failed to determine working directory"),
    }
}

/// Layer defaults, environment and overrides, then fall back to the default
/// settings file in `cwd` when nothing names a settings source.
pub fn run_options(overrides: &RunOverrides, cwd: &Path) -> Result<RunOptions> {
    let mut options = load_run_options(overrides)?;

    if options.bunder_settings.is_none() && options.app_settings_json_path.is_none() {
        let fallback = cwd.join(DEFAULT_SETTINGS_FILE);
        if fallback.is_file() {
            debug!("Using settings from {}", fallback.display());
            options.app_settings_json_path = Some(PathBuf::from(DEFAULT_SETTINGS_FILE));
        }
    }

    Ok(options)
}

/// Build the run options and the `Bunder` for a command.
pub fn prepare(overrides: &RunOverrides, args: &SettingsArgs) -> Result<(Bunder, RunOptions)> {
    let cwd = get_cwd(args)?;
    let options = run_options(overrides, &cwd)?;
    Ok((Bunder::native(cwd), options))
}
