//! Loading settings, bundle records and run options from disk and environment.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use tracing::debug;

use crate::bundle::BundleConfig;
use crate::error::{ConfigError, Result};
use crate::options::RunOptions;
use crate::settings::BunderSettings;

/// Section of the app settings file that holds [`BunderSettings`].
pub const SETTINGS_SECTION: &str = "Bunder";

/// Prefix of environment variables that override run options (`BUNDER_NEWER_ONLY=yes`).
pub const ENV_PREFIX: &str = "BUNDER_";

/// Load the `Bunder` section of an app settings JSON file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist and
/// `ConfigError::InvalidValue` if it has no `Bunder` section or the section
/// has the wrong shape.
pub fn load_settings(path: &Path) -> Result<BunderSettings> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let figment = Figment::from(Json::file(path));
    if figment.find_value(SETTINGS_SECTION).is_err() {
        return Err(ConfigError::invalid(
            SETTINGS_SECTION,
            format!("no '{}' section in {}", SETTINGS_SECTION, path.display()),
        ));
    }

    let settings: BunderSettings = figment
        .focus(SETTINGS_SECTION)
        .extract()
        .map_err(|e| ConfigError::invalid(SETTINGS_SECTION, e))?;

    debug!(
        "Loaded settings from {} ({} output directories)",
        path.display(),
        settings.output_directories.len()
    );
    Ok(settings)
}

/// Pick the settings for a run: inline settings first, then the app settings file.
///
/// Relative settings paths are resolved against `cwd`.
pub fn resolve_settings(options: &RunOptions, cwd: &Path) -> Result<BunderSettings> {
    if let Some(settings) = &options.bunder_settings {
        return Ok(settings.clone());
    }

    match &options.app_settings_json_path {
        Some(path) => load_settings(&cwd.join(path)),
        None => Err(ConfigError::MissingSettings),
    }
}

/// Parse the contents of a bundle records file.
///
/// `null` entries are rejected with `ConfigError::MissingBundle`. `origin`
/// only names the file in errors and logs.
pub fn parse_bundle_records(content: &str, origin: &Path) -> Result<Vec<BundleConfig>> {
    let records: Vec<Option<BundleConfig>> = serde_json::from_str(content)
        .map_err(|e| ConfigError::invalid(origin.display().to_string(), e))?;

    let records = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.ok_or(ConfigError::MissingBundle { index }))
        .collect::<Result<Vec<_>>>()?;

    debug!("Loaded {} bundle records from {}", records.len(), origin.display());
    Ok(records)
}

/// Build run options from defaults, `BUNDER_*` environment variables and caller overrides.
///
/// Priority: overrides > environment > defaults. Overrides should skip
/// serializing the values the caller did not set.
pub fn load_run_options<T: Serialize>(overrides: &T) -> Result<RunOptions> {
    Figment::from(Serialized::defaults(RunOptions::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| ConfigError::invalid("run options", e))
}
