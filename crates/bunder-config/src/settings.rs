//! Process-wide bunder settings.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// The `Bunder` section of the app settings file.
///
/// Keys are read in the PascalCase form used by existing settings files; the
/// camelCase and snake_case spellings are accepted as well. Keys bunder does
/// not know about (`UseBundledOutput`, `UseVersioning`, ...) are kept in
/// [`BunderSettings::extra`] for whoever consumes the settings next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BunderSettings {
    /// Default output directory per file extension (lowercase, no dot).
    #[serde(default, alias = "outputDirectories", alias = "output_directories")]
    pub output_directories: IndexMap<String, String>,

    /// Location of the bundle records file, relative to the working directory.
    #[serde(
        default,
        alias = "bundlesConfigFilePath",
        alias = "bundles_config_file_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundles_config_file_path: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl BunderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_directory(
        mut self,
        extension: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        self.output_directories
            .insert(extension.into().to_ascii_lowercase(), directory.into());
        self
    }

    pub fn with_bundles_config_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundles_config_file_path = Some(path.into());
        self
    }

    /// Default output directory for `extension`.
    ///
    /// Exact keys win; a key differing only in case is accepted as a fallback.
    pub fn output_directory_for(&self, extension: &str) -> Option<&str> {
        self.output_directories
            .get(extension)
            .or_else(|| {
                self.output_directories
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(extension))
                    .map(|(_, dir)| dir)
            })
            .map(String::as_str)
    }

    pub fn bundles_config_file_path(&self) -> Result<&Path> {
        self.bundles_config_file_path
            .as_deref()
            .ok_or(ConfigError::MissingSetting("BundlesConfigFilePath"))
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
