//! Options for a single bunder run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bool_like::BoolLike;
use crate::settings::BunderSettings;

/// Run options accepted by the bunder entry point.
///
/// Either `bunder_settings` or `app_settings_json_path` must be present; the
/// inline settings win when both are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    #[serde(default, alias = "bunderSettings", skip_serializing_if = "Option::is_none")]
    pub bunder_settings: Option<BunderSettings>,

    /// App settings JSON file holding a `Bunder` section, relative to the working directory.
    #[serde(default, alias = "appSettingsJsonPath", skip_serializing_if = "Option::is_none")]
    pub app_settings_json_path: Option<PathBuf>,

    /// Root that output directories and source paths hang off. Defaults to `./`.
    #[serde(default, alias = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, alias = "cleanOutput")]
    pub clean_output: BoolLike,

    #[serde(default, alias = "newerOnly")]
    pub newer_only: BoolLike,

    /// Abort every outstanding pipeline on the first bundle failure.
    #[serde(default, alias = "failFast")]
    pub fail_fast: BoolLike,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: BunderSettings) -> Self {
        self.bunder_settings = Some(settings);
        self
    }

    pub fn with_app_settings_json_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_settings_json_path = Some(path.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_clean_output(mut self, clean: bool) -> Self {
        self.clean_output = BoolLike(clean);
        self
    }

    pub fn with_newer_only(mut self, newer_only: bool) -> Self {
        self.newer_only = BoolLike(newer_only);
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = BoolLike(fail_fast);
        self
    }

    pub fn base_path_or_default(&self) -> &str {
        self.base_path
            .as_deref()
            .filter(|base| !base.is_empty())
            .unwrap_or("./")
    }
}
