//! Top-level entry point: settings, optional clean, bundle construction, build.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bunder_config::{
    BunderSettings, ConfigError, RunOptions, parse_bundle_records, resolve_settings,
};
use tracing::{debug, info};

use crate::cleanup::CleanupStage;
use crate::definition::BundleSet;
use crate::error::Result;
use crate::orchestrator::{BuildOrchestrator, BuildReport, OrchestratorOptions};
use crate::paths::resolve_base_path;
use crate::runtime::{NativeRuntime, Runtime};

/// Settings, base path and bundles of a run, before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub settings: BunderSettings,
    /// Resolved base path, always ending with a separator.
    pub base_path: String,
    pub bundles: BundleSet,
}

/// Runs bundling for one working directory.
#[derive(Debug, Clone)]
pub struct Bunder {
    runtime: Arc<dyn Runtime>,
    cwd: PathBuf,
    max_parallel: Option<usize>,
}

impl Bunder {
    pub fn new(runtime: Arc<dyn Runtime>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            cwd: cwd.into(),
            max_parallel: None,
        }
    }

    /// Bunder on the real filesystem.
    pub fn native(cwd: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(NativeRuntime), cwd)
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = Some(max_parallel.max(1));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Settings for a run: inline settings first, then the app settings file.
    pub fn settings(&self, options: &RunOptions) -> Result<BunderSettings> {
        Ok(resolve_settings(options, &self.cwd)?)
    }

    pub fn base_path(&self, options: &RunOptions) -> String {
        resolve_base_path(&self.cwd, options.base_path_or_default())
    }

    /// Read the bundle records named by the settings and derive every bundle.
    pub async fn load_bundles(
        &self,
        settings: &BunderSettings,
        base_path: &str,
    ) -> Result<BundleSet> {
        let records_path = self.cwd.join(settings.bundles_config_file_path()?);
        let content = self
            .runtime
            .read_file(&records_path)
            .await
            .map_err(|err| match err {
                err if err.is_not_found() => ConfigError::NotFound(records_path.clone()),
                err => ConfigError::InvalidValue {
                    field: records_path.display().to_string(),
                    message: err.to_string(),
                },
            })?;
        let content = String::from_utf8_lossy(&content);

        let records = parse_bundle_records(&content, &records_path)?;
        Ok(BundleSet::from_configs(&records, settings, base_path)?)
    }

    /// Load everything a build needs without touching outputs.
    pub async fn prepare(&self, options: &RunOptions) -> Result<PreparedRun> {
        let settings = self.settings(options)?;
        let base_path = self.base_path(options);
        let bundles = self.load_bundles(&settings, &base_path).await?;
        Ok(PreparedRun {
            settings,
            base_path,
            bundles,
        })
    }

    /// Empty the configured output directories.
    pub async fn clean(&self, settings: &BunderSettings, base_path: &str) -> Result<Vec<PathBuf>> {
        CleanupStage::new(Arc::clone(&self.runtime))
            .clean(base_path, &settings.output_directories)
            .await
    }

    /// Full run: settings, optional clean, bundle construction, build.
    ///
    /// The clean finishes before any bundle is read or written.
    pub async fn run(&self, options: &RunOptions) -> Result<BuildReport> {
        let settings = self.settings(options)?;
        let base_path = self.base_path(options);
        debug!("Base path: {}", base_path);

        if options.clean_output.get() {
            let cleaned = self.clean(&settings, &base_path).await?;
            info!("Cleaned {} output directories", cleaned.len());
        }

        let bundles = self.load_bundles(&settings, &base_path).await?;
        self.orchestrator(options).run(&bundles, &base_path).await
    }

    fn orchestrator(&self, options: &RunOptions) -> BuildOrchestrator {
        BuildOrchestrator::new(Arc::clone(&self.runtime)).with_options(OrchestratorOptions {
            newer_only: options.newer_only.get(),
            fail_fast: options.fail_fast.get(),
            max_parallel: self.max_parallel,
        })
    }
}
