#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bunder
//!
//! Build-time asset bundler driven by static configuration.
//!
//! Bundles are named lists of source files whose entries may name other
//! bundles. Each bundle is concatenated in resolved order, minified for its
//! extension (`js` or `css`) and written to a path derived from the settings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bunder::{Bunder, RunOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RunOptions::new()
//!     .with_app_settings_json_path("appsettings.json")
//!     .with_base_path("./wwwroot/")
//!     .with_newer_only(true);
//!
//! let report = Bunder::native(std::env::current_dir()?).run(&options).await?;
//! for (bundle, err) in report.failures() {
//!     eprintln!("{bundle}: {err}");
//! }
//! # Ok(()) }
//! ```
//!
//! ### Driving the stages yourself
//!
//! ```no_run
//! use std::sync::Arc;
//! use bunder::{BuildOrchestrator, BundleConfig, BundleSet, BunderSettings, NativeRuntime};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = BunderSettings::new().with_output_directory("js", "out/js");
//! let bundles = BundleSet::from_configs(
//!     &[BundleConfig::new("App", ["js/x.js", "js/y.js"])],
//!     &settings,
//!     "/srv/site/",
//! )?;
//!
//! let report = BuildOrchestrator::new(Arc::new(NativeRuntime))
//!     .newer_only(true)
//!     .run(&bundles, "/srv/site/")
//!     .await?;
//! assert!(!report.has_failures());
//! # Ok(()) }
//! ```

pub mod cleanup;
pub mod definition;
pub mod error;
pub mod minify;
pub mod orchestrator;
pub mod paths;
pub mod pipeline;
pub mod resolver;
pub mod run;
pub mod runtime;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use bunder_config::{BoolLike, BunderSettings, BundleConfig, ConfigError, RunOptions};

pub use cleanup::CleanupStage;
pub use definition::{BundleDefinition, BundleSet};
pub use error::{BuildError, Result};
pub use minify::{MinifyError, Minifier};
pub use orchestrator::{
    BuildOrchestrator, BuildReport, BuildRunState, BundleOutcome, BundleStatus,
    OrchestratorOptions,
};
pub use resolver::{FileListResolver, resolve_files};
pub use run::{Bunder, PreparedRun};
pub use runtime::{FileMetadata, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
