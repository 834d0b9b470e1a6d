//! Configuration surface for bunder.
//!
//! Bunder is driven by two JSON documents: an app settings file whose `Bunder`
//! section names the output directories and the bundle records file, and the
//! bundle records file itself. This crate owns the serde types for both, the
//! run options accepted by the entry point, and the loaders that read them.

pub mod bool_like;
pub mod bundle;
pub mod error;
pub mod loading;
pub mod options;
pub mod settings;

pub use bool_like::{BoolLike, parse_bool_like, to_bool};
pub use bundle::BundleConfig;
pub use error::{ConfigError, Result};
pub use loading::{
    ENV_PREFIX, SETTINGS_SECTION, load_run_options, load_settings, parse_bundle_records,
    resolve_settings,
};
pub use options::RunOptions;
pub use settings::BunderSettings;
