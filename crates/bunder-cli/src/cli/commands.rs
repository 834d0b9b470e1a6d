use clap::{Args, Subcommand};
use std::path::PathBuf;

use bunder_config::parse_bool_like;

/// Available bunder subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every bundle
    ///
    /// Concatenates each bundle's resolved sources in order, minifies the
    /// result for its extension and writes it to the bundle's output path.
    Build(BuildArgs),

    /// Empty the configured output directories
    Clean(CleanArgs),

    /// Validate settings and bundle records without building
    ///
    /// Derives every bundle, resolves every file list and reports missing
    /// source files and unsupported extensions.
    Check(CheckArgs),
}

/// Where settings come from, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// App settings JSON file holding the `Bunder` section
    ///
    /// Resolved against the working directory. Defaults to
    /// `appsettings.json` when that file exists.
    #[arg(short = 's', long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Base path prefixed to sources and output directories
    #[arg(short = 'b', long, value_name = "DIR")]
    pub base_path: Option<String>,

    /// Working directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Empty the output directories before building
    ///
    /// Accepts true/yes/1 (any case); anything else is false.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_flag)]
    pub clean: Option<bool>,

    /// Only rebuild from sources newer than the existing output
    #[arg(short = 'n', long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_flag)]
    pub newer_only: Option<bool>,

    /// Stop every remaining bundle after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Maximum number of bundles built at the same time
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Arguments for the clean command
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Also verify that every resolved source file exists
    #[arg(long)]
    pub sources: bool,
}

/// Lenient boolean flag value.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(parse_bool_like(value))
}
