//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError, ConfigError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::BundlesFailed { count } => miette::miette!(
            help = "Run with --verbose to see every file each bundle includes",
            "{} bundle(s) failed to build",
            count
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::MissingSettings => miette::miette!(
            help = "Pass --settings <FILE> or add an appsettings.json with a 'Bunder' section",
            "Configuration error: {}",
            err
        ),
        ConfigError::ExtensionNotDetermined { .. } => miette::miette!(
            help = "Set OutputFileName, or list at least one file with an extension",
            "Configuration error: {}",
            err
        ),
        ConfigError::DuplicateBundle { .. } => miette::miette!(
            help = "Bundle names are how other bundles reference them; rename one of them",
            "Configuration error: {}",
            err
        ),
        _ => miette::miette!("Configuration error: {}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Config(e) => config_error_to_miette(e),
        BuildError::ResolutionCycle { .. } => miette::miette!(
            help = "Remove one of the bundle references in the chain",
            "{}",
            err
        ),
        BuildError::UnsupportedExtension { .. } => miette::miette!(
            help = "Only js and css bundles can be minified; mark other bundles ReferenceOnly",
            "{}",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}
