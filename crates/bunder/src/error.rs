//! Error types for bundle construction, resolution and the build pipelines.

use std::path::PathBuf;

use bunder_config::ConfigError;
use thiserror::Error;

use crate::minify::MinifyError;
use crate::runtime::RuntimeError;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid settings or bundle records; aborts the run before any pipeline starts.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no minifier for file extension '{extension}' on bundle '{bundle}'")]
    UnsupportedExtension { bundle: String, extension: String },

    #[error("bundle '{bundle}' references itself: {}", .cycle.join(" -> "))]
    ResolutionCycle { bundle: String, cycle: Vec<String> },

    #[error("bundle '{bundle}': failed to read {}: {source}", .path.display())]
    Read {
        bundle: String,
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("bundle '{bundle}': failed to write {}: {source}", .path.display())]
    Write {
        bundle: String,
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("bundle '{bundle}': {source}")]
    Minify {
        bundle: String,
        #[source]
        source: MinifyError,
    },

    #[error("failed to clean {}: {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("bundle '{bundle}': pipeline panicked")]
    Panicked { bundle: String },

    #[error("build aborted after bundle '{bundle}' failed: {source}")]
    Aborted {
        bundle: String,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Name of the bundle the error belongs to, if it is bundle specific.
    pub fn bundle(&self) -> Option<&str> {
        match self {
            BuildError::UnsupportedExtension { bundle, .. }
            | BuildError::ResolutionCycle { bundle, .. }
            | BuildError::Read { bundle, .. }
            | BuildError::Write { bundle, .. }
            | BuildError::Minify { bundle, .. }
            | BuildError::Panicked { bundle }
            | BuildError::Aborted { bundle, .. } => Some(bundle),
            BuildError::Config(_) | BuildError::Clean { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_names_bundle_and_extension() {
        let err = BuildError::UnsupportedExtension {
            bundle: "Fonts".to_string(),
            extension: "woff".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'woff'"));
        assert!(msg.contains("'Fonts'"));
        assert_eq!(err.bundle(), Some("Fonts"));
    }

    #[test]
    fn cycle_message_lists_the_path() {
        let err = BuildError::ResolutionCycle {
            bundle: "A".to_string(),
            cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };
        assert!(err.to_string().contains("A -> B -> A"));
    }

    #[test]
    fn config_errors_are_transparent() {
        let err: BuildError = ConfigError::MissingSettings.into();
        assert_eq!(err.to_string(), ConfigError::MissingSettings.to_string());
        assert_eq!(err.bundle(), None);
    }
}
