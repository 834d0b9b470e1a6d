//! Pre-build erasure of configured output directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info, warn};

use crate::error::{BuildError, Result};
use crate::paths::{is_separator, join_fragments};
use crate::runtime::Runtime;

/// Empties output directories, keeping the directories themselves.
pub struct CleanupStage {
    runtime: Arc<dyn Runtime>,
}

impl CleanupStage {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    /// Empty every directory of `output_directories` under `base_path`.
    ///
    /// Directories shared by several extensions are cleaned once. Empty
    /// entries are skipped, since they would resolve to the base path itself.
    /// Returns the directories that were cleaned, in order.
    pub async fn clean(
        &self,
        base_path: &str,
        output_directories: &IndexMap<String, String>,
    ) -> Result<Vec<PathBuf>> {
        let mut targets = IndexSet::new();
        for (extension, directory) in output_directories {
            if directory.trim_matches(is_separator).is_empty() {
                warn!(
                    "Not cleaning output directory for '{}': it would resolve to the base path",
                    extension
                );
                continue;
            }
            targets.insert(PathBuf::from(join_fragments([base_path, directory.as_str()])));
        }

        for target in &targets {
            info!("* Cleaning output directory '{}'... *", target.display());
            self.clean_directory(target).await?;
            info!("* Cleaning complete. *");
        }

        Ok(targets.into_iter().collect())
    }

    /// Remove everything below `dir`. A missing directory is a no-op.
    pub async fn clean_directory(&self, dir: &Path) -> Result<()> {
        let clean_error = |source| BuildError::Clean {
            path: dir.to_path_buf(),
            source,
        };

        if !self.runtime.exists(dir) {
            debug!("Output directory {} does not exist", dir.display());
            return Ok(());
        }

        for child in self.runtime.read_dir(dir).await.map_err(clean_error)? {
            let metadata = match self.runtime.metadata(&child).await {
                Ok(metadata) => metadata,
                Err(err) if err.is_not_found() => continue,
                Err(err) => return Err(clean_error(err)),
            };

            let removed = if metadata.is_dir {
                self.runtime.remove_dir_all(&child).await
            } else {
                self.runtime.remove_file(&child).await
            };
            match removed {
                Ok(()) => debug!("Removed {}", child.display()),
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(clean_error(err)),
            }
        }

        Ok(())
    }
}
