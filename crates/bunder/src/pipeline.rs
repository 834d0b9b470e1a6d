//! Stages of a single bundle pipeline: read, staleness filter, concatenate, write.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::runtime::Runtime;

/// Separator placed between concatenated sources.
pub const CONCAT_SEPARATOR: &[u8] = b"\n";

/// A source read from disk, with its modification time when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub modified: Option<u64>,
}

/// Read every source concurrently, keeping the given order.
pub async fn read_sources(
    runtime: &dyn Runtime,
    bundle: &str,
    paths: &[String],
) -> Result<Vec<SourceFile>> {
    try_join_all(paths.iter().map(|path| read_source(runtime, bundle, Path::new(path)))).await
}

async fn read_source(runtime: &dyn Runtime, bundle: &str, path: &Path) -> Result<SourceFile> {
    let read_error = |source| BuildError::Read {
        bundle: bundle.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let contents = runtime.read_file(path).await.map_err(read_error)?;
    let modified = runtime.metadata(path).await.map_err(read_error)?.modified;

    Ok(SourceFile {
        path: path.to_path_buf(),
        contents,
        modified,
    })
}

/// Keep the whole source list when any source is newer than `target`, none otherwise.
///
/// A bundle is one output built from many inputs, so a single changed source
/// rebuilds it from every source. Everything is kept when the target is
/// missing or has no modification time, or when a source has none.
pub async fn filter_newer(
    runtime: &dyn Runtime,
    sources: Vec<SourceFile>,
    target: &Path,
) -> Vec<SourceFile> {
    let target_modified = match runtime.metadata(target).await {
        Ok(metadata) => metadata.modified,
        Err(_) => None,
    };

    let Some(target_modified) = target_modified else {
        return sources;
    };

    let changed = sources
        .iter()
        .find(|source| source.modified.is_none_or(|modified| modified > target_modified));

    match changed {
        Some(source) => {
            debug!("{} is newer than {}", source.path.display(), target.display());
            sources
        }
        None => {
            debug!("No source is newer than {}", target.display());
            Vec::new()
        }
    }
}

/// Concatenate sources in order, or `None` when there is nothing to write.
pub fn concat(sources: &[SourceFile]) -> Option<Vec<u8>> {
    if sources.is_empty() {
        return None;
    }

    let capacity = sources.iter().map(|s| s.contents.len()).sum::<usize>()
        + CONCAT_SEPARATOR.len() * (sources.len() - 1);
    let mut output = Vec::with_capacity(capacity);
    for (index, source) in sources.iter().enumerate() {
        if index > 0 {
            output.extend_from_slice(CONCAT_SEPARATOR);
        }
        output.extend_from_slice(&source.contents);
    }
    Some(output)
}

/// Write `contents` to `path`, creating missing parent directories.
pub async fn write_output(
    runtime: &dyn Runtime,
    bundle: &str,
    path: &Path,
    contents: &[u8],
) -> Result<()> {
    let write_error = |source| BuildError::Write {
        bundle: bundle.to_string(),
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !runtime.exists(parent) {
            runtime.create_dir(parent, true).await.map_err(write_error)?;
        }
    }

    runtime.write_file(path, contents).await.map_err(write_error)
}
