//! `tokio::fs` backed runtime.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))?;

        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_millis() as u64);

        Ok(FileMetadata {
            size: metadata.len(),
            is_dir: metadata.is_dir(),
            is_file: metadata.is_file(),
            modified,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let result = if recursive {
            tokio::fs::create_dir_all(path).await
        } else {
            tokio::fs::create_dir(path).await
        };
        result.map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))?;

        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RuntimeError::from_io(e, path))?
        {
            children.push(entry.path());
        }
        children.sort();
        Ok(children)
    }

    async fn remove_file(&self, path: &Path) -> RuntimeResult<()> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }

    async fn remove_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| RuntimeError::from_io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_read_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out/js");
        let runtime = NativeRuntime;

        runtime.create_dir(&nested, true).await.unwrap();
        runtime
            .write_file(&nested.join("app.js"), b"let a = 1;")
            .await
            .unwrap();

        assert_eq!(
            runtime.read_file(&nested.join("app.js")).await.unwrap(),
            b"let a = 1;"
        );
        let metadata = runtime.metadata(&nested.join("app.js")).await.unwrap();
        assert!(metadata.is_file);
        assert_eq!(metadata.size, 10);
        assert!(metadata.modified.is_some());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = NativeRuntime
            .read_file(&dir.path().join("missing.js"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn read_dir_lists_children_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.css"), "").unwrap();
        std::fs::write(dir.path().join("a.css"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let children = NativeRuntime.read_dir(dir.path()).await.unwrap();
        assert_eq!(
            children,
            vec![
                dir.path().join("a.css"),
                dir.path().join("b.css"),
                dir.path().join("sub")
            ]
        );
    }
}
