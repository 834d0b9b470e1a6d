//! In-memory runtime for tests.
//!
//! `MemoryRuntime` keeps files and directories in maps behind a mutex and
//! stamps every write with a logical clock, so staleness tests can control
//! which side is newer without sleeping.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, MemoryFile>,
    dirs: BTreeSet<PathBuf>,
    clock: u64,
}

impl MemoryState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.dirs.contains(parent),
            _ => true,
        }
    }
}

/// Filesystem held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    state: Mutex<MemoryState>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryRuntime::insert_file`].
    pub fn with_file(self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Self {
        self.insert_file(path, content);
        self
    }

    /// Add a file, creating its parent directories.
    pub fn insert_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let mut state = self.state.lock();
        let modified = state.tick();
        state.add_ancestors(path.as_ref());
        state.files.insert(
            path.as_ref().to_path_buf(),
            MemoryFile {
                content: content.as_ref().to_vec(),
                modified,
            },
        );
    }

    /// Add a file with an explicit modification time.
    pub fn insert_file_at(
        &self,
        path: impl AsRef<Path>,
        content: impl AsRef<[u8]>,
        modified: u64,
    ) {
        let mut state = self.state.lock();
        state.clock = state.clock.max(modified);
        state.add_ancestors(path.as_ref());
        state.files.insert(
            path.as_ref().to_path_buf(),
            MemoryFile {
                content: content.as_ref().to_vec(),
                modified,
            },
        );
    }

    pub fn insert_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock();
        state.dirs.insert(path.as_ref().to_path_buf());
        state.add_ancestors(path.as_ref());
    }

    /// Overwrite the modification time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: u64) {
        let mut state = self.state.lock();
        state.clock = state.clock.max(modified);
        if let Some(file) = state.files.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state
            .lock()
            .files
            .get(path.as_ref())
            .map(|file| file.content.clone())
    }

    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.file(path)
            .map(|content| String::from_utf8_lossy(&content).into_owned())
    }

    pub fn modified(&self, path: impl AsRef<Path>) -> Option<u64> {
        self.state
            .lock()
            .files
            .get(path.as_ref())
            .map(|file| file.modified)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().files.contains_key(path.as_ref())
    }

    pub fn contains_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().dirs.contains(path.as_ref())
    }

    /// Every file path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state.lock().files.keys().cloned().collect()
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.file(path)
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        if !state.parent_exists(path) {
            return Err(RuntimeError::FileNotFound(path.to_path_buf()));
        }
        if state.dirs.contains(path) {
            return Err(RuntimeError::Io(format!(
                "{}: is a directory",
                path.display()
            )));
        }
        let modified = state.tick();
        state.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let state = self.state.lock();
        if let Some(file) = state.files.get(path) {
            return Ok(FileMetadata {
                size: file.content.len() as u64,
                is_dir: false,
                is_file: true,
                modified: Some(file.modified),
            });
        }
        if state.dirs.contains(path) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
                modified: None,
            });
        }
        Err(RuntimeError::FileNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        if state.files.contains_key(path) {
            return Err(RuntimeError::Io(format!("{}: is a file", path.display())));
        }
        if recursive {
            state.add_ancestors(path);
        } else if !state.parent_exists(path) {
            return Err(RuntimeError::FileNotFound(path.to_path_buf()));
        }
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<PathBuf>> {
        let state = self.state.lock();
        if !state.dirs.contains(path) {
            return Err(RuntimeError::FileNotFound(path.to_path_buf()));
        }
        let children: BTreeSet<PathBuf> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    async fn remove_file(&self, path: &Path) -> RuntimeResult<()> {
        self.state
            .lock()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn remove_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        let mut state = self.state.lock();
        if !state.dirs.contains(path) {
            return Err(RuntimeError::FileNotFound(path.to_path_buf()));
        }
        state.files.retain(|file, _| !file.starts_with(path));
        state.dirs.retain(|dir| !dir.starts_with(path));
        Ok(())
    }
}
