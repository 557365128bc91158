//! In-memory filesystem adapter for tests and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use newprg_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{NewprgError, NewprgResult},
};

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        {
            let path = path.into();
            let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path, content.into());
        }
        self
    }

    /// Content of a file as text (testing helper).
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        let inner = self.lock_read().ok()?;
        inner
            .files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.lock_read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// Every file, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.lock_read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock_read(&self) -> NewprgResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_error())
    }

    fn lock_write(&self) -> NewprgResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_error())
    }
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn require_parent(&self, path: &Path) -> NewprgResult<()> {
        match path.parent() {
            Some(parent)
                if !parent.as_os_str().is_empty() && !self.directories.contains(parent) =>
            {
                Err(not_found(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn read(&self, path: &Path) -> NewprgResult<Vec<u8>> {
        let inner = self.lock_read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "No such file"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> NewprgResult<()> {
        let mut inner = self.lock_write()?;
        inner.require_parent(path)?;
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> NewprgResult<()> {
        self.lock_write()?.add_dirs(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> NewprgResult<()> {
        let mut inner = self.lock_write()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path, "No such directory"));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock_read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> NewprgResult<()> {
        let mut inner = self.lock_write()?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "No such file"))?;
        inner.require_parent(to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> NewprgResult<()> {
        let mut inner = self.lock_write()?;
        if !inner.files.contains_key(path) {
            return Err(not_found(path, "No such file"));
        }
        inner.executables.insert(path.to_path_buf());
        Ok(())
    }
}

fn not_found(path: &Path, reason: &str) -> NewprgError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

fn lock_error() -> NewprgError {
    NewprgError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}
