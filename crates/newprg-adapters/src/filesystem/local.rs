//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use tracing::trace;

use newprg_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{NewprgError, NewprgResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn read(&self, path: &Path) -> NewprgResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> NewprgResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn create_dir_all(&self, path: &Path) -> NewprgResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> NewprgResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn copy_file(&self, from: &Path, to: &Path) -> NewprgResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn set_executable(&self, path: &Path) -> NewprgResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata =
                std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            perms.set_mode(perms.mode() | 0o111);
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            // No executable bit to set.
            let _ = path;
        }
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> NewprgError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let fs = LocalFilesystem::new();

        fs.write(&path, b"a long first version").unwrap();
        fs.write(&path, b"short").unwrap();
        assert_eq!(fs.read(&path).unwrap(), b"short");
    }

    #[test]
    fn copy_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("a/b");
        fs.create_dir_all(&nested).unwrap();
        fs.write(&dir.path().join("src.c"), b"int x;").unwrap();

        fs.copy_file(&dir.path().join("src.c"), &nested.join("dst.c"))
            .unwrap();
        assert_eq!(fs.read(&nested.join("dst.c")).unwrap(), b"int x;");

        fs.remove_dir_all(&dir.path().join("a")).unwrap();
        assert!(!fs.exists(&nested));
    }

    #[test]
    fn errors_name_the_path() {
        let fs = LocalFilesystem::new();
        let err = fs.read(Path::new("/no/such/file")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file"));
    }

    #[cfg(unix)]
    #[test]
    fn set_executable_adds_exec_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script");
        let fs = LocalFilesystem::new();
        fs.write(&path, b"#!/bin/sh\n").unwrap();
        fs.set_executable(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
