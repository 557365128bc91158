//! Driven (output) ports - implemented by infrastructure.
//!
//! The `newprg-adapters` crate provides implementations.

use std::path::Path;

use crate::error::NewprgResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `newprg_adapters::filesystem::LocalFilesystem` (production)
/// - `newprg_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file.
    fn read(&self, path: &Path) -> NewprgResult<Vec<u8>>;

    /// Write `content` to a file, truncating it if it exists.
    fn write(&self, path: &Path, content: &[u8]) -> NewprgResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> NewprgResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> NewprgResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Copy a file, overwriting the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> NewprgResult<()>;

    /// Make a file executable by everyone who can read it.
    fn set_executable(&self, path: &Path) -> NewprgResult<()>;
}

/// Port for template lookup.
///
/// Implemented by:
/// - `newprg_adapters::template_store::BuiltinTemplates` (compiled in)
/// - `newprg_adapters::template_store::DirectoryTemplates` (user overrides)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Raw bytes of the named template.
    fn load(&self, name: &str) -> NewprgResult<Vec<u8>>;
}
