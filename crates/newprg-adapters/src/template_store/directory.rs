//! Templates read from a directory on disk.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use newprg_core::{
    application::{ApplicationError, ports::TemplateStore},
    error::NewprgResult,
};

/// Template store backed by a user directory.
///
/// Files are indexed once on [`open`](Self::open) by their path relative to
/// the directory, so `sub/main.c` is looked up as `"sub/main.c"`. Content is
/// read on every [`load`](TemplateStore::load), so edits made after opening
/// are picked up.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
    index: BTreeMap<String, PathBuf>,
}

impl DirectoryTemplates {
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> NewprgResult<Self> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: root,
                reason: "Template directory does not exist".into(),
            }
            .into());
        }

        let mut index = BTreeMap::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().map_or_else(|| root.clone(), Path::to_path_buf),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            index.insert(name, entry.path().to_path_buf());
        }

        debug!(templates = index.len(), "Indexed template directory");
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl TemplateStore for DirectoryTemplates {
    fn load(&self, name: &str) -> NewprgResult<Vec<u8>> {
        let path = self
            .index
            .get(name)
            .ok_or_else(|| ApplicationError::TemplateNotFound { name: name.into() })?;
        std::fs::read(path).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.clone(),
                reason: format!("Failed to read template: {}", e),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newprg_core::error::ErrorCategory;

    #[test]
    fn indexes_nested_files_by_relative_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("extra")).unwrap();
        std::fs::write(dir.path().join("main.c"), "int main;").unwrap();
        std::fs::write(dir.path().join("extra/notes.txt"), "n").unwrap();

        let store = DirectoryTemplates::open(dir.path()).unwrap();
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["extra/notes.txt", "main.c"]);
        assert_eq!(store.load("main.c").unwrap(), b"int main;");
    }

    #[test]
    fn reads_current_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gopt.h"), "old").unwrap();
        let store = DirectoryTemplates::open(dir.path()).unwrap();

        std::fs::write(dir.path().join("gopt.h"), "new").unwrap();
        assert_eq!(store.load("gopt.h").unwrap(), b"new");
    }

    #[test]
    fn missing_template_and_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryTemplates::open(dir.path()).unwrap();
        assert!(store.is_empty());
        assert_eq!(
            store.load("main.c").unwrap_err().category(),
            ErrorCategory::NotFound
        );

        assert!(DirectoryTemplates::open(dir.path().join("absent")).is_err());
    }
}
