//! Template lookup across several stores.

use tracing::trace;

use newprg_core::{
    application::{ApplicationError, ports::TemplateStore},
    error::{NewprgError, NewprgResult},
};

/// Tries each store in order and returns the first hit.
///
/// Only a missing template moves the lookup on to the next store; any other
/// error (an unreadable file, say) is returned as is.
#[derive(Default)]
pub struct LayeredTemplates {
    layers: Vec<Box<dyn TemplateStore>>,
}

impl LayeredTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store below the existing ones.
    pub fn with_layer(mut self, store: impl TemplateStore + 'static) -> Self {
        self.layers.push(Box::new(store));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TemplateStore for LayeredTemplates {
    fn load(&self, name: &str) -> NewprgResult<Vec<u8>> {
        for (depth, layer) in self.layers.iter().enumerate() {
            match layer.load(name) {
                Err(NewprgError::Application(ApplicationError::TemplateNotFound { .. })) => {
                    trace!(name, depth, "Template not in layer");
                }
                other => return other,
            }
        }
        Err(ApplicationError::TemplateNotFound { name: name.into() }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_store::{BuiltinTemplates, DirectoryTemplates};

    #[test]
    fn directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.c"), "custom").unwrap();

        let store = LayeredTemplates::new()
            .with_layer(DirectoryTemplates::open(dir.path()).unwrap())
            .with_layer(BuiltinTemplates::new());

        assert_eq!(store.load("main.c").unwrap(), b"custom");
        assert_eq!(
            store.load("gopt.h").unwrap(),
            BuiltinTemplates::get("gopt.h").unwrap()
        );
    }

    #[test]
    fn empty_stack_reports_not_found() {
        let err = LayeredTemplates::new().load("main.c").unwrap_err();
        assert!(matches!(
            err,
            NewprgError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn read_errors_stop_the_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "x").unwrap();
        let upper = DirectoryTemplates::open(dir.path()).unwrap();
        std::fs::remove_file(&path).unwrap();

        let store = LayeredTemplates::new()
            .with_layer(upper)
            .with_layer(BuiltinTemplates::new());
        let err = store.load("main.c").unwrap_err();
        assert!(matches!(
            err,
            NewprgError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
