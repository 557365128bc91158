//! Templates compiled into the binary.

use newprg_core::{
    application::{ApplicationError, ports::TemplateStore},
    error::NewprgResult,
};

const TEMPLATES: &[(&str, &[u8])] = &[
    ("main.c", include_bytes!("../../templates/main.c")),
    ("gopt.h", include_bytes!("../../templates/gopt.h")),
    ("gopt.c", include_bytes!("../../templates/gopt.c")),
    ("manpage.1", include_bytes!("../../templates/manpage.1")),
    ("Makefile.am", include_bytes!("../../templates/Makefile.am")),
    ("findfixme", include_bytes!("../../templates/findfixme")),
];

/// The default template set shipped with newprg.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Names of every built-in template.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }

    pub fn get(name: &str) -> Option<&'static [u8]> {
        TEMPLATES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, bytes)| *bytes)
    }
}

impl TemplateStore for BuiltinTemplates {
    fn load(&self, name: &str) -> NewprgResult<Vec<u8>> {
        Self::get(name)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| ApplicationError::TemplateNotFound { name: name.into() }.into())
    }
}
