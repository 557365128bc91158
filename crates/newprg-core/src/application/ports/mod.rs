//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the services and implemented in
//! `newprg-adapters`:
//!   - `Filesystem`: reading, writing and removing files
//!   - `TemplateStore`: template lookup by name

pub mod output;

pub use output::{Filesystem, TemplateStore};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateStore};
