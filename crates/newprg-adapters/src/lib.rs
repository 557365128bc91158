//! Infrastructure adapters for newprg.
//!
//! This crate implements the ports defined in `newprg_core::application::ports`:
//! filesystems (local disk and in-memory) and template stores (built-in,
//! directory and layered).

pub mod filesystem;
pub mod template_store;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template_store::{BuiltinTemplates, DirectoryTemplates, LayeredTemplates};
