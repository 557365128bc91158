//! Template store adapters.
//!
//! Stores are looked up by template name (`main.c`, `gopt.c`, ...).
//! [`LayeredTemplates`] lets a user directory override the built-in set.

mod builtin;
mod directory;
mod layered;

pub use builtin::BuiltinTemplates;
pub use directory::DirectoryTemplates;
pub use layered::LayeredTemplates;
