//! Core domain layer for newprg.
//!
//! Pure logic over in-memory values: the option descriptor language, the
//! fragment compiler, project naming and `key=value` settings. Nothing in
//! here touches the filesystem; reading and writing happens through the
//! ports of the application layer.

pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod project;
pub mod settings;

pub use compiler::{FragmentSet, OptionCompiler};
pub use descriptor::{
    ArgArity, DescriptorParser, DescriptorSyntax, FIELD_COUNT, OptionRecord, Purpose,
};
pub use error::{DescriptorError, DomainError, ErrorCategory};
pub use project::{ProjectNames, expand_dependencies};
pub use settings::KeyValueConfig;
