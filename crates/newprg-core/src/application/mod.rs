//! Application layer for newprg.
//!
//! This layer contains:
//! - **Services**: template instantiation and project generation
//! - **Ports**: traits for the filesystem and the template store
//! - **Errors**: orchestration failures
//!
//! Option parsing and compiling live in `crate::domain`; the services here
//! wire them to templates and files.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ExistingDirPolicy, GenerationPlan, PlannedFile, ProjectGenerator, ProjectRequest,
    Substitution, TemplateInstantiator,
};

pub use ports::{Filesystem, TemplateStore};

pub use error::ApplicationError;
