//! Application services - orchestrate use cases.
//!
//! `TemplateInstantiator` fills one template; `ProjectGenerator` builds a
//! whole project directory from a request.

pub mod generator;
pub mod instantiator;

pub use generator::{ExistingDirPolicy, GenerationPlan, PlannedFile, ProjectGenerator, ProjectRequest};
pub use instantiator::{Substitution, TemplateInstantiator};
