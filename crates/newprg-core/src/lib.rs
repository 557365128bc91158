//! newprg Core - text engine, option compiler and project generator.
//!
//! This crate provides the domain and application layers for newprg, a
//! tool that writes the initial files of a new C program, its `getopt_long`
//! option handling included.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            newprg-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ProjectGenerator, TemplateInstantiator)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │      (Filesystem, TemplateStore)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    newprg-adapters (Infrastructure)     │
//! │ (LocalFilesystem, BuiltinTemplates, ..) │
//! └─────────────────────────────────────────┘
//!
//!   domain: DescriptorParser, OptionCompiler, ProjectNames, KeyValueConfig
//!   text:   Buffer, comment stripping, line/record filters
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use newprg_core::domain::{DescriptorParser, OptionCompiler};
//!
//! let records = DescriptorParser::default()
//!     .parse_list("v,verbose,verbosity,acc,,,,\nn:,name,label,string,,,,")
//!     .unwrap();
//! let fragments = OptionCompiler::default().compile(&records).unwrap();
//! assert_eq!(fragments.short_options, ":vn:");
//! ```

pub mod text;

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExistingDirPolicy, GenerationPlan, ProjectGenerator, ProjectRequest, Substitution,
        TemplateInstantiator,
        ports::{Filesystem, TemplateStore},
    };
    pub use crate::domain::{
        DescriptorParser, DescriptorSyntax, FragmentSet, KeyValueConfig, OptionCompiler,
        OptionRecord, ProjectNames, Purpose,
    };
    pub use crate::error::{ErrorCategory, NewprgError, NewprgResult};
    pub use crate::text::{Buffer, StripOutcome};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
