//! Unified error handling for newprg core.
//!
//! [`NewprgError`] wraps the domain and application errors so callers deal
//! with a single type, and carries the category and suggestions the CLI
//! shows to the user.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DescriptorError, DomainError};
use crate::text::BufferError;

/// Root error type for newprg core operations.
#[derive(Debug, Error, Clone)]
pub enum NewprgError {
    /// Invalid input: descriptors, names, settings, unreadable files.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Failures while generating a project.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl NewprgError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run 'newprg config path' to locate the configuration file".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in newprg".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<DescriptorError> for NewprgError {
    fn from(err: DescriptorError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<BufferError> for NewprgError {
    fn from(err: BufferError) -> Self {
        Self::Domain(err.into())
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type NewprgResult<T> = Result<T, NewprgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_flow_through_layers() {
        let err: NewprgError = DescriptorError::Malformed {
            descriptor: "x".into(),
            fields: 1,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err: NewprgError = ApplicationError::TemplateNotFound {
            name: "main.c".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err = NewprgError::Configuration {
            message: "bad".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn domain_messages_are_not_prefixed() {
        let err: NewprgError = DomainError::MissingSetting { key: "author".into() }.into();
        assert_eq!(err.to_string(), "setting 'author' is not configured");
    }
}
