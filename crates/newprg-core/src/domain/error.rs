// ============================================================================
// domain/error.rs - descriptor, naming and settings failures
// ============================================================================

use thiserror::Error;

use crate::text::BufferError;

/// Why a single option descriptor was rejected.
///
/// Every variant carries the offending descriptor so the user can find it
/// in a long option list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("malformed option descriptor '{descriptor}': expected 8 fields, found {fields}")]
    Malformed { descriptor: String, fields: usize },

    #[error("invalid short name '{short_name}' in '{descriptor}'")]
    ShortNameInvalid {
        descriptor: String,
        short_name: String,
    },

    #[error("invalid long name '{long_name}' in '{descriptor}'")]
    LongNameInvalid {
        descriptor: String,
        long_name: String,
    },

    #[error("invalid purpose '{purpose}' in '{descriptor}', expected one of: {valid}")]
    PurposeInvalid {
        descriptor: String,
        purpose: String,
        valid: String,
    },
}

impl DescriptorError {
    pub fn descriptor(&self) -> &str {
        match self {
            Self::Malformed { descriptor, .. }
            | Self::ShortNameInvalid { descriptor, .. }
            | Self::LongNameInvalid { descriptor, .. }
            | Self::PurposeInvalid { descriptor, .. } => descriptor,
        }
    }
}

/// Root domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation
    // ========================================================================
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("option {kind} name '{name}' is used more than once")]
    DuplicateOption { kind: &'static str, name: String },

    #[error("option {kind} name '{name}' is reserved by the generated parser")]
    ReservedName { kind: &'static str, name: String },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("malformed setting '{line}', expected key=value")]
    MalformedSetting { line: String },

    // ========================================================================
    // Not found
    // ========================================================================
    #[error("setting '{key}' is not configured")]
    MissingSetting { key: String },

    // ========================================================================
    // Text engine
    // ========================================================================
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Descriptor(DescriptorError::Malformed { .. }) => vec![
                "A descriptor has 8 comma-separated fields:".into(),
                "  short,long,variable,purpose,default,max,help,action".into(),
                "Leave a field empty to accept its default, e.g. v,verbose,,acc,,,,".into(),
            ],
            Self::Descriptor(DescriptorError::ShortNameInvalid { .. }) => vec![
                "The short name is one letter or digit".into(),
                "Append ':' for a required argument or '::' for an optional one".into(),
            ],
            Self::Descriptor(DescriptorError::LongNameInvalid { .. }) => vec![
                "The long name needs at least two letters or digits".into(),
            ],
            Self::Descriptor(DescriptorError::PurposeInvalid { valid, .. }) => {
                vec![format!("Use one of: {valid}")]
            }
            Self::DuplicateOption { kind: "variable", name } => vec![
                format!("Give each option its own variable name instead of '{name}'"),
                "An empty variable field stands for the placeholder, so fill it in".into(),
            ],
            Self::DuplicateOption { kind, name } => vec![
                format!("Rename one of the options using {kind} name '{name}'"),
            ],
            Self::ReservedName { kind, name } => vec![
                format!("Choose another {kind} name than '{name}'"),
                "-h/--help and -V/--version are built in, and so are the runhelp and runvsn members".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use a plain file name without spaces or path separators".into(),
            ],
            Self::MalformedSetting { .. } => vec![
                "Each setting sits on its own line as key=value".into(),
                "Lines starting with '#' are comments".into(),
            ],
            Self::MissingSetting { key } => vec![
                format!("Add '{key}=...' to the configuration file"),
                "Or pass the value on the command line".into(),
            ],
            Self::Buffer(BufferError::Io { path, .. }) => vec![
                format!("Check that {} exists and is readable", path.display()),
            ],
            Self::Buffer(BufferError::OutOfMemory { .. }) => {
                vec!["The input is too large to process".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Descriptor(_)
            | Self::DuplicateOption { .. }
            | Self::ReservedName { .. }
            | Self::InvalidProjectName { .. }
            | Self::MalformedSetting { .. } => ErrorCategory::Validation,
            Self::MissingSetting { .. } | Self::Buffer(BufferError::Io { .. }) => {
                ErrorCategory::NotFound
            }
            Self::Buffer(BufferError::OutOfMemory { .. }) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_errors_are_validation() {
        let err: DomainError = DescriptorError::Malformed {
            descriptor: "a,b".into(),
            fields: 2,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("'a,b'"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn purpose_suggestion_lists_valid_set() {
        let err: DomainError = DescriptorError::PurposeInvalid {
            descriptor: "h,help,,,,,,".into(),
            purpose: String::new(),
            valid: "flag, acc".into(),
        }
        .into();
        assert_eq!(err.suggestions(), vec!["Use one of: flag, acc".to_string()]);
    }

    #[test]
    fn reserved_and_variable_clashes_are_validation() {
        let reserved = DomainError::ReservedName {
            kind: "long",
            name: "help".into(),
        };
        assert_eq!(reserved.category(), ErrorCategory::Validation);
        assert_eq!(
            reserved.to_string(),
            "option long name 'help' is reserved by the generated parser"
        );
        assert!(reserved.suggestions()[0].contains("'help'"));

        let duplicate = DomainError::DuplicateOption {
            kind: "variable",
            name: "FIXME".into(),
        };
        assert_eq!(duplicate.category(), ErrorCategory::Validation);
        assert!(duplicate.suggestions()[0].contains("own variable name"));
    }

    #[test]
    fn unreadable_file_is_not_found() {
        let err: DomainError = BufferError::Io {
            path: "/nope".into(),
            reason: "No such file".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
