//! Names derived from the project name, and library dependency lists.

use serde::Serialize;

use crate::domain::error::DomainError;

/// Every spelling of the project name the generated files need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectNames {
    /// Program name, lower case.
    pub exe: String,
    /// `exe` as automake spells it in variable names: every character other
    /// than a letter, digit or `_` becomes `_`.
    pub canonical: String,
    /// Main source file, `<exe>.c`.
    pub src: String,
    /// Man page file, `<exe>.1`.
    pub man: String,
    /// First three characters of `canonical`, for Makefile.am variables.
    pub tla: String,
    /// Project directory, `<exe>` capitalised.
    pub dir: String,
    /// Man page title, upper case.
    pub man_title: String,
}

impl ProjectNames {
    pub fn derive(name: &str) -> Result<Self, DomainError> {
        validate_name(name)?;

        let exe = name.to_lowercase();
        let canonical: String = exe
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let tla: String = canonical.chars().take(3).collect();
        let mut chars = exe.chars();
        let dir = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        Ok(Self {
            src: format!("{exe}.c"),
            man: format!("{exe}.1"),
            man_title: exe.to_uppercase(),
            canonical,
            tla,
            dir,
            exe,
        })
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.starts_with('.') {
        Some("name starts with '.'")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else if name.chars().any(char::is_control) {
        Some("name contains control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidProjectName {
            name: name.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

/// Expand shorthand library names.
///
/// `name.h+c` stands for `name.h name.c`; every other entry is kept as is.
/// Entries may themselves hold several whitespace separated names. Order is
/// preserved and repeated names are kept once.
pub fn expand_dependencies<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let names = entries
        .iter()
        .flat_map(|entry| entry.as_ref().split_whitespace());

    for name in names {
        let variants = match name.rsplit_once('.') {
            Some((stem, extensions)) if extensions.contains('+') && !stem.is_empty() => extensions
                .split('+')
                .filter(|ext| !ext.is_empty())
                .map(|ext| format!("{stem}.{ext}"))
                .collect(),
            _ => vec![name.to_string()],
        };
        for variant in variants {
            if !expanded.contains(&variant) {
                expanded.push(variant);
            }
        }
    }

    expanded
}
