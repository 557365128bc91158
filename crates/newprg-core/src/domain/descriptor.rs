//! Option descriptors: a fixed-field, comma-separated line describing one
//! command line option of the generated program.
//!
//! ```text
//! short,long,variable,purpose,default,max,help,action
//! v,verbose,verbosity,acc,,,,
//! o:,output,outfile,file,"out.txt",,Write results here,
//! ```
//!
//! Parsing is configured by a [`DescriptorSyntax`] value handed to
//! [`DescriptorParser::new`]; nothing here reads global state.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::error::{DescriptorError, DomainError};

/// Number of fields in every descriptor.
pub const FIELD_COUNT: usize = 8;

// ── DescriptorSyntax ─────────────────────────────────────────────────────────

/// Lexical settings of the descriptor language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSyntax {
    /// Separates the fields of one descriptor.
    pub delimiter: char,
    /// Optional end of a descriptor.
    pub terminator: char,
    /// Marks a whole line of a descriptor list as a comment.
    pub comment: char,
    /// Stands in for empty variable names, help texts and run actions.
    pub placeholder: String,
    /// Null pointer literal, the zero value of string and file options.
    pub null_sentinel: String,
}

impl Default for DescriptorSyntax {
    fn default() -> Self {
        Self {
            delimiter: ',',
            terminator: ';',
            comment: '#',
            placeholder: "FIXME".into(),
            null_sentinel: "NULL".into(),
        }
    }
}

// ── Purpose ──────────────────────────────────────────────────────────────────

/// What an option does with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Set to 1 when present.
    Flag,
    /// Counts occurrences.
    #[serde(rename = "acc")]
    Accumulator,
    /// Argument converted to a long.
    #[serde(rename = "int")]
    Integer,
    /// Argument converted to a double.
    Float,
    /// Argument copied as a string.
    #[serde(rename = "string")]
    Text,
    /// Argument copied as a path.
    File,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Self::Flag,
        Self::Accumulator,
        Self::Integer,
        Self::Float,
        Self::Text,
        Self::File,
    ];

    /// Keyword used in descriptors.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Accumulator => "acc",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Text => "string",
            Self::File => "file",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == keyword)
    }

    /// Comma-separated list of every keyword, for diagnostics.
    pub fn keywords() -> String {
        Self::ALL.map(|p| p.as_str()).join(", ")
    }

    /// C type of the variable holding the option value.
    pub const fn c_type(&self) -> &'static str {
        match self {
            Self::Flag | Self::Accumulator | Self::Integer => "int",
            Self::Float => "double",
            Self::Text | Self::File => "char *",
        }
    }

    /// Whether the variable is a `char *`.
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Text | Self::File)
    }

    /// Literal the variable starts with when no default is given.
    pub fn zero_value<'a>(&self, null_sentinel: &'a str) -> &'a str {
        match self {
            Self::Flag | Self::Accumulator | Self::Integer => "0",
            Self::Float => "0.0",
            Self::Text | Self::File => null_sentinel,
        }
    }

    /// C expression assigned to the variable when the option is seen.
    pub const fn assignment(&self) -> &'static str {
        match self {
            Self::Flag | Self::Accumulator => "1",
            Self::Integer => "strtol(optarg, NULL, 10)",
            Self::Float => "strtod(optarg, NULL)",
            Self::Text | Self::File => "xstrdup(optarg)",
        }
    }

    /// What the option does to its variable, for the man page entry.
    pub const fn help_summary(&self) -> &'static str {
        match self {
            Self::Flag => "Is set to 1.",
            Self::Accumulator => "Increases by 1 every time it is given.",
            Self::Integer => "The argument is converted to a long.",
            Self::Float => "The argument is converted to a double.",
            Self::Text => "Is set to a copy of the argument.",
            Self::File => "Is set to a copy of the path given.",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ArgArity ─────────────────────────────────────────────────────────────────

/// Whether the option takes an argument, encoded by colons after the
/// short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgArity {
    None,
    Required,
    Optional,
}

impl ArgArity {
    fn from_colons(colons: &str) -> Option<Self> {
        match colons {
            "" => Some(Self::None),
            ":" => Some(Self::Required),
            "::" => Some(Self::Optional),
            _ => None,
        }
    }

    /// `has_arg` value in a `struct option` entry.
    pub const fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Required => 1,
            Self::Optional => 2,
        }
    }

    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Required => ":",
            Self::Optional => "::",
        }
    }
}

// ── OptionRecord ─────────────────────────────────────────────────────────────

/// One validated option. Read-only after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRecord {
    short: char,
    arity: ArgArity,
    long_name: String,
    variable_name: String,
    purpose: Purpose,
    default_value: String,
    max_value: Option<String>,
    help_text: String,
    run_action: String,
}

impl OptionRecord {
    pub fn short(&self) -> char {
        self.short
    }

    /// Short name as written in `getopt` strings, colons included.
    pub fn short_token(&self) -> String {
        format!("{}{}", self.short, self.arity.suffix())
    }

    pub fn arity(&self) -> ArgArity {
        self.arity
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Upper bound, if one was given. Absent is not the same as zero.
    pub fn max_value(&self) -> Option<&str> {
        self.max_value.as_deref()
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn run_action(&self) -> &str {
        &self.run_action
    }
}

// ── DescriptorParser ─────────────────────────────────────────────────────────

/// Turns descriptor strings into [`OptionRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct DescriptorParser {
    syntax: DescriptorSyntax,
}

impl DescriptorParser {
    pub fn new(syntax: DescriptorSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> &DescriptorSyntax {
        &self.syntax
    }

    /// Parse and validate one descriptor.
    ///
    /// Checks run in a fixed order (field count, short name, long name,
    /// purpose) and the first failure is returned.
    pub fn parse(&self, descriptor: &str) -> Result<OptionRecord, DescriptorError> {
        let descriptor = descriptor.trim();
        let body = descriptor
            .strip_suffix(self.syntax.terminator)
            .unwrap_or(descriptor);

        let fields: Vec<&str> = body.split(self.syntax.delimiter).map(str::trim).collect();
        let [short, long, variable, purpose, default, max, help, action] = fields[..] else {
            return Err(DescriptorError::Malformed {
                descriptor: descriptor.to_string(),
                fields: fields.len(),
            });
        };

        let (short, arity) = parse_short_name(short).ok_or_else(|| {
            DescriptorError::ShortNameInvalid {
                descriptor: descriptor.to_string(),
                short_name: short.to_string(),
            }
        })?;

        if long.chars().count() < 2 || !long.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DescriptorError::LongNameInvalid {
                descriptor: descriptor.to_string(),
                long_name: long.to_string(),
            });
        }

        let purpose =
            Purpose::from_keyword(purpose).ok_or_else(|| DescriptorError::PurposeInvalid {
                descriptor: descriptor.to_string(),
                purpose: purpose.to_string(),
                valid: Purpose::keywords(),
            })?;

        let default_value = if default.is_empty() {
            purpose.zero_value(&self.syntax.null_sentinel)
        } else {
            default
        };

        Ok(OptionRecord {
            short,
            arity,
            long_name: long.to_string(),
            variable_name: self.or_placeholder(variable),
            purpose,
            default_value: default_value.to_string(),
            max_value: (!max.is_empty()).then(|| max.to_string()),
            help_text: self.or_placeholder(help),
            run_action: self.or_placeholder(action),
        })
    }

    /// Parse a list of descriptors, one per line.
    ///
    /// A line whose first non-blank character is the comment character is
    /// skipped, as are blank lines. Field contents are never rewritten, so
    /// help texts and run actions may hold terminators and comment
    /// characters. Order is preserved.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn parse_list(&self, text: &str) -> Result<Vec<OptionRecord>, DomainError> {
        let records = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(self.syntax.comment))
            .map(|line| self.parse(line))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Descriptors parsed");
        Ok(records)
    }

    fn or_placeholder(&self, field: &str) -> String {
        if field.is_empty() {
            self.syntax.placeholder.clone()
        } else {
            field.to_string()
        }
    }
}

/// Split `c`, `c:` or `c::` into the option character and its arity.
fn parse_short_name(token: &str) -> Option<(char, ArgArity)> {
    let mut chars = token.chars();
    let short = chars.next().filter(char::is_ascii_alphanumeric)?;
    let arity = ArgArity::from_colons(chars.as_str())?;
    Some((short, arity))
}
