//! Compiles an ordered list of [`OptionRecord`]s into the C fragments that
//! make up the generated option parser.
//!
//! Every fragment lists the records in input order, one line (or one
//! multi-line entry) per record, joined by `\n` without a trailing newline.
//! Output is a pure function of the input: compiling the same list twice
//! yields byte-identical fragments.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::descriptor::{ArgArity, DescriptorSyntax, OptionRecord};
use crate::domain::error::DomainError;

/// The generated fragments, one field per template marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentSet {
    /// Members of `options_t`.
    pub struct_block: String,
    /// `getopt` short option string.
    pub short_options: String,
    /// Entries of the `struct option` table.
    pub long_options: String,
    /// Assignments of non-zero defaults.
    pub defaults: String,
    /// `switch` branches, one per option.
    pub cases: String,
    /// Man page entries.
    pub help: String,
}

/// Short names the generated parser handles itself.
pub const RESERVED_SHORT_NAMES: [char; 2] = ['h', 'V'];
/// Long names the generated parser handles itself.
pub const RESERVED_LONG_NAMES: [&str; 2] = ["help", "version"];
/// Members `options_t` always declares.
pub const RESERVED_VARIABLES: [&str; 2] = ["runhelp", "runvsn"];

/// Emits [`FragmentSet`]s.
#[derive(Debug, Clone)]
pub struct OptionCompiler {
    null_sentinel: String,
}

impl Default for OptionCompiler {
    fn default() -> Self {
        Self::new(&DescriptorSyntax::default())
    }
}

impl OptionCompiler {
    pub fn new(syntax: &DescriptorSyntax) -> Self {
        Self {
            null_sentinel: syntax.null_sentinel.clone(),
        }
    }

    /// Reject lists the generated C would not compile with.
    ///
    /// Names the parser templates already use are reserved, and no two
    /// options may share a short name, a long name or a variable. The first
    /// clash in record order is returned.
    pub fn validate(&self, records: &[OptionRecord]) -> Result<(), DomainError> {
        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();
        let mut variables = HashSet::new();
        for record in records {
            reject_reserved(record)?;

            if !shorts.insert(record.short()) {
                return Err(DomainError::DuplicateOption {
                    kind: "short",
                    name: record.short().to_string(),
                });
            }
            if !longs.insert(record.long_name()) {
                return Err(DomainError::DuplicateOption {
                    kind: "long",
                    name: record.long_name().to_string(),
                });
            }
            if !variables.insert(record.variable_name()) {
                return Err(DomainError::DuplicateOption {
                    kind: "variable",
                    name: record.variable_name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate `records` and emit every fragment.
    #[instrument(skip_all, fields(options = records.len()))]
    pub fn compile(&self, records: &[OptionRecord]) -> Result<FragmentSet, DomainError> {
        self.validate(records)?;

        let fragments = FragmentSet {
            struct_block: self.struct_block(records),
            short_options: self.short_options(records),
            long_options: self.long_options(records),
            defaults: self.defaults(records),
            cases: self.cases(records),
            help: self.help(records),
        };
        debug!("Option fragments compiled");
        Ok(fragments)
    }

    /// `\t<type> <name>;\t// <purpose>: <action>` per record.
    pub fn struct_block(&self, records: &[OptionRecord]) -> String {
        lines(records, |r| {
            let purpose = r.purpose();
            let declaration = if purpose.is_pointer() {
                format!("{}{}", purpose.c_type(), r.variable_name())
            } else {
                format!("{} {}", purpose.c_type(), r.variable_name())
            };
            format!("\t{declaration};\t// {purpose}: {}", r.run_action())
        })
    }

    /// `:` followed by every short name, colons included.
    pub fn short_options(&self, records: &[OptionRecord]) -> String {
        std::iter::once(":".to_string())
            .chain(records.iter().map(OptionRecord::short_token))
            .collect()
    }

    pub fn long_options(&self, records: &[OptionRecord]) -> String {
        lines(records, |r| {
            format!(
                "\t\t{{\"{}\",\t{},\t0,\t'{}'}},",
                r.long_name(),
                r.arity().code(),
                r.short()
            )
        })
    }

    /// Only defaults other than the zero literals and the null sentinel
    /// produce a line.
    pub fn defaults(&self, records: &[OptionRecord]) -> String {
        records
            .iter()
            .filter(|r| !self.is_zero(r.default_value()))
            .map(|r| {
                let value = r.default_value();
                let value = if r.purpose().is_pointer() && !value.starts_with('"') {
                    format!("\"{value}\"")
                } else {
                    value.to_string()
                };
                format!("\topts.{} = {value};", r.variable_name())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One `case` per record. An optional argument may be absent, so its
    /// assignment only runs when `optarg` is set.
    pub fn cases(&self, records: &[OptionRecord]) -> String {
        lines(records, |r| {
            let assignment = format!("opts.{} = {};", r.variable_name(), r.purpose().assignment());
            let body = match r.arity() {
                ArgArity::Optional => format!("\t\t\tif (optarg)\n\t\t\t\t{assignment}"),
                ArgArity::None | ArgArity::Required => format!("\t\t\t{assignment}"),
            };
            format!("\t\tcase '{}':\n{body}\n\t\tbreak;", r.short())
        })
    }

    /// `.TP` paragraphs for the OPTIONS section of the man page.
    ///
    /// The default quoted is the record's own, so an omitted default reads
    /// as the purpose's zero literal or the null sentinel.
    pub fn help(&self, records: &[OptionRecord]) -> String {
        lines(records, |r| {
            let mut entry = format!(
                ".TP\n.B -{}, --{}\n{} {} Default is {}.",
                r.short(),
                r.long_name(),
                r.help_text(),
                r.purpose().help_summary(),
                r.default_value()
            );
            if let Some(max) = r.max_value() {
                entry.push_str(&format!(" Maximum is {max}."));
            }
            entry
        })
    }

    fn is_zero(&self, value: &str) -> bool {
        value == "0" || value == "0.0" || value == self.null_sentinel
    }
}

fn reject_reserved(record: &OptionRecord) -> Result<(), DomainError> {
    let clash = if RESERVED_SHORT_NAMES.contains(&record.short()) {
        Some(("short", record.short().to_string()))
    } else if RESERVED_LONG_NAMES.contains(&record.long_name()) {
        Some(("long", record.long_name().to_string()))
    } else if RESERVED_VARIABLES.contains(&record.variable_name()) {
        Some(("variable", record.variable_name().to_string()))
    } else {
        None
    };

    match clash {
        Some((kind, name)) => Err(DomainError::ReservedName { kind, name }),
        None => Ok(()),
    }
}

fn lines(records: &[OptionRecord], render: impl Fn(&OptionRecord) -> String) -> String {
    records.iter().map(render).collect::<Vec<_>>().join("\n")
}
