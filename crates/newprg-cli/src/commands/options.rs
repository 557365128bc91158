//! `newprg options`: compile descriptors and print the C fragments.

use tracing::instrument;

use newprg_core::{
    domain::{DescriptorParser, FragmentSet, OptionCompiler},
    error::NewprgError,
};

use crate::{
    cli::{FragmentFormat, OptionsArgs},
    commands::read_descriptors,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(format = ?args.format))]
pub fn execute(args: OptionsArgs, output: OutputManager) -> CliResult<()> {
    let text = read_descriptors(&args.descriptors)?;
    let records = DescriptorParser::default()
        .parse_list(&text)
        .map_err(NewprgError::from)?;
    if records.is_empty() {
        return Err(CliError::InvalidInput {
            message: "no option descriptors given".into(),
            source: None,
        });
    }
    let fragments = OptionCompiler::default()
        .compile(&records)
        .map_err(NewprgError::from)?;

    match args.format {
        FragmentFormat::Text => print_text(&fragments, &output)?,
        FragmentFormat::Json => {
            let json = serde_json::to_string_pretty(&fragments).map_err(|e| {
                CliError::Core(NewprgError::Internal {
                    message: format!("Failed to serialise fragments: {e}"),
                })
            })?;
            output.data(&json)?;
        }
    }
    Ok(())
}

/// Each fragment under a heading naming where it lands.
fn print_text(fragments: &FragmentSet, output: &OutputManager) -> CliResult<()> {
    for (heading, body) in sections(fragments) {
        output.header(heading)?;
        if !body.is_empty() {
            output.data(body)?;
        }
    }
    Ok(())
}

fn sections(fragments: &FragmentSet) -> [(&'static str, &str); 6] {
    [
        ("gopt.h: options struct", fragments.struct_block.as_str()),
        ("gopt.c: short options", fragments.short_options.as_str()),
        ("gopt.c: long options", fragments.long_options.as_str()),
        ("gopt.c: defaults", fragments.defaults.as_str()),
        ("gopt.c: switch cases", fragments.cases.as_str()),
        ("man page: options", fragments.help.as_str()),
    ]
}
