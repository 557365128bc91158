//! Subcommand handlers. Each translates arguments into core calls and
//! prints the result.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod options;

use tracing::debug;

use newprg_core::text::Buffer;

use crate::{cli::DescriptorArgs, error::CliResult};

/// Descriptor text from `--options-file` followed by every `--option`,
/// one per line.
pub(crate) fn read_descriptors(args: &DescriptorArgs) -> CliResult<String> {
    let mut text = String::new();
    if let Some(path) = &args.file {
        let buffer = Buffer::load(path, 0)?;
        debug!(path = %path.display(), bytes = buffer.len(), "Read descriptor file");
        text.push_str(&buffer.to_string_lossy());
        text.push('\n');
    }
    for descriptor in &args.options {
        text.push_str(descriptor);
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_comes_before_inline_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.opts");
        std::fs::write(&path, "v,verbose,verbosity,acc,,,,").unwrap();

        let args = DescriptorArgs {
            options: vec!["q,quiet,,flag,,,,".into()],
            file: Some(path),
        };
        assert_eq!(
            read_descriptors(&args).unwrap(),
            "v,verbose,verbosity,acc,,,,\nq,quiet,,flag,,,,\n"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = DescriptorArgs {
            options: Vec::new(),
            file: Some("/no/such/file.opts".into()),
        };
        assert!(read_descriptors(&args).is_err());
    }

    #[test]
    fn nothing_given_is_empty() {
        assert_eq!(read_descriptors(&DescriptorArgs::default()).unwrap(), "");
    }
}
