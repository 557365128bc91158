//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here. No business logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "newprg",
    bin_name = "newprg",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate the skeleton of a new C program",
    long_about = "newprg writes the initial files of a C program: main source, \
                  getopt_long option handling, man page, Makefile.am and the \
                  usual GNU text files.",
    after_help = "EXAMPLES:\n\
        \x20 newprg new greet -n 'v,verbose,verbosity,acc,,,,' -n 'n:,name,who,string,world,,Who to greet,'\n\
        \x20 newprg new tool -f tool.opts -d str.h+c -x tool.cfg\n\
        \x20 newprg options -n 'o:,output,outfile,file,,,Output file,'\n\
        \x20 newprg completions bash > /usr/share/bash-completion/completions/newprg",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new C program directory.
    #[command(
        visible_alias = "n",
        about = "Create a new C program",
        after_help = "Each option descriptor has eight comma-separated fields:\n\
            \x20 short[:|::], long, variable, purpose, default, max, help, action\n\
            Purpose is one of: flag, acc, int, float, string, file.\n\n\
            EXAMPLES:\n\
            \x20 newprg new greet -n 'n:,name,who,string,world,,Who to greet,'\n\
            \x20 newprg new tool -f tool.opts --on-exists replace"
    )]
    New(NewArgs),

    /// Compile option descriptors and print the generated C fragments.
    #[command(
        visible_alias = "opts",
        about = "Print the C fragments for option descriptors",
        after_help = "EXAMPLES:\n\
            \x20 newprg options -n 'v,verbose,verbosity,acc,,,,'\n\
            \x20 newprg options -f tool.opts --format json"
    )]
    Options(OptionsArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 newprg init\n\
            \x20 newprg init --force\n\
            \x20 newprg -c ./newprg.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 newprg completions bash > ~/.local/share/bash-completion/completions/newprg\n\
            \x20 newprg completions zsh  > ~/.zfunc/_newprg\n\
            \x20 newprg completions fish > ~/.config/fish/completions/newprg.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 newprg config get author\n\
            \x20 newprg config list\n\
            \x20 newprg config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `newprg new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Program name. The executable is its lower-case form and the
    /// directory its capitalised form.
    #[arg(value_name = "NAME", help = "Program name")]
    pub name: String,

    #[command(flatten)]
    pub descriptors: DescriptorArgs,

    /// Library sources to copy into the project (`str.h+c` for both).
    #[arg(
        short = 'd',
        long = "depends",
        value_name = "FILE",
        help = "Library source to include, e.g. str.h+c"
    )]
    pub depends: Vec<String>,

    /// Extra data files installed with the program.
    #[arg(
        short = 'x',
        long = "extra-dist",
        value_name = "FILE",
        help = "Extra file listed in EXTRA_DIST"
    )]
    pub extra_dist: Vec<String>,

    /// Directories searched for library sources, before the configured ones.
    #[arg(
        short = 'L',
        long = "lib-dir",
        value_name = "DIR",
        help = "Directory holding library sources"
    )]
    pub lib_dirs: Vec<PathBuf>,

    #[arg(long = "author", value_name = "NAME", help = "Author (overrides config)")]
    pub author: Option<String>,

    #[arg(long = "email", value_name = "ADDRESS", help = "Author email (overrides config)")]
    pub email: Option<String>,

    /// Parent directory of the new project.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory (default: config project_dir, else current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Directory of templates overriding the built-in ones.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory overriding built-in templates"
    )]
    pub templates: Option<PathBuf>,

    /// What to do if the project directory exists.
    #[arg(
        long = "on-exists",
        value_enum,
        default_value = "refuse",
        help = "Existing directory policy"
    )]
    pub on_exists: OnExists,

    /// List the files that would be created without writing anything.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// Where option descriptors come from. Shared by `new` and `options`.
#[derive(Debug, Default, Args)]
pub struct DescriptorArgs {
    /// One option descriptor; repeat for several.
    #[arg(
        short = 'n',
        long = "option",
        value_name = "DESCRIPTOR",
        allow_hyphen_values = true,
        help = "Option descriptor (8 comma-separated fields)"
    )]
    pub options: Vec<String>,

    /// File of descriptors, one per line; lines starting with `#` are comments.
    #[arg(
        short = 'f',
        long = "options-file",
        value_name = "FILE",
        help = "File of option descriptors"
    )]
    pub file: Option<PathBuf>,
}

/// Existing project directory policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OnExists {
    /// Stop with an error.
    #[default]
    Refuse,
    /// Delete and regenerate.
    Replace,
    /// Ask on the terminal.
    Ask,
}

// ── options ───────────────────────────────────────────────────────────────────

/// Arguments for `newprg options`.
#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub descriptors: DescriptorArgs,

    #[arg(
        long = "format",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub format: FragmentFormat,
}

/// Output format for the `options` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FragmentFormat {
    /// Each fragment under a heading.
    Text,
    /// JSON object with one key per fragment.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `newprg init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `newprg completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `newprg config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Key, e.g. `author` or `output.no_color`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
