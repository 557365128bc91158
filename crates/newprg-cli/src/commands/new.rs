//! `newprg new`: generate a C program directory.
//!
//! Translates arguments and configuration into a [`ProjectRequest`], wires
//! the adapters into a [`ProjectGenerator`] and reports what was written.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use newprg_adapters::{BuiltinTemplates, DirectoryTemplates, LayeredTemplates, LocalFilesystem};
use newprg_core::{
    application::{
        ExistingDirPolicy, Filesystem, GenerationPlan, ProjectGenerator, ProjectRequest,
    },
    domain::ProjectNames,
    error::NewprgError,
};

use crate::{
    cli::{GlobalArgs, NewArgs, OnExists},
    commands::read_descriptors,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config)?;
    let fs = LocalFilesystem::new();
    let generator = ProjectGenerator::new(Box::new(template_store(&args, &config)?), Box::new(fs));

    if args.dry_run {
        let plan = generator.plan(&request)?;
        return show_plan(&plan, &fs, &output);
    }

    let request = match args.on_exists {
        OnExists::Ask => {
            let policy = ask_policy(&request, &fs, confirm_replace)?;
            request.with_policy(policy)
        }
        _ => request,
    };

    output.header(&format!("Creating '{}'...", request.name))?;
    let plan = generator.generate(&request)?;
    info!(root = %plan.root.display(), "Project created");

    for path in plan.paths() {
        output.print(&format!("  {}", path.display()))?;
    }
    for name in &plan.missing_libraries {
        output.warning(&format!("Library source '{name}' not found, add it by hand"))?;
    }
    output.success(&format!(
        "Program '{}' created in {}",
        plan.names.exe,
        plan.root.display()
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", plan.root.display()))?;
        output.print("  bin/findfixme        # list the placeholders to fill in")?;
    }

    Ok(())
}

/// Flags override configuration; library directories from flags are
/// searched first.
fn build_request(args: &NewArgs, config: &AppConfig) -> CliResult<ProjectRequest> {
    let options = read_descriptors(&args.descriptors)?;
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.project_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let library_dirs = args
        .lib_dirs
        .iter()
        .chain(&config.library_dirs)
        .cloned()
        .collect();
    let policy = match args.on_exists {
        OnExists::Replace => ExistingDirPolicy::Replace,
        OnExists::Refuse | OnExists::Ask => ExistingDirPolicy::Refuse,
    };

    debug!(
        output_dir = %output_dir.display(),
        descriptors = options.lines().count(),
        "Request assembled"
    );

    Ok(ProjectRequest::new(&args.name, output_dir)
        .with_options(options)
        .with_dependencies(args.depends.clone())
        .with_extra_dist(args.extra_dist.clone())
        .with_author(
            args.author.clone().unwrap_or_else(|| config.author.clone()),
            args.email.clone().unwrap_or_else(|| config.email.clone()),
        )
        .with_library_dirs(library_dirs)
        .with_policy(policy))
}

/// Policy for `--on-exists ask`: prompt only when the project directory is
/// already there.
fn ask_policy(
    request: &ProjectRequest,
    fs: &dyn Filesystem,
    confirm: impl FnOnce(&Path) -> CliResult<bool>,
) -> CliResult<ExistingDirPolicy> {
    let names = ProjectNames::derive(&request.name).map_err(NewprgError::from)?;
    let root = request.output_dir.join(names.dir);
    if !fs.exists(&root) {
        return Ok(ExistingDirPolicy::Refuse);
    }
    if confirm(&root)? {
        Ok(ExistingDirPolicy::Replace)
    } else {
        Err(CliError::Cancelled)
    }
}

/// User templates, if any, over the built-in set.
fn template_store(args: &NewArgs, config: &AppConfig) -> CliResult<LayeredTemplates> {
    let mut store = LayeredTemplates::new();
    if let Some(dir) = args.templates.as_ref().or(config.templates_dir.as_ref()) {
        store = store.with_layer(DirectoryTemplates::open(dir)?);
    }
    Ok(store.with_layer(BuiltinTemplates::new()))
}

fn show_plan(plan: &GenerationPlan, fs: &dyn Filesystem, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: would create '{}' at {}",
        plan.names.exe,
        plan.root.display()
    ))?;
    if fs.exists(&plan.root) {
        output.warning("The directory already exists")?;
    }
    for file in &plan.files {
        let mode = if file.executable { " (executable)" } else { "" };
        output.info(&format!(
            "  {}  {} bytes{}",
            file.path.display(),
            file.content.len(),
            mode
        ))?;
    }
    for (source, name) in &plan.libraries {
        output.info(&format!("  {}  copied from {}", name, source.display()))?;
    }
    for name in &plan.missing_libraries {
        output.warning(&format!("Library source '{name}' not found"))?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm_replace(root: &Path) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("{} exists. Replace it?", root.display()))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_replace(_root: &Path) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use newprg_adapters::MemoryFilesystem;

    use crate::cli::DescriptorArgs;

    fn args(name: &str) -> NewArgs {
        NewArgs {
            name: name.into(),
            descriptors: DescriptorArgs::default(),
            depends: Vec::new(),
            extra_dist: Vec::new(),
            lib_dirs: Vec::new(),
            author: None,
            email: None,
            output: None,
            templates: None,
            on_exists: OnExists::Refuse,
            dry_run: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let config = AppConfig {
            author: "Config Author".into(),
            email: "config@example.org".into(),
            project_dir: Some("/home/jane/prg".into()),
            library_dirs: vec!["/lib/b".into()],
            ..AppConfig::default()
        };
        let mut a = args("Demo");
        a.author = Some("Flag Author".into());
        a.lib_dirs = vec!["/lib/a".into()];
        a.on_exists = OnExists::Replace;

        let request = build_request(&a, &config).unwrap();
        assert_eq!(request.author, "Flag Author");
        assert_eq!(request.email, "config@example.org");
        assert_eq!(request.output_dir, PathBuf::from("/home/jane/prg"));
        assert_eq!(
            request.library_dirs,
            vec![PathBuf::from("/lib/a"), PathBuf::from("/lib/b")]
        );
        assert_eq!(request.on_exists, ExistingDirPolicy::Replace);
    }

    #[test]
    fn output_defaults_to_current_directory() {
        let request = build_request(&args("x"), &AppConfig::default()).unwrap();
        assert_eq!(request.output_dir, PathBuf::from("."));
        assert_eq!(request.on_exists, ExistingDirPolicy::Refuse);
    }

    #[test]
    fn ask_only_prompts_for_an_existing_directory() {
        let request = ProjectRequest::new("demo", "/work");
        let fs = MemoryFilesystem::new();

        let policy = ask_policy(&request, &fs, |_| panic!("nothing to replace")).unwrap();
        assert_eq!(policy, ExistingDirPolicy::Refuse);

        fs.create_dir_all(Path::new("/work/Demo")).unwrap();
        let policy = ask_policy(&request, &fs, |root| {
            assert_eq!(root, Path::new("/work/Demo"));
            Ok(true)
        })
        .unwrap();
        assert_eq!(policy, ExistingDirPolicy::Replace);

        let err = ask_policy(&request, &fs, |_| Ok(false)).unwrap_err();
        assert!(matches!(err, CliError::Cancelled));
    }

    #[test]
    fn ask_checks_the_local_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let request = ProjectRequest::new("demo", dir.path());
        let fs = LocalFilesystem::new();

        assert_eq!(
            ask_policy(&request, &fs, |_| Ok(true)).unwrap(),
            ExistingDirPolicy::Refuse
        );
        std::fs::create_dir(dir.path().join("Demo")).unwrap();
        assert_eq!(
            ask_policy(&request, &fs, |_| Ok(true)).unwrap(),
            ExistingDirPolicy::Replace
        );
    }

    #[test]
    fn missing_template_directory_is_an_error() {
        let mut a = args("x");
        a.templates = Some("/no/such/templates".into());
        assert!(template_store(&a, &AppConfig::default()).is_err());
    }
}
