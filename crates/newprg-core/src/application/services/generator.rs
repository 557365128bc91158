//! Project generator - main application orchestrator.
//!
//! Turns a [`ProjectRequest`] into a project directory:
//! 1. Derive the project names and compile the option descriptors
//! 2. Instantiate every template and the auxiliary files (the plan)
//! 3. Create the directory, write the plan, copy library sources
//!
//! A failure after the directory was created removes it again.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateStore},
        services::instantiator::{Substitution, TemplateInstantiator},
    },
    domain::{
        DescriptorParser, DescriptorSyntax, FragmentSet, OptionCompiler, ProjectNames,
        expand_dependencies,
    },
    error::NewprgResult,
};

/// What to do when the project directory already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingDirPolicy {
    /// Fail with `ProjectExists`.
    #[default]
    Refuse,
    /// Delete the directory and generate from scratch.
    Replace,
}

/// Everything needed to generate one project.
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    pub name: String,
    pub output_dir: PathBuf,
    /// Option descriptors, one per line.
    pub options: String,
    /// Library sources to copy in, `name.h+c` shorthand allowed.
    pub dependencies: Vec<String>,
    /// Additional files listed in `EXTRA_DIST`.
    pub extra_dist: Vec<String>,
    pub author: String,
    pub email: String,
    /// Searched in order for each dependency.
    pub library_dirs: Vec<PathBuf>,
    pub on_exists: ExistingDirPolicy,
    pub date: NaiveDate,
}

impl ProjectRequest {
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output_dir: output_dir.into(),
            options: String::new(),
            dependencies: Vec::new(),
            extra_dist: Vec::new(),
            author: String::new(),
            email: String::new(),
            library_dirs: Vec::new(),
            on_exists: ExistingDirPolicy::default(),
            date: Local::now().date_naive(),
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_extra_dist(mut self, extra_dist: Vec<String>) -> Self {
        self.extra_dist = extra_dist;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>, email: impl Into<String>) -> Self {
        self.author = author.into();
        self.email = email.into();
        self
    }

    pub fn with_library_dirs(mut self, library_dirs: Vec<PathBuf>) -> Self {
        self.library_dirs = library_dirs;
        self
    }

    pub fn with_policy(mut self, on_exists: ExistingDirPolicy) -> Self {
        self.on_exists = on_exists;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// One file the generator will write, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub executable: bool,
}

/// The complete outcome of a generation run, computed before any write.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub root: PathBuf,
    pub names: ProjectNames,
    pub fragments: FragmentSet,
    pub files: Vec<PlannedFile>,
    /// `(source, file name)` of every library found.
    pub libraries: Vec<(PathBuf, String)>,
    /// Dependencies found in none of the library directories.
    pub missing_libraries: Vec<String>,
}

impl GenerationPlan {
    /// Every path the plan creates, relative to the root.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| f.path.clone())
            .chain(self.libraries.iter().map(|(_, name)| PathBuf::from(name)))
            .collect()
    }
}

/// Template name, output path and whether the output is a script.
struct Output {
    template: &'static str,
    path: PathBuf,
    executable: bool,
}

/// Generates project directories.
pub struct ProjectGenerator {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
    parser: DescriptorParser,
    compiler: OptionCompiler,
    instantiator: TemplateInstantiator,
}

impl ProjectGenerator {
    pub fn new(store: Box<dyn TemplateStore>, filesystem: Box<dyn Filesystem>) -> Self {
        Self::with_syntax(store, filesystem, DescriptorSyntax::default())
    }

    pub fn with_syntax(
        store: Box<dyn TemplateStore>,
        filesystem: Box<dyn Filesystem>,
        syntax: DescriptorSyntax,
    ) -> Self {
        Self {
            store,
            filesystem,
            compiler: OptionCompiler::new(&syntax),
            parser: DescriptorParser::new(syntax),
            instantiator: TemplateInstantiator::default(),
        }
    }

    /// Compute the files of the project without writing anything.
    #[instrument(skip_all, fields(project = %request.name))]
    pub fn plan(&self, request: &ProjectRequest) -> NewprgResult<GenerationPlan> {
        let names = ProjectNames::derive(&request.name)?;
        let records = self.parser.parse_list(&request.options)?;
        let fragments = self.compiler.compile(&records)?;
        info!(options = records.len(), "Options compiled");

        let dependencies = expand_dependencies(&request.dependencies);
        if let Some(bad) = dependencies.iter().find(|d| d.contains(['/', '\\'])) {
            return Err(ApplicationError::ValidationFailed(format!(
                "library dependency '{bad}' must be a plain file name"
            ))
            .into());
        }

        let substitutions = substitutions(request, &names, &fragments, &dependencies);
        let mut files = Vec::new();
        for output in outputs(&names) {
            let template = self.store.load(output.template)?;
            let content = self.instantiator.render(&template, &substitutions)?;
            files.push(PlannedFile {
                path: output.path,
                content,
                executable: output.executable,
            });
        }
        files.extend(auxiliary_files(request, &names));

        let (libraries, missing_libraries) =
            self.locate_libraries(&dependencies, &request.library_dirs, &files);

        Ok(GenerationPlan {
            root: request.output_dir.join(&names.dir),
            names,
            fragments,
            files,
            libraries,
            missing_libraries,
        })
    }

    /// Generate the project on the filesystem.
    #[instrument(skip_all, fields(project = %request.name))]
    pub fn generate(&self, request: &ProjectRequest) -> NewprgResult<GenerationPlan> {
        let plan = self.plan(request)?;
        self.prepare_root(&plan.root, request.on_exists)?;

        match self.write_plan(&plan) {
            Ok(()) => {
                info!(root = %plan.root.display(), files = plan.files.len(), "Project generated");
                Ok(plan)
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(&plan.root);
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn prepare_root(&self, root: &Path, policy: ExistingDirPolicy) -> NewprgResult<()> {
        if self.filesystem.exists(root) {
            match policy {
                ExistingDirPolicy::Refuse => {
                    return Err(ApplicationError::ProjectExists {
                        path: root.to_path_buf(),
                    }
                    .into());
                }
                ExistingDirPolicy::Replace => {
                    info!(root = %root.display(), "Replacing existing project directory");
                    self.filesystem.remove_dir_all(root)?;
                }
            }
        }
        self.filesystem.create_dir_all(root)
    }

    fn write_plan(&self, plan: &GenerationPlan) -> NewprgResult<()> {
        for file in &plan.files {
            let path = plan.root.join(&file.path);
            if let Some(parent) = path.parent() {
                if parent != plan.root {
                    self.filesystem.create_dir_all(parent)?;
                }
            }
            self.filesystem.write(&path, &file.content)?;
            if file.executable {
                self.filesystem.set_executable(&path)?;
            }
            debug!(path = %file.path.display(), bytes = file.content.len(), "File written");
        }

        for (source, name) in &plan.libraries {
            self.filesystem.copy_file(source, &plan.root.join(name))?;
            debug!(source = %source.display(), "Library copied");
        }
        for name in &plan.missing_libraries {
            warn!(library = %name, "Library source not found in any library directory");
        }

        Ok(())
    }

    /// First directory holding each dependency. Names the generator writes
    /// itself are skipped.
    fn locate_libraries(
        &self,
        dependencies: &[String],
        library_dirs: &[PathBuf],
        generated: &[PlannedFile],
    ) -> (Vec<(PathBuf, String)>, Vec<String>) {
        let mut found = Vec::new();
        let mut missing = Vec::new();

        for name in dependencies {
            if generated.iter().any(|f| f.path == Path::new(name)) {
                debug!(library = %name, "Dependency is generated, not copied");
                continue;
            }
            match library_dirs
                .iter()
                .map(|dir| dir.join(name))
                .find(|candidate| self.filesystem.exists(candidate))
            {
                Some(source) => found.push((source, name.clone())),
                None => missing.push(name.clone()),
            }
        }

        (found, missing)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

fn outputs(names: &ProjectNames) -> Vec<Output> {
    let output = |template, path: &str, executable| Output {
        template,
        path: PathBuf::from(path),
        executable,
    };
    vec![
        output("main.c", names.src.as_str(), false),
        output("gopt.c", "gopt.c", false),
        output("gopt.h", "gopt.h", false),
        output("manpage.1", names.man.as_str(), false),
        output("Makefile.am", "Makefile.am", false),
        output("findfixme", "bin/findfixme", true),
    ]
}

fn substitutions(
    request: &ProjectRequest,
    names: &ProjectNames,
    fragments: &FragmentSet,
    dependencies: &[String],
) -> Vec<Substitution> {
    let owner = [
        request.date.year().to_string(),
        request.author.clone(),
        request.email.clone(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .cloned()
    .collect::<Vec<_>>()
    .join(" ");

    vec![
        Substitution::new("<canonical>", &names.canonical),
        Substitution::new("<exename>", &names.exe),
        Substitution::new("<EXENAME>", &names.man_title),
        Substitution::new("<file owner>", owner),
        Substitution::new("<date>", request.date.format("%Y-%m-%d").to_string()),
        Substitution::new("<struct>", &fragments.struct_block),
        Substitution::new("<optstring>", &fragments.short_options),
        Substitution::new("<defaults>", &fragments.defaults),
        Substitution::new("<longopt>", &fragments.long_options),
        Substitution::new("<cases>", &fragments.cases),
        Substitution::new("<options help>", &fragments.help),
        Substitution::new("<swlibs>", dependencies.join(" ")),
        Substitution::new("<tla>", &names.tla),
        Substitution::new("<extra dist>", request.extra_dist.join(" ")),
    ]
}

fn auxiliary_files(request: &ProjectRequest, names: &ProjectNames) -> Vec<PlannedFile> {
    let text = |path: &str, content: String| PlannedFile {
        path: PathBuf::from(path),
        content: content.into_bytes(),
        executable: false,
    };
    let exe = &names.exe;
    let mut authors = format!("Author for {exe}\n");
    let who = format!("{} {}", request.author, request.email);
    if !who.trim().is_empty() {
        authors.push_str(who.trim());
        authors.push('\n');
    }

    vec![
        text("README", format!("README for {exe}\n")),
        text("NOTES", format!("NOTES for {exe}\n")),
        text("ChangeLog", format!("ChangeLog for {exe}\n")),
        text("NEWS", format!("NEWS for {exe}\n")),
        text("AUTHORS", authors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateStore};
    use crate::error::NewprgError;
    use mockall::predicate::eq;

    fn store() -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store
            .expect_load()
            .returning(|name| Ok(format!("[{name}] <exename> <optstring>\n<defaults>\n").into_bytes()));
        store
    }

    fn request() -> ProjectRequest {
        ProjectRequest::new("Tool", "/work")
            .with_options("v,verbose,verbosity,acc,,,,")
            .with_author("Jane Doe", "jane@example.org")
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn generator(fs: MockFilesystem) -> ProjectGenerator {
        ProjectGenerator::new(Box::new(store()), Box::new(fs))
    }

    #[test]
    fn plan_lists_every_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let plan = generator(fs).plan(&request()).unwrap();

        assert_eq!(plan.root, PathBuf::from("/work/Tool"));
        let paths: Vec<String> = plan
            .paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "tool.c",
                "gopt.c",
                "gopt.h",
                "tool.1",
                "Makefile.am",
                "bin/findfixme",
                "README",
                "NOTES",
                "ChangeLog",
                "NEWS",
                "AUTHORS",
            ]
        );
        assert!(plan.files.iter().any(|f| f.executable && f.path.ends_with("findfixme")));
        assert_eq!(plan.files[0].content, b"[main.c] tool :v\n");
    }

    #[test]
    fn makefile_variables_use_the_canonical_name() {
        let mut store = MockTemplateStore::new();
        store
            .expect_load()
            .returning(|_| Ok(b"<canonical>_SOURCES = <exename>.c\n<tla>dir = x\n".to_vec()));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let generator = ProjectGenerator::new(Box::new(store), Box::new(fs));

        let plan = generator
            .plan(&ProjectRequest::new("my-tool", "/work"))
            .unwrap();
        let makefile = plan
            .files
            .iter()
            .find(|f| f.path == Path::new("Makefile.am"))
            .unwrap();
        assert_eq!(makefile.content, b"my_tool_SOURCES = my-tool.c\nmy_dir = x\n");
    }

    #[test]
    fn plan_rejects_bad_descriptors_before_touching_templates() {
        let mut store = MockTemplateStore::new();
        store.expect_load().never();
        let generator = ProjectGenerator::new(Box::new(store), Box::new(MockFilesystem::new()));

        let err = generator
            .plan(&request().with_options("h,help,,,,,,"))
            .unwrap_err();
        assert!(matches!(err, NewprgError::Domain(_)));
    }

    #[test]
    fn plan_rejects_path_like_dependencies() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let err = generator(fs)
            .plan(&request().with_dependencies(vec!["../evil.c".into()]))
            .unwrap_err();
        assert!(matches!(
            err,
            NewprgError::Application(ApplicationError::ValidationFailed(_))
        ));
    }

    #[test]
    fn libraries_come_from_first_directory_holding_them() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/lib/b/str.c") || p == Path::new("/lib/a/str.h"));
        let plan = generator(fs)
            .plan(
                &request()
                    .with_dependencies(vec!["str.h+c".into(), "gone.c".into(), "gopt.h".into()])
                    .with_library_dirs(vec!["/lib/a".into(), "/lib/b".into()]),
            )
            .unwrap();

        assert_eq!(
            plan.libraries,
            vec![
                (PathBuf::from("/lib/a/str.h"), "str.h".to_string()),
                (PathBuf::from("/lib/b/str.c"), "str.c".to_string()),
            ]
        );
        assert_eq!(plan.missing_libraries, vec!["gone.c".to_string()]);
    }

    #[test]
    fn authors_file_names_the_author() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let plan = generator(fs).plan(&request()).unwrap();
        let authors = plan
            .files
            .iter()
            .find(|f| f.path == Path::new("AUTHORS"))
            .unwrap();
        assert_eq!(
            authors.content,
            b"Author for tool\nJane Doe jane@example.org\n"
        );
    }

    #[test]
    fn existing_directory_is_refused_by_default() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_create_dir_all().never();
        fs.expect_remove_dir_all().never();

        let err = generator(fs).generate(&request()).unwrap_err();
        assert!(matches!(
            err,
            NewprgError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn replace_policy_removes_directory_first() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_remove_dir_all()
            .with(eq(PathBuf::from("/work/Tool")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write().times(11).returning(|_, _| Ok(()));
        fs.expect_set_executable()
            .with(eq(PathBuf::from("/work/Tool/bin/findfixme")))
            .times(1)
            .returning(|_| Ok(()));

        generator(fs)
            .generate(&request().with_policy(ExistingDirPolicy::Replace))
            .unwrap();
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write()
            .returning(|path, _| {
                if path.ends_with("gopt.h") {
                    Err(ApplicationError::filesystem(path, "disk full").into())
                } else {
                    Ok(())
                }
            });
        fs.expect_remove_dir_all()
            .with(eq(PathBuf::from("/work/Tool")))
            .times(1)
            .returning(|_| Ok(()));

        let err = generator(fs).generate(&request()).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn failed_rollback_keeps_original_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write()
            .returning(|path, _| Err(ApplicationError::filesystem(path, "read-only").into()));
        fs.expect_remove_dir_all()
            .times(1)
            .returning(|path| Err(ApplicationError::filesystem(path, "busy").into()));

        let err = generator(fs).generate(&request()).unwrap_err();
        assert!(err.to_string().contains("read-only"));
    }
}
