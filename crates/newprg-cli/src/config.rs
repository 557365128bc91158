//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `NEWPRG_*` environment variables (`.env` loaded by `dotenvy`)
//! 3. Config file: `--config FILE`, else the platform config directory
//! 4. Built-in defaults
//!
//! A config file ending in `.cfg` is read as the legacy line-oriented
//! `key=value` format instead of TOML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use newprg_core::{domain::KeyValueConfig, text::Buffer};

const ENV_PREFIX: &str = "NEWPRG";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Written into copyright lines and AUTHORS.
    pub author: String,
    pub email: String,
    /// Parent directory for new projects; the current directory when unset.
    pub project_dir: Option<PathBuf>,
    /// Searched in order for library sources named with `--depends`.
    pub library_dirs: Vec<PathBuf>,
    /// Overrides for the built-in templates.
    pub templates_dir: Option<PathBuf>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults =
            toml::to_string(&Self::default()).context("Failed to serialise default config")?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if is_legacy(&path) {
            if path.exists() || required {
                info!(path = %path.display(), "Loading legacy config file");
                let legacy = Self::from_legacy(&path)?;
                let text = toml::to_string(&legacy).context("Failed to convert legacy config")?;
                builder = builder.add_source(File::from_str(&text, FileFormat::Toml));
            }
        } else {
            if path.exists() {
                info!(path = %path.display(), "Loading config file");
            }
            builder = builder.add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library_dirs")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        debug!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Read a legacy `key=value` file.
    ///
    /// Recognised keys: `author`, `email`, `project_dir` (or `progdir`),
    /// `templates_dir`, and `library_dirs` (whitespace separated). `compdir`
    /// and `stubdir` name library directories relative to `progdir`.
    pub fn from_legacy(path: &Path) -> anyhow::Result<Self> {
        let buffer = Buffer::load(path, 0)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = KeyValueConfig::from_buffer(buffer)
            .with_context(|| format!("Malformed config file {}", path.display()))?;
        Ok(Self::from_settings(&settings))
    }

    fn from_settings(settings: &KeyValueConfig) -> Self {
        let project_dir = settings
            .get("project_dir")
            .or_else(|| settings.get("progdir"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let mut library_dirs: Vec<PathBuf> = settings
            .get("library_dirs")
            .map(|v| v.split_whitespace().map(PathBuf::from).collect())
            .unwrap_or_default();
        for key in ["compdir", "stubdir"] {
            if let Some(dir) = settings.get(key).filter(|v| !v.is_empty()) {
                library_dirs.push(match &project_dir {
                    Some(base) => base.join(dir),
                    None => PathBuf::from(dir),
                });
            }
        }

        Self {
            author: settings.get("author").unwrap_or_default().to_owned(),
            email: settings.get("email").unwrap_or_default().to_owned(),
            project_dir,
            library_dirs,
            templates_dir: settings
                .get("templates_dir")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            output: OutputConfig::default(),
        }
    }

    /// The same settings as a legacy `key=value` map.
    pub fn to_legacy(&self) -> KeyValueConfig {
        let mut settings = KeyValueConfig::new();
        for key in ["author", "email", "project_dir", "library_dirs", "templates_dir"] {
            let value = self.get(key).unwrap_or_default();
            let value = if key == "library_dirs" {
                value.replace(',', " ")
            } else {
                value
            };
            settings.insert(key, value);
        }
        settings
    }

    /// Look up one key for `newprg config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match key {
            "author" => Some(self.author.clone()),
            "email" => Some(self.email.clone()),
            "project_dir" => Some(path(&self.project_dir)),
            "templates_dir" => Some(path(&self.templates_dir)),
            "library_dirs" => Some(
                self.library_dirs
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "output.no_color" => Some(self.output.no_color.to_string()),
            _ => None,
        }
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.newprg.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "newprg")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".newprg.toml"))
    }
}

fn is_legacy(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "cfg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_toml_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newprg.toml");
        std::fs::write(
            &path,
            "author = \"Jane Doe\"\nlibrary_dirs = [\"/src/lib\"]\n[output]\nno_color = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.author, "Jane Doe");
        assert_eq!(cfg.library_dirs, vec![PathBuf::from("/src/lib")]);
        assert!(cfg.output.no_color);
        assert_eq!(cfg.email, "");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn legacy_cfg_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newprg.cfg");
        std::fs::write(
            &path,
            "# newprg settings\nauthor=Jane Doe\nemail=jane@example.org\nprogdir=/home/jane/prg\ncompdir=lib\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.author, "Jane Doe");
        assert_eq!(cfg.email, "jane@example.org");
        assert_eq!(cfg.project_dir, Some(PathBuf::from("/home/jane/prg")));
        assert_eq!(cfg.library_dirs, vec![PathBuf::from("/home/jane/prg/lib")]);
    }

    #[test]
    fn malformed_legacy_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cfg");
        std::fs::write(&path, "author Jane\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn legacy_text_reads_back() {
        let cfg = AppConfig {
            author: "Jane Doe".into(),
            email: "jane@example.org".into(),
            library_dirs: vec!["/a".into(), "/b".into()],
            ..AppConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newprg.cfg");
        std::fs::write(&path, cfg.to_legacy().to_text().unwrap()).unwrap();

        assert_eq!(AppConfig::from_legacy(&path).unwrap(), cfg);
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig {
            author: "J".into(),
            library_dirs: vec!["/a".into(), "/b".into()],
            ..AppConfig::default()
        };
        assert_eq!(cfg.get("author").as_deref(), Some("J"));
        assert_eq!(cfg.get("library_dirs").as_deref(), Some("/a,/b"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("nope"), None);
    }

    #[test]
    fn default_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
