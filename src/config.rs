//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/wfxml/wfxml.toml`
//! 3. Local config: `<project_dir>/.wfxml.toml`
//! 4. Environment variables: `WFXML_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Version-control settings for `wfxml setup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// Executable to run
    pub command: String,
    /// Base URL repositories are cloned from
    pub remote_base: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            command: "git".into(),
            remote_base: "https://github.com".into(),
        }
    }
}

/// Archive settings for `wfxml package`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackageConfig {
    /// Archive file extension (without dot)
    pub extension: String,
    /// Files copied from the config directory to the archive root
    pub config_files: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            extension: "alfredworkflow".into(),
            config_files: vec!["info.plist".into(), "icon.png".into()],
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub format: Option<String>,
    pub xml_declaration: Option<bool>,
    pub git: RawGitConfig,
    pub package: RawPackageConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGitConfig {
    pub command: Option<String>,
    pub remote_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPackageConfig {
    pub extension: Option<String>,
    pub config_files: Option<Vec<String>>,
}

/// Unified configuration for wfxml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// strftime pattern used by `wfxml date`
    pub format: String,
    /// Prefix CLI output with `<?xml ...?>`
    pub xml_declaration: bool,
    pub git: GitConfig,
    pub package: PackageConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d %H:%M:%S".into(),
            xml_declaration: false,
            git: GitConfig::default(),
            package: PackageConfig::default(),
        }
    }
}

/// Get the XDG config directory for wfxml.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wfxml").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("wfxml.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".wfxml.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is kept verbatim.
fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.git.command = expand(&self.git.command);
    }

    /// Overlay wins where it specifies a value; lists are replaced, not merged.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            format: overlay.format.clone().unwrap_or_else(|| self.format.clone()),
            xml_declaration: overlay.xml_declaration.unwrap_or(self.xml_declaration),
            git: GitConfig {
                command: overlay
                    .git
                    .command
                    .clone()
                    .unwrap_or_else(|| self.git.command.clone()),
                remote_base: overlay
                    .git
                    .remote_base
                    .clone()
                    .unwrap_or_else(|| self.git.remote_base.clone()),
            },
            package: PackageConfig {
                extension: overlay
                    .package
                    .extension
                    .clone()
                    .unwrap_or_else(|| self.package.extension.clone()),
                config_files: overlay
                    .package
                    .config_files
                    .clone()
                    .unwrap_or_else(|| self.package.config_files.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply WFXML_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("WFXML")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("package.config_files")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("format") {
            settings.format = val;
        }
        if let Ok(val) = config.get_bool("xml_declaration") {
            settings.xml_declaration = val;
        }
        if let Ok(val) = config.get_string("git.command") {
            settings.git.command = val;
        }
        if let Ok(val) = config.get_string("git.remote_base") {
            settings.git.remote_base = val;
        }
        if let Ok(val) = config.get_string("package.extension") {
            settings.package.extension = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("package.config_files") {
            settings.package.config_files = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# wfxml configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/wfxml/wfxml.toml
#   Local:  <project_dir>/.wfxml.toml
#   Env:    WFXML_* environment variables (e.g. WFXML_FORMAT, WFXML_GIT__COMMAND)

# strftime pattern for `wfxml date`
# format = "%Y-%m-%d %H:%M:%S"

# Prefix generated XML with <?xml version="1.0" encoding="UTF-8"?>
# xml_declaration = false

[git]
# command = "git"
# remote_base = "https://github.com"

[package]
# extension = "alfredworkflow"
# config_files = ["info.plist", "icon.png"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
