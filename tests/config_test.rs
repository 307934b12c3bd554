//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE per field
//! - Global → Local: REPLACE per field, lists replaced as a whole
//!
//! These tests use temp directories for the local layer and only assert
//! on fields they set there.

use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use wfxml::config::{local_config_path, Settings};

/// `Settings::load` reads the process environment; tests that load hold this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn given_local_config_when_load_then_specified_fields_override() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
format = "%H:%M"
xml_declaration = true

[package]
config_files = ["info.plist"]
"#;
    fs::write(project.path().join(".wfxml.toml"), local).unwrap();

    // Act
    let _guard = env_lock();
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.format, "%H:%M");
    assert!(settings.xml_declaration);
    assert_eq!(
        settings.package.config_files,
        vec!["info.plist".to_string()],
        "lists are replaced, not merged"
    );
}

#[test]
fn given_local_git_section_when_load_then_unspecified_fields_keep_lower_layer() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(".wfxml.toml"),
        "[git]\nremote_base = \"https://git.example.org/\"\n",
    )
    .unwrap();

    let _guard = env_lock();
    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.git.remote_base, "https://git.example.org/");
    assert!(!settings.git.command.is_empty());
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".wfxml.toml"), "format = [").unwrap();

    let _guard = env_lock();
    let err = Settings::load(Some(project.path())).unwrap_err();

    assert!(err.to_string().contains(".wfxml.toml"), "got: {err}");
}

#[test]
fn given_project_dir_when_local_config_path_then_dotfile_inside() {
    let project = TempDir::new().unwrap();
    assert_eq!(
        local_config_path(project.path()),
        project.path().join(".wfxml.toml")
    );
}

#[test]
fn given_wfxml_env_vars_when_load_then_override_local_config() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".wfxml.toml"), "format = \"%H:%M\"\n").unwrap();
    let _guard = env_lock();
    env::set_var("WFXML_FORMAT", "%H");
    env::set_var("WFXML_GIT__COMMAND", "hg");
    env::set_var("WFXML_PACKAGE__CONFIG_FILES", "info.plist,icon.png,README.md");

    // Act
    let result = Settings::load(Some(project.path()));
    env::remove_var("WFXML_FORMAT");
    env::remove_var("WFXML_GIT__COMMAND");
    env::remove_var("WFXML_PACKAGE__CONFIG_FILES");

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.format, "%H");
    assert_eq!(settings.git.command, "hg");
    assert_eq!(
        settings.package.config_files,
        vec!["info.plist", "icon.png", "README.md"]
    );
}
