//! Tests for workflow packaging

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;
use zip::ZipArchive;

use wfxml::application::services::{PackageRequest, PackageService};
use wfxml::application::ApplicationError;
use wfxml::config::Settings;
use wfxml::infrastructure::traits::RealFileSystem;
use wfxml::util::testing::init_test_setup;

fn service(settings: Settings) -> PackageService {
    init_test_setup();
    PackageService::new(Arc::new(RealFileSystem), Arc::new(settings))
}

/// Lay out `<root>/date/**` assets and `<root>/config/{info.plist,icon.png}`.
fn workflow(root: &Path) -> PackageRequest {
    let source = root.join("date");
    fs::create_dir_all(source.join("lib")).unwrap();
    fs::write(source.join("command.py"), "print('now')\n").unwrap();
    fs::write(source.join("lib").join("util.py"), "X = 1\n").unwrap();

    let config = root.join("config");
    fs::create_dir_all(&config).unwrap();
    fs::write(config.join("info.plist"), "<plist/>").unwrap();
    fs::write(config.join("icon.png"), [0x89, b'P', b'N', b'G']).unwrap();

    PackageRequest {
        name: "date".to_string(),
        source_dir: source,
        config_dir: config,
        out_dir: root.join("dist"),
    }
}

fn entry_names(archive: &Path) -> Vec<String> {
    let zip = ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn given_workflow_layout_when_packaging_then_archive_holds_config_and_assets() {
    let temp = TempDir::new().unwrap();
    let request = workflow(temp.path());
    let service = service(Settings::default());

    let archive = service.package(&request).unwrap();

    assert_eq!(archive, temp.path().join("dist").join("date.alfredworkflow"));
    assert_eq!(
        entry_names(&archive),
        vec![
            "date/command.py",
            "date/lib/util.py",
            "icon.png",
            "info.plist",
        ]
    );
}

#[test]
fn given_packaged_archive_when_reading_entry_then_content_is_preserved() {
    let temp = TempDir::new().unwrap();
    let request = workflow(temp.path());

    let archive = service(Settings::default()).package(&request).unwrap();

    let mut zip = ZipArchive::new(fs::File::open(&archive).unwrap()).unwrap();
    let mut content = String::new();
    zip.by_name("date/command.py")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "print('now')\n");
}

#[test]
fn given_custom_extension_when_archive_path_then_uses_it() {
    let mut settings = Settings::default();
    settings.package.extension = "zip".to_string();
    let temp = TempDir::new().unwrap();
    let request = workflow(temp.path());

    let path = service(settings).archive_path(&request);

    assert_eq!(path, temp.path().join("dist").join("date.zip"));
}

#[test]
fn given_missing_config_file_when_packaging_then_fails_without_archive() {
    let temp = TempDir::new().unwrap();
    let request = workflow(temp.path());
    fs::remove_file(request.config_dir.join("icon.png")).unwrap();
    let service = service(Settings::default());

    let err = service.package(&request).unwrap_err();

    assert!(err.to_string().contains("icon.png"), "got: {err}");
    assert!(!service.archive_path(&request).exists());
}

#[test]
fn given_missing_source_dir_when_packaging_then_fails() {
    let temp = TempDir::new().unwrap();
    let mut request = workflow(temp.path());
    request.source_dir = temp.path().join("missing");

    assert!(service(Settings::default()).package(&request).is_err());
}

#[rstest]
#[case::parent_separator("../escape")]
#[case::parent_dir("..")]
#[case::current_dir(".")]
#[case::empty("")]
#[case::backslash("a\\b")]
fn given_name_that_is_not_one_plain_component_when_packaging_then_rejected(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let mut request = workflow(temp.path());
    request.name = name.to_string();
    let service = service(Settings::default());

    let err = service.package(&request).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got: {err}");
}

#[test]
fn given_existing_archive_when_packaging_again_then_replaced() {
    let temp = TempDir::new().unwrap();
    let request = workflow(temp.path());
    let service = service(Settings::default());
    service.package(&request).unwrap();
    fs::write(request.source_dir.join("extra.py"), "").unwrap();

    let archive = service.package(&request).unwrap();

    assert!(entry_names(&archive).contains(&"date/extra.py".to_string()));
}
