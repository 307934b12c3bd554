//! Workflow packaging service
//!
//! Bundles a directory of built assets plus the workflow's fixed config
//! files into a single deflate-compressed archive:
//!
//! ```text
//! <name>.<extension>
//! ├── info.plist
//! ├── icon.png
//! └── <name>/...        (every file below the source directory)
//! ```

use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::InfraError;

/// What to package and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Workflow name; archive file stem and top-level directory inside the archive.
    pub name: String,
    /// Directory of built assets.
    pub source_dir: PathBuf,
    /// Directory holding the fixed config files.
    pub config_dir: PathBuf,
    /// Directory the archive is written to.
    pub out_dir: PathBuf,
}

/// Service producing distributable workflow archives.
pub struct PackageService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

fn archive_err(context: String, e: zip::result::ZipError) -> ApplicationError {
    ApplicationError::OperationFailed {
        context,
        source: Box::new(InfraError::Archive {
            message: e.to_string(),
        }),
    }
}

/// Archive entry name with `/` separators regardless of platform.
fn entry_name(prefix: &str, relative: &Path) -> String {
    let mut name = prefix.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

impl PackageService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Target path of the archive for `request`.
    pub fn archive_path(&self, request: &PackageRequest) -> PathBuf {
        request.out_dir.join(format!(
            "{}.{}",
            request.name, self.settings.package.extension
        ))
    }

    /// Write the archive and return its path.
    pub fn package(&self, request: &PackageRequest) -> ApplicationResult<PathBuf> {
        debug!("package: request={:?}", request);
        self.check(request)?;

        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for name in &self.settings.package.config_files {
            let path = request.config_dir.join(name);
            self.add_file(&mut zip, name.clone(), &path, options)?;
        }

        let files = self
            .fs
            .list_files(&request.source_dir)
            .with_path_context("list assets", &request.source_dir)?;
        for path in &files {
            let relative = path
                .strip_prefix(&request.source_dir)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("relativize {}", path.display()),
                    source: Box::new(e),
                })?;
            self.add_file(&mut zip, entry_name(&request.name, relative), path, options)?;
        }

        let target = self.archive_path(request);
        let bytes = zip
            .finish()
            .map_err(|e| archive_err(format!("finish {}", target.display()), e))?
            .into_inner();

        self.fs
            .create_dir_all(&request.out_dir)
            .with_path_context("create output directory", &request.out_dir)?;
        self.fs
            .write(&target, &bytes)
            .with_path_context("write archive", &target)?;

        info!(
            "package: wrote {} ({} assets, {} bytes)",
            target.display(),
            files.len(),
            bytes.len()
        );
        Ok(target)
    }

    fn check(&self, request: &PackageRequest) -> ApplicationResult<()> {
        let mut components = Path::new(&request.name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || request.name.contains(['/', '\\']) {
            return Err(ApplicationError::Config {
                message: format!("invalid workflow name: {:?}", request.name),
            });
        }
        if !self.fs.is_dir(&request.source_dir) {
            return Err(ApplicationError::OperationFailed {
                context: format!("source directory: {}", request.source_dir.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not a directory",
                )),
            });
        }
        for name in &self.settings.package.config_files {
            let path = request.config_dir.join(name);
            if !self.fs.exists(&path) {
                return Err(ApplicationError::OperationFailed {
                    context: format!("config file: {}", path.display()),
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "file does not exist",
                    )),
                });
            }
        }
        Ok(())
    }

    fn add_file(
        &self,
        zip: &mut ZipWriter<Cursor<Vec<u8>>>,
        entry: String,
        path: &Path,
        options: FileOptions,
    ) -> ApplicationResult<()> {
        let content = self.fs.read(path).with_path_context("read", path)?;
        debug!("add_file: {} <- {}", entry, path.display());
        zip.start_file(entry.as_str(), options)
            .map_err(|e| archive_err(format!("add {entry}"), e))?;
        zip.write_all(&content)
            .with_path_context("compress", path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        assert_eq!(entry_name("date", Path::new("a/b.py")), "date/a/b.py");
        assert_eq!(entry_name("date", Path::new("main.py")), "date/main.py");
    }
}
