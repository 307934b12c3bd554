//! Workflow repository setup
//!
//! Clones a shared workflow repository and rewrites its history so that a
//! single subdirectory becomes the repository root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::infrastructure::traits::CommandRunner;
use crate::infrastructure::InfraError;

/// Parameters of [`RepoService::setup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    pub user: String,
    pub repo: String,
    pub branch: Option<String>,
    /// Clone target directory (default: repository name).
    pub dir: Option<String>,
    /// Subdirectory to promote to the repository root.
    pub subdirectory: Option<String>,
    /// Directory the clone is created in.
    pub cwd: PathBuf,
}

/// Service driving the version-control tool.
pub struct RepoService {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl RepoService {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Remote URL; `.git` is appended only when missing.
    pub fn clone_url(&self, user: &str, repo: &str) -> String {
        let repo = if repo.ends_with(".git") {
            repo.to_string()
        } else {
            format!("{repo}.git")
        };
        format!(
            "{}/{}/{}",
            self.settings.git.remote_base.trim_end_matches('/'),
            user,
            repo
        )
    }

    /// `git clone <url> [-b branch] [dir]` inside `cwd`.
    pub fn clone_repo(
        &self,
        user: &str,
        repo: &str,
        branch: Option<&str>,
        dir: Option<&str>,
        cwd: &Path,
    ) -> ApplicationResult<()> {
        let url = self.clone_url(user, repo);
        let mut args = vec!["clone", url.as_str()];
        if let Some(branch) = branch {
            args.extend(["-b", branch]);
        }
        if let Some(dir) = dir {
            args.push(dir);
        }
        self.git(cwd, &args).map(|_| ())
    }

    /// `git filter-branch -f --subdirectory-filter <path> HEAD` inside `repo_dir`.
    pub fn filter_subdirectory(&self, path: &str, repo_dir: &Path) -> ApplicationResult<()> {
        self.git(
            repo_dir,
            &["filter-branch", "-f", "--subdirectory-filter", path, "HEAD"],
        )
        .map(|_| ())
    }

    /// Clone, then filter when a subdirectory is requested. Returns the clone directory.
    #[instrument(skip(self))]
    pub fn setup(&self, request: &SetupRequest) -> ApplicationResult<PathBuf> {
        self.clone_repo(
            &request.user,
            &request.repo,
            request.branch.as_deref(),
            request.dir.as_deref(),
            &request.cwd,
        )?;

        let dir_name = request
            .dir
            .clone()
            .unwrap_or_else(|| request.repo.trim_end_matches(".git").to_string());
        let repo_dir = request.cwd.join(dir_name);

        if let Some(subdirectory) = &request.subdirectory {
            self.filter_subdirectory(subdirectory, &repo_dir)?;
        }
        Ok(repo_dir)
    }

    fn git(&self, cwd: &Path, args: &[&str]) -> ApplicationResult<String> {
        let command = &self.settings.git.command;
        info!("call -> {} {} (in {})", command, args.join(" "), cwd.display());

        let output = self
            .cmd
            .run_in(Some(cwd), command, args)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("spawn {command}"),
                source: Box::new(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApplicationError::OperationFailed {
                context: format!("{} {}", command, args.first().copied().unwrap_or_default()),
                source: Box::new(InfraError::Command {
                    command: command.clone(),
                    message: stderr.trim().to_string(),
                    exit_code: output.status.code(),
                }),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("git: stdout={}", stdout.trim());
        Ok(stdout)
    }
}
