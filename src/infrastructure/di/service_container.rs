//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DateService, PackageService, RepoService, ResultListBuilder};
use crate::application::ApplicationResult;
use crate::application::ResultSchema;
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, RealCommandRunner, RealFileSystem, UidGenerator, UuidGenerator,
};

/// Container holding the settings and I/O abstractions services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Identifier source for result items
    pub uid: Arc<dyn UidGenerator>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(UuidGenerator),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        uid: Arc<dyn UidGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            uid,
        }
    }

    /// A fresh, empty result list.
    pub fn result_list(&self) -> ApplicationResult<ResultListBuilder> {
        let schema = ResultSchema::new(Arc::clone(&self.uid))?;
        ResultListBuilder::new(Arc::new(schema))
    }

    pub fn date_service(&self) -> DateService {
        DateService::new(Arc::clone(&self.uid))
    }

    pub fn package_service(&self) -> PackageService {
        PackageService::new(Arc::clone(&self.fs), Arc::clone(&self.settings))
    }

    pub fn repo_service(&self) -> RepoService {
        RepoService::new(Arc::clone(&self.cmd), Arc::clone(&self.settings))
    }
}
