//! Service container for dependency injection
//!
//! Wires the seed service to a filesystem and opens ledger sessions from the
//! effective settings.

use std::sync::Arc;

use tracing::debug;

use crate::application::{LedgerSession, SeedService};
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn seed_service(&self) -> SeedService {
        SeedService::new(Arc::clone(&self.fs))
    }

    /// Open a session on the configured seed (demo data when none is set).
    pub fn open_session(&self) -> InfraResult<LedgerSession> {
        let source = self.settings.seed_file.as_deref();
        debug!("open_session: seed={:?}", source);
        let forest = self.seed_service().load_forest(source)?;
        Ok(LedgerSession::new(forest))
    }
}
