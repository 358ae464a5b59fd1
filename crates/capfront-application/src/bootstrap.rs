//! Startup sequence: log the admin identity in and populate the registry.

use capfront_core::error::{CapfrontError, Result};

use crate::auth_service::AuthService;
use crate::datasets;
use crate::fetcher::SnapshotFetcher;

/// What the bootstrap achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub admin: String,
    pub templates: usize,
    pub users: usize,
    /// Logged-out placeholder sessions created for directory users.
    pub placeholders: usize,
    /// Whether both registry datasets were fetched.
    pub registry_complete: bool,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    auth: AuthService,
    fetcher: SnapshotFetcher,
}

impl AdminBootstrap {
    pub fn new(auth: AuthService, fetcher: SnapshotFetcher) -> Self {
        Self { auth, fetcher }
    }

    /// Logs the admin in, fetches templates and the user directory, then
    /// seeds a placeholder session for every user not yet known.
    ///
    /// # Errors
    ///
    /// `Config` when no admin password is configured; any admin login
    /// failure is returned as is. A failed registry fetch is reported, not
    /// raised.
    pub async fn run(&self) -> Result<BootstrapReport> {
        let config = self.fetcher.client().config();
        let admin = config.admin_username.clone();
        let password = config
            .admin_password
            .clone()
            .ok_or_else(|| CapfrontError::config("admin password is not configured"))?;

        tracing::info!("[AdminBootstrap] Logging in admin '{}'", admin);
        self.auth.login(&admin, &password).await?;

        let registry_complete = self
            .fetcher
            .fetch_all(&admin, datasets::ADMIN_DATASETS)
            .await;
        if !registry_complete {
            tracing::warn!("[AdminBootstrap] Registry fetch incomplete");
        }

        let registry = self.fetcher.registry().snapshot().await;
        let directory = self.fetcher.client().directory();
        let mut placeholders = 0;
        for user in &registry.users {
            if directory.ensure_placeholder(&user.username).await {
                placeholders += 1;
            }
        }

        tracing::info!(
            "[AdminBootstrap] {} templates, {} users, {} placeholder sessions",
            registry.templates.len(),
            registry.users.len(),
            placeholders
        );

        Ok(BootstrapReport {
            admin,
            templates: registry.templates.len(),
            users: registry.users.len(),
            placeholders,
            registry_complete,
        })
    }
}
