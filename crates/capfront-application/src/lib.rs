//! Application layer for capfront.
//!
//! Coordinates the remote client, the per-user snapshot cache and the admin
//! registry into the operations a web front end calls on each request.

pub mod auth_service;
pub mod bootstrap;
pub mod datasets;
pub mod dispatcher;
pub mod fetcher;
pub mod guard;
pub mod page;
pub mod remote_client;
pub mod simulation_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use bootstrap::{AdminBootstrap, BootstrapReport};
pub use datasets::{DatasetSpec, DatasetTarget};
pub use dispatcher::{ActionDispatcher, ActionOutcome, REDIRECT_STATUS, redirect_target};
pub use fetcher::{DatasetResult, FetchReport, SnapshotFetcher};
pub use guard::{ConsistencyGuard, ReconcileOutcome};
pub use page::{PageContext, current_state};
pub use remote_client::RemoteClient;
pub use simulation_service::{CloneOutcome, SimulationService};

use capfront_core::config::ClientConfig;
use capfront_core::directory::{AdminRegistry, SessionDirectory};
use capfront_core::remote::HttpTransport;
use std::sync::Arc;

/// The process-wide stores and every service built on them.
///
/// Created once at startup; cloning shares the same stores.
#[derive(Clone)]
pub struct CapfrontApp {
    pub directory: Arc<SessionDirectory>,
    pub registry: Arc<AdminRegistry>,
    pub fetcher: SnapshotFetcher,
    pub dispatcher: ActionDispatcher,
    pub guard: ConsistencyGuard,
    pub auth: AuthService,
    pub simulations: SimulationService,
    pub bootstrap: AdminBootstrap,
}

impl CapfrontApp {
    /// Wires every service over one transport. The per-user dataset table
    /// follows `config.split_stock_tables`.
    pub fn new(transport: Arc<dyn HttpTransport>, config: ClientConfig) -> Self {
        let user_datasets = datasets::user_datasets_for(&config);
        let directory = Arc::new(SessionDirectory::new());
        let registry = Arc::new(AdminRegistry::new());
        let client = RemoteClient::new(transport, directory.clone(), Arc::new(config));
        let fetcher = SnapshotFetcher::new(client, registry.clone())
            .with_user_datasets(user_datasets);
        let auth = AuthService::new(fetcher.clone());

        Self {
            dispatcher: ActionDispatcher::new(fetcher.clone()),
            guard: ConsistencyGuard::new(fetcher.clone()),
            simulations: SimulationService::new(fetcher.clone()),
            bootstrap: AdminBootstrap::new(auth.clone(), fetcher.clone()),
            auth,
            fetcher,
            directory,
            registry,
        }
    }

    /// The rendering input for one page.
    pub async fn page(&self, username: &str) -> PageContext {
        PageContext::assemble(&self.directory, &self.registry, username).await
    }
}
