//! Per-request reconciliation of the local cache with the server's view.

use capfront_core::model::ServerUserStatus;
use capfront_core::remote::Method;

use crate::fetcher::SnapshotFetcher;

/// Outcome of [`ConsistencyGuard::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The cache may be trusted for this request.
    Ok {
        /// A staleness refresh ran before returning.
        refreshed: bool,
    },
    /// The server says the user is not logged in.
    NotLoggedIn,
    /// The server's view could not be obtained or applied; treat as logged out.
    CannotVerify,
}

impl ReconcileOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// The single authority on whether a user's cache is fresh enough to render.
#[derive(Clone)]
pub struct ConsistencyGuard {
    fetcher: SnapshotFetcher,
}

impl ConsistencyGuard {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self { fetcher }
    }

    /// Reconciles a user's session before a page is served.
    ///
    /// # Arguments
    ///
    /// * `username` - The user named by the inbound identity cookie
    /// * `request_path` - Path of the page being served
    ///
    /// # Returns
    ///
    /// `(true, Ok)` when the cache may be used. Every other outcome is paired
    /// with `false` and the caller should redirect to login.
    pub async fn reconcile(&self, username: &str, request_path: &str) -> (bool, ReconcileOutcome) {
        let client = self.fetcher.client();

        let status = match client
            .request(Method::Get, &format!("users/{}", username), username)
            .await
        {
            Ok(bytes) => match serde_json::from_slice::<ServerUserStatus>(&bytes) {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(
                        "[ConsistencyGuard] Could not decode server status for '{}': {}",
                        username,
                        e
                    );
                    return (false, ReconcileOutcome::CannotVerify);
                }
            },
            Err(e) => {
                tracing::warn!(
                    "[ConsistencyGuard] Could not query server status for '{}': {}",
                    username,
                    e
                );
                return (false, ReconcileOutcome::CannotVerify);
            }
        };

        if !status.is_logged_in {
            tracing::info!(
                "[ConsistencyGuard] Server says '{}' is not logged in",
                username
            );
            return (false, ReconcileOutcome::NotLoggedIn);
        }

        let directory = client.directory();
        let local = match directory
            .read(username, |session| session.current_simulation_id)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("[ConsistencyGuard] {}", e);
                return (false, ReconcileOutcome::CannotVerify);
            }
        };

        let mut refreshed = false;
        if local != status.current_simulation {
            tracing::info!(
                "[ConsistencyGuard] Out of sync for '{}': server simulation {}, cached {}",
                username,
                status.current_simulation,
                local
            );
            let report = self.fetcher.refresh_report(username).await;
            if report.stopped_early() {
                tracing::warn!(
                    "[ConsistencyGuard] Staleness refresh for '{}' stopped early; failing closed",
                    username
                );
                return (false, ReconcileOutcome::CannotVerify);
            }
            refreshed = true;
        }

        let path = request_path.to_string();
        let server_simulation = status.current_simulation;
        let recorded = directory
            .update(username, move |session| {
                session.current_simulation_id = server_simulation;
                session.last_visited_path = path;
            })
            .await;
        if recorded.is_err() {
            return (false, ReconcileOutcome::CannotVerify);
        }

        (true, ReconcileOutcome::Ok { refreshed })
    }
}
