//! Simulation lifecycle: cloning templates, deleting simulations and the
//! admin-only server reset.

use capfront_core::error::{CapfrontError, Result};
use capfront_core::model::{CloneResult, RecordId};
use capfront_core::remote::Method;
use capfront_core::session::UserMessage;

use crate::datasets;
use crate::fetcher::SnapshotFetcher;

const CLONE_REFRESH_FAILED: &str =
    "We created this simulation but failed to retrieve all the data from the server";

/// Result of [`SimulationService::clone_template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOutcome {
    pub simulation_id: RecordId,
    pub refreshed: bool,
    pub message: UserMessage,
}

#[derive(Clone)]
pub struct SimulationService {
    fetcher: SnapshotFetcher,
}

impl SimulationService {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self { fetcher }
    }

    /// Asks the server to clone a template for the user, makes the clone the
    /// current simulation and reloads the user's data from scratch.
    ///
    /// # Errors
    ///
    /// Remote failures of the clone call itself, or `Decode` if the server's
    /// reply has no simulation id. A failed refresh is only a warning.
    pub async fn clone_template(
        &self,
        username: &str,
        template_id: RecordId,
    ) -> Result<CloneOutcome> {
        tracing::info!(
            "[SimulationService] Cloning template {} for '{}'",
            template_id,
            username
        );
        let client = self.fetcher.client();

        let path = format!("users/clone/{}", template_id);
        let bytes = client.request(Method::Get, &path, username).await?;
        let result: CloneResult = serde_json::from_slice(&bytes)
            .map_err(|e| CapfrontError::decode("clone", e))?;

        client
            .directory()
            .update(username, |session| {
                session.current_simulation_id = result.simulation_id;
                session.reset_snapshot();
            })
            .await?;
        tracing::debug!(
            "[SimulationService] '{}' now on simulation {} ({})",
            username,
            result.simulation_id,
            result.message
        );

        let refreshed = self.fetcher.refresh(username).await;
        let message = if refreshed {
            UserMessage::info(format!("Created simulation {}", result.simulation_id))
        } else {
            UserMessage::warning(CLONE_REFRESH_FAILED)
        };
        let shown = message.clone();
        client
            .directory()
            .update(username, move |session| session.message = shown)
            .await?;

        Ok(CloneOutcome {
            simulation_id: result.simulation_id,
            refreshed,
            message,
        })
    }

    /// Deletes one of the user's simulations and refreshes.
    ///
    /// Returns whether the refresh completed.
    pub async fn delete_simulation(&self, username: &str, simulation_id: RecordId) -> Result<bool> {
        tracing::info!(
            "[SimulationService] Deleting simulation {} for '{}'",
            simulation_id,
            username
        );
        self.fetcher
            .client()
            .request(
                Method::Get,
                &format!("simulations/delete/{}", simulation_id),
                username,
            )
            .await?;
        Ok(self.fetcher.refresh(username).await)
    }

    /// Resets the whole server. Admin only.
    ///
    /// Returns whether the registry re-fetch completed.
    ///
    /// # Errors
    ///
    /// `Rejected { status: 403 }` for anyone but the configured admin, or the
    /// remote failure of the reset call.
    pub async fn admin_reset(&self, username: &str) -> Result<bool> {
        let client = self.fetcher.client();
        if username != client.config().admin_username {
            tracing::warn!("[SimulationService] '{}' is not allowed to reset", username);
            return Err(CapfrontError::Rejected { status: 403 });
        }

        tracing::info!("[SimulationService] Resetting the server");
        client.request(Method::Get, "action/reset", username).await?;
        Ok(self
            .fetcher
            .fetch_all(username, datasets::ADMIN_DATASETS)
            .await)
    }
}
