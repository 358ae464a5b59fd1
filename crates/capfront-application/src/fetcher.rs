//! Batch refresh of cached datasets.

use capfront_core::directory::AdminRegistry;
use capfront_core::error::RemoteError;
use capfront_core::remote::Method;
use capfront_core::session::UserMessage;
use chrono::Utc;
use std::sync::Arc;

use crate::datasets::{self, DatasetSpec, DatasetTarget};
use crate::remote_client::RemoteClient;

pub const REFRESH_COMPLETE: &str = "Data refresh complete";
pub const REFRESH_FAILED: &str =
    "Cannot refresh from remote server; displaying existing stored data";

/// What happened to one dataset in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetResult {
    /// Decoded and swapped in; carries the record count.
    Applied(usize),
    /// The payload did not decode; previous contents kept.
    DecodeFailed(String),
    /// The server answered with a non-200 status; previous contents kept.
    Rejected(u16),
}

impl DatasetResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Per-dataset outcome of a batch, in request order.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub results: Vec<(&'static str, DatasetResult)>,
    /// Set when the batch stopped early; no later dataset was requested.
    pub stopped: Option<RemoteError>,
}

impl FetchReport {
    /// True only if the batch ran to the end and every dataset decoded.
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none() && self.results.iter().all(|(_, r)| r.is_applied())
    }

    pub fn stopped_early(&self) -> bool {
        self.stopped.is_some()
    }

    pub fn auth_expired(&self) -> bool {
        matches!(&self.stopped, Some(e) if e.is_auth_expired())
    }

    fn record(&mut self, name: &'static str, result: DatasetResult) {
        self.results.push((name, result));
    }

    pub fn result(&self, name: &str) -> Option<&DatasetResult> {
        self.results
            .iter()
            .find(|(dataset, _)| *dataset == name)
            .map(|(_, result)| result)
    }
}

/// Fetches dataset tables into user snapshots and the admin registry.
///
/// One network call per dataset, strictly in table order. Locks are taken
/// only to swap decoded data in, never across a network call.
#[derive(Clone)]
pub struct SnapshotFetcher {
    client: RemoteClient,
    registry: Arc<AdminRegistry>,
    user_datasets: &'static [DatasetSpec],
}

impl SnapshotFetcher {
    pub fn new(client: RemoteClient, registry: Arc<AdminRegistry>) -> Self {
        Self {
            client,
            registry,
            user_datasets: datasets::USER_DATASETS,
        }
    }

    /// Uses a different per-user table, e.g. the split stock variant.
    pub fn with_user_datasets(mut self, user_datasets: &'static [DatasetSpec]) -> Self {
        self.user_datasets = user_datasets;
        self
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn registry(&self) -> &Arc<AdminRegistry> {
        &self.registry
    }

    pub fn user_datasets(&self) -> &'static [DatasetSpec] {
        self.user_datasets
    }

    /// Runs a batch and returns `true` only if every dataset decoded.
    pub async fn fetch_all(&self, username: &str, datasets: &[DatasetSpec]) -> bool {
        self.fetch_all_report(username, datasets)
            .await
            .is_complete()
    }

    /// Refreshes the user's own snapshot with the configured table.
    pub async fn refresh(&self, username: &str) -> bool {
        self.fetch_all(username, self.user_datasets).await
    }

    pub async fn refresh_report(&self, username: &str) -> FetchReport {
        self.fetch_all_report(username, self.user_datasets).await
    }

    /// Runs a batch, then records the outcome on the user's session.
    ///
    /// Sets the pending user message and, on a complete batch, the sync
    /// timestamp.
    pub async fn fetch_all_report(&self, username: &str, datasets: &[DatasetSpec]) -> FetchReport {
        let report = self.fetch_batch(username, datasets).await;
        let complete = report.is_complete();

        if complete {
            tracing::info!("[SnapshotFetcher] {} for '{}'", REFRESH_COMPLETE, username);
        } else {
            tracing::warn!(
                "[SnapshotFetcher] Incomplete refresh for '{}': {:?}",
                username,
                report
            );
        }

        let recorded = self
            .client
            .directory()
            .update(username, |session| {
                if complete {
                    session.message = UserMessage::info(REFRESH_COMPLETE);
                    session.last_synced_at = Some(Utc::now());
                } else {
                    session.message = UserMessage::warning(REFRESH_FAILED);
                }
            })
            .await;
        if let Err(e) = recorded {
            tracing::debug!("[SnapshotFetcher] Outcome not recorded: {}", e);
        }

        report
    }

    /// Fetches a single named dataset.
    pub async fn fetch_one(&self, username: &str, name: &str) -> bool {
        match datasets::by_name(name) {
            Some(dataset) => self.fetch_batch(username, &[dataset]).await.is_complete(),
            None => {
                tracing::warn!("[SnapshotFetcher] Unknown dataset '{}'", name);
                false
            }
        }
    }

    /// Requests each dataset in order and applies it.
    ///
    /// Decode failures and rejections are recorded and the batch moves on.
    /// Auth, connectivity and unknown-user failures stop the batch; datasets
    /// applied before the stop stay applied.
    pub async fn fetch_batch(&self, username: &str, datasets: &[DatasetSpec]) -> FetchReport {
        let client = &self.client;
        let mut report = FetchReport::default();

        for dataset in datasets {
            let bytes = match client.request(Method::Get, dataset.path, username).await {
                Ok(bytes) => bytes,
                Err(e) if !e.stops_batch() => {
                    if let RemoteError::Rejected { status, .. } = e {
                        report.record(dataset.name, DatasetResult::Rejected(status));
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        "[SnapshotFetcher] Stopping batch for '{}' at '{}' ({}): {}",
                        username,
                        dataset.name,
                        dataset.path,
                        e
                    );
                    report.stopped = Some(e);
                    break;
                }
            };

            match self.apply(username, dataset, &bytes).await {
                Ok(Ok(count)) => {
                    tracing::debug!(
                        "[SnapshotFetcher] Refreshed '{}' for '{}' from {} ({} records)",
                        dataset.name,
                        username,
                        dataset.path,
                        count
                    );
                    report.record(dataset.name, DatasetResult::Applied(count));
                }
                Ok(Err(decode_err)) => {
                    tracing::warn!(
                        "[SnapshotFetcher] Failed to decode '{}' for '{}' from {}: {}",
                        dataset.name,
                        username,
                        dataset.path,
                        decode_err
                    );
                    let failed = DatasetResult::DecodeFailed(decode_err.to_string());
                    report.record(dataset.name, failed);
                }
                Err(stop) => {
                    report.stopped = Some(stop);
                    break;
                }
            }
        }

        report
    }

    async fn apply(
        &self,
        username: &str,
        dataset: &DatasetSpec,
        bytes: &[u8],
    ) -> Result<serde_json::Result<usize>, RemoteError> {
        match dataset.target {
            DatasetTarget::Snapshot(decode) => self
                .client
                .directory()
                .update(username, |session| decode(bytes, &mut session.snapshot))
                .await
                .map_err(|_| RemoteError::UnknownUser {
                    username: username.to_string(),
                }),
            DatasetTarget::Registry(decode) => Ok(self
                .registry
                .update(|data| {
                    let decoded = decode(bytes, data);
                    if decoded.is_ok() {
                        data.refreshed_at = Some(Utc::now());
                    }
                    decoded
                })
                .await),
        }
    }
}
