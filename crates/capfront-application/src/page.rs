//! Per-page input for the rendering collaborator.

use capfront_core::directory::{AdminRegistry, SessionDirectory};
use capfront_core::model::{DisplayOption, RecordId, Simulation};
use capfront_core::session::UserMessage;
use capfront_core::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NO_KNOWN_USER: &str = "NO KNOWN USER";
pub const NO_SIMULATION_YET: &str = "NO SIMULATION YET";
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// The advisory state label shown in page headers.
pub async fn current_state(directory: &SessionDirectory, username: &str) -> String {
    directory
        .read(username, |session| {
            state_label(&session.snapshot, session.current_simulation_id)
        })
        .await
        .unwrap_or_else(|_| NO_KNOWN_USER.to_string())
}

fn state_label(snapshot: &Snapshot, current: RecordId) -> String {
    if snapshot.simulations.is_empty() {
        return NO_SIMULATION_YET.to_string();
    }
    snapshot
        .simulations
        .iter()
        .find(|sim| sim.id == current)
        .map(|sim| sim.state.clone())
        .unwrap_or_else(|| UNKNOWN_STATE.to_string())
}

/// Everything a page needs, copied out of the stores.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub username: String,
    pub logged_in: bool,
    pub state: String,
    pub current_simulation_id: RecordId,
    pub display_option: DisplayOption,
    pub message: UserMessage,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub snapshot: Snapshot,
    pub templates: Vec<Simulation>,
}

impl PageContext {
    /// Copies out the user's view and consumes their pending message.
    ///
    /// An unknown user gets an empty, logged-out context.
    pub async fn assemble(
        directory: &SessionDirectory,
        registry: &AdminRegistry,
        username: &str,
    ) -> Self {
        let templates = registry.templates().await;
        let known = directory
            .update(username, |session| Self {
                username: session.username.clone(),
                logged_in: session.logged_in,
                state: state_label(&session.snapshot, session.current_simulation_id),
                current_simulation_id: session.current_simulation_id,
                display_option: session.display_option,
                message: std::mem::take(&mut session.message),
                last_synced_at: session.last_synced_at,
                snapshot: session.snapshot.clone(),
                templates: Vec::new(),
            })
            .await;

        match known {
            Ok(context) => Self {
                templates,
                ..context
            },
            Err(_) => Self {
                username: username.to_string(),
                logged_in: false,
                state: NO_KNOWN_USER.to_string(),
                current_simulation_id: 0,
                display_option: DisplayOption::default(),
                message: UserMessage::default(),
                last_synced_at: None,
                snapshot: Snapshot::new(),
                templates,
            },
        }
    }

    /// The current simulation, or the not-found sentinel.
    pub fn simulation(&self) -> &Simulation {
        self.snapshot.simulation(self.current_simulation_id)
    }
}
