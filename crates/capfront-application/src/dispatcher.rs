//! Sends circuit actions to the server and resynchronizes afterward.

use capfront_core::circuit::{ActionVerb, SimulationState};
use capfront_core::config::ClientConfig;
use capfront_core::error::{RemoteError, Result};
use capfront_core::remote::Method;
use capfront_core::session::UserMessage;

use crate::fetcher::SnapshotFetcher;

/// Status code used for every post-action redirect.
pub const REDIRECT_STATUS: u16 = 302;

const SEND_FAILED: &str = "The server could not complete the action";
const REFRESH_FAILED: &str = "The server completed the action but did not send back any data";
const LOGIN_AGAIN: &str = "Your login has expired. Please log in again";

/// Chooses where to send the user after an action.
///
/// Returns `last_visited` when it is a display page, otherwise the index.
pub fn redirect_target(last_visited: &str, config: &ClientConfig) -> String {
    if config.is_display_page(last_visited) {
        last_visited.to_string()
    } else {
        config.index_page.clone()
    }
}

/// Result of [`ActionDispatcher::perform_action`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// The verb as requested.
    pub verb: String,
    /// Local advisory state of the current simulation afterward. `None` when
    /// the current simulation is not in the cache.
    pub state: Option<SimulationState>,
    pub message: UserMessage,
    /// Whether the server accepted the action.
    pub sent: bool,
    /// Whether the follow-up refresh completed.
    pub refreshed: bool,
    /// The caller should send the user back to login.
    pub auth_expired: bool,
    pub redirect: String,
}

impl ActionOutcome {
    pub fn redirect_status(&self) -> u16 {
        REDIRECT_STATUS
    }

    /// Both the send and the refresh succeeded.
    pub fn succeeded(&self) -> bool {
        self.sent && self.refreshed
    }
}

/// Sequences an action with its confirmatory refresh.
#[derive(Clone)]
pub struct ActionDispatcher {
    fetcher: SnapshotFetcher,
}

impl ActionDispatcher {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self { fetcher }
    }

    /// Sends `action/{verb}`, refreshes regardless of the send outcome, then
    /// advances the advisory state of the user's current simulation.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUser` if the user has no session. Every remote failure
    /// is reported through the outcome instead.
    pub async fn perform_action(&self, username: &str, verb: &str) -> Result<ActionOutcome> {
        let directory = self.fetcher.client().directory();
        let (current_id, observed, last_visited) = directory
            .read(username, |session| {
                let observed = session
                    .snapshot
                    .simulations
                    .iter()
                    .find(|sim| sim.id == session.current_simulation_id)
                    .map(|sim| sim.stage());
                (
                    session.current_simulation_id,
                    observed,
                    session.last_visited_path.clone(),
                )
            })
            .await?;

        let parsed = verb.parse::<ActionVerb>();
        let normalized = verb.trim().to_ascii_lowercase();
        tracing::info!(
            "[ActionDispatcher] '{}' requests action '{}' on simulation {} (last page {})",
            username,
            normalized,
            current_id,
            last_visited
        );

        let send_result = if is_path_safe(&normalized) {
            self.fetcher
                .client()
                .request(Method::Get, &format!("action/{}", normalized), username)
                .await
                .map(|_| ())
        } else {
            Err(RemoteError::Rejected {
                status: 400,
                body: String::new(),
            })
        };
        let sent = send_result.is_ok();
        if let Err(e) = &send_result {
            tracing::warn!(
                "[ActionDispatcher] Action '{}' for '{}' failed: {}",
                normalized,
                username,
                e
            );
        }

        let report = self.fetcher.refresh_report(username).await;
        let refreshed = report.is_complete();
        let send_auth_expired = matches!(&send_result, Err(e) if e.is_auth_expired());
        let auth_expired = report.auth_expired() || send_auth_expired;

        let target = match &parsed {
            Ok(action) if sent && refreshed => Some(advance(observed, *action)),
            Ok(_) => None,
            Err(_) => Some(SimulationState::Unknown),
        };

        let message = if auth_expired {
            UserMessage::error(LOGIN_AGAIN)
        } else if !sent {
            UserMessage::warning(SEND_FAILED)
        } else if !refreshed {
            UserMessage::warning(REFRESH_FAILED)
        } else {
            match &parsed {
                Ok(action) => UserMessage::info(action.confirmation()),
                Err(e) => UserMessage::warning(e.clone()),
            }
        };

        let applied_message = message.clone();
        let state = directory
            .update(username, move |session| {
                session.message = applied_message;
                let id = session.current_simulation_id;
                match session.snapshot.simulation_mut(id) {
                    Some(sim) => {
                        if let Some(next) = target {
                            sim.set_stage(next);
                        }
                        Some(sim.stage())
                    }
                    None => {
                        tracing::warn!(
                            "[ActionDispatcher] Simulation {} not found for '{}'",
                            id,
                            username
                        );
                        None
                    }
                }
            })
            .await?;

        let redirect = redirect_target(&last_visited, self.fetcher.client().config());
        tracing::debug!(
            "[ActionDispatcher] '{}' -> state {:?}, redirect {} {}",
            username,
            state,
            REDIRECT_STATUS,
            redirect
        );

        Ok(ActionOutcome {
            verb: verb.to_string(),
            state,
            message,
            sent,
            refreshed,
            auth_expired,
            redirect,
        })
    }
}

/// The stage after a successful action. Falls back to the stage after the
/// verb's own when the observed label is not a circuit stage.
fn advance(observed: Option<SimulationState>, action: ActionVerb) -> SimulationState {
    match observed {
        Some(stage) if stage.is_circuit_stage() => stage.next(),
        _ => action.stage().next(),
    }
}

fn is_path_safe(verb: &str) -> bool {
    !verb.is_empty() && verb.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
