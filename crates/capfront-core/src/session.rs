//! Per-user session record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::UserFacingError;
use crate::model::{DisplayOption, RecordId};
use crate::snapshot::Snapshot;

/// Severity of the message a page should show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Error,
}

/// A message waiting to be displayed to the user by the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UserMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    /// A warning carrying the contact footer.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            text: UserFacingError::new(text).to_string(),
        }
    }

    /// An error carrying the contact footer.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: UserFacingError::new(text).to_string(),
        }
    }

}

/// Everything the client remembers about one authenticated username.
///
/// The snapshot is always present; an unfetched or newly registered user
/// simply has empty datasets.
#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub username: String,
    /// Opaque bearer credential. Never serialized.
    #[serde(skip)]
    pub token: String,
    pub logged_in: bool,
    /// Mirror of the server's current simulation for this user.
    pub current_simulation_id: RecordId,
    /// Path of the last page served, used to redirect after an action.
    pub last_visited_path: String,
    pub display_option: DisplayOption,
    pub message: UserMessage,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub snapshot: Snapshot,
}

impl UserSession {
    /// A session that has just been authenticated with `token`.
    pub fn logged_in(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            logged_in: true,
            ..Self::placeholder(username)
        }
    }

    /// A known user who has not logged in through this process yet.
    pub fn placeholder(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: String::new(),
            logged_in: false,
            current_simulation_id: 0,
            last_visited_path: String::new(),
            display_option: DisplayOption::default(),
            message: UserMessage::default(),
            last_synced_at: None,
            snapshot: Snapshot::new(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Marks the session logged out and forgets the credential.
    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.token.clear();
    }

    /// Forgets all cached data, for example after switching to a new simulation.
    pub fn reset_snapshot(&mut self) {
        self.snapshot.clear();
        self.last_synced_at = None;
    }
}
