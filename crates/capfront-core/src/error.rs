//! Error types for the capfront client.

use serde::Serialize;
use thiserror::Error;

/// Footer appended to every message shown to a user.
pub const CONTACT_FOOTER: &str =
    "If this keeps happening, please contact the developer and describe what you were doing.";

/// Failure classification for a single call to the remote server.
///
/// Produced by the transport and by the remote client; callers branch on the
/// variant to decide between "try later", "log in again" and "show stale data".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Timeout, refused connection or any other transport failure.
    #[error("server unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The server answered with a non-200 status.
    #[error("server rejected the request with status {status}")]
    Rejected { status: u16, body: String },

    /// The token was missing, rejected or expired.
    #[error("authentication expired: {reason}")]
    AuthExpired { reason: String },

    /// No local session exists for the caller, so no token can be attached.
    #[error("no session is known for user '{username}'")]
    UnknownUser { username: String },
}

impl RemoteError {
    /// Whether every further call in the same batch would fail the same way.
    pub fn stops_batch(&self) -> bool {
        matches!(
            self,
            Self::Unreachable { .. } | Self::AuthExpired { .. } | Self::UnknownUser { .. }
        )
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

/// A shared error type for the whole client.
#[derive(Error, Debug, Clone, Serialize)]
pub enum CapfrontError {
    /// The remote server could not be reached.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The user's credential is no longer accepted.
    #[error("Authentication expired: {0}")]
    AuthExpired(String),

    /// A response body did not have the expected shape.
    #[error("Decode failure for {dataset}: {message}")]
    Decode { dataset: String, message: String },

    /// The server answered with a non-200 status.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16 },

    /// The username has no session in the directory.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CapfrontError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Decode error for the named dataset
    pub fn decode(dataset: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            dataset: dataset.into(),
            message: message.to_string(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Maps this error onto the fixed catalog of user-facing excuses.
    pub fn apology(&self) -> Apology {
        match self {
            Self::Transport(_) => Apology::ServerDown,
            Self::AuthExpired(_) => Apology::CredentialsRejected,
            Self::Decode { .. } => Apology::Unparseable,
            Self::Rejected { status } if *status == 401 || *status == 403 => {
                Apology::CredentialsRejected
            }
            Self::Rejected { .. } => Apology::CommsFailure,
            Self::UnknownUser(_) | Self::Config(_) => Apology::ClientBug,
        }
    }

    /// Builds the message shown to the user. Never contains a raw payload.
    pub fn user_facing(&self) -> UserFacingError {
        UserFacingError::new(self.apology().message())
    }
}

impl From<RemoteError> for CapfrontError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unreachable { url, message } => {
                Self::Transport(format!("{} ({})", message, url))
            }
            RemoteError::Rejected { status, .. } => Self::Rejected { status },
            RemoteError::AuthExpired { reason } => Self::AuthExpired(reason),
            RemoteError::UnknownUser { username } => Self::UnknownUser(username),
        }
    }
}

impl From<serde_json::Error> for CapfrontError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("JSON", err)
    }
}

/// Small fixed catalog of excuses shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apology {
    ClientBug,
    ServerDown,
    CredentialsRejected,
    Unparseable,
    CommsFailure,
}

impl Apology {
    pub fn message(self) -> &'static str {
        match self {
            Apology::ClientBug => "Sorry, something went wrong inside this client.",
            Apology::ServerDown => {
                "Sorry, the simulation server is not responding. Please try again later."
            }
            Apology::CredentialsRejected => {
                "Sorry, the server did not accept your credentials. Please log in again."
            }
            Apology::Unparseable => "Sorry, the server sent something we could not understand.",
            Apology::CommsFailure => "Sorry, we had trouble talking to the simulation server.",
        }
    }
}

/// A short human-readable message plus the fixed contact footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFacingError {
    pub message: String,
    pub footer: &'static str,
}

impl UserFacingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            footer: CONTACT_FOOTER,
        }
    }
}

impl std::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.footer)
    }
}

/// A type alias for `Result<T, CapfrontError>`.
pub type Result<T> = std::result::Result<T, CapfrontError>;
