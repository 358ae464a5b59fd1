//! Login, registration and logout against the server's `auth/` endpoints.

use capfront_core::error::{CapfrontError, RemoteError, Result};
use capfront_core::model::{LoginRequest, TokenResponse};
use capfront_core::remote::Method;
use capfront_core::session::{UserMessage, UserSession};

use crate::fetcher::SnapshotFetcher;

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: String,
    /// Whether the initial refresh completed. A failed refresh is a warning
    /// only; the user is logged in either way.
    pub refreshed: bool,
    pub message: UserMessage,
}

/// Credential exchange with the server.
#[derive(Clone)]
pub struct AuthService {
    fetcher: SnapshotFetcher,
}

impl AuthService {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self { fetcher }
    }

    /// Logs a user in, replacing any previous session, and fetches their data.
    ///
    /// # Errors
    ///
    /// `Transport` when the server is unreachable, `AuthExpired` when the
    /// credentials are refused or no token comes back.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        tracing::info!("[AuthService] Logging in '{}'", username);
        let body = credentials(username, password)?;

        let bytes = self
            .fetcher
            .client()
            .request_anonymous(Method::Post, "auth/login", Some(body))
            .await
            .map_err(|e| credentials_error(username, e))?;

        let token = match serde_json::from_slice::<TokenResponse>(&bytes) {
            Ok(response) if !response.token.is_empty() => response.token,
            Ok(_) => return Err(rejected(username, "empty token")),
            Err(e) => return Err(rejected(username, &e.to_string())),
        };

        self.fetcher
            .client()
            .directory()
            .insert(UserSession::logged_in(username, token))
            .await;

        let refreshed = self.fetcher.refresh(username).await;
        if !refreshed {
            tracing::warn!(
                "[AuthService] '{}' logged in but the refresh failed",
                username
            );
        }
        let message = self
            .fetcher
            .client()
            .directory()
            .read(username, |session| session.message.clone())
            .await?;

        Ok(LoginOutcome {
            username: username.to_string(),
            refreshed,
            message,
        })
    }

    /// Registers a new user, then logs them in.
    ///
    /// # Errors
    ///
    /// As [`AuthService::login`]; a refused registration is `Rejected`.
    pub async fn register(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        tracing::info!("[AuthService] Registering '{}'", username);
        let body = credentials(username, password)?;

        self.fetcher
            .client()
            .request_anonymous(Method::Post, "auth/register", Some(body))
            .await
            .map_err(|e| {
                tracing::warn!("[AuthService] Registration of '{}' failed: {}", username, e);
                CapfrontError::from(e)
            })?;

        self.login(username, password).await
    }

    /// Logs a user out. The local session is marked logged out whatever the
    /// server says; the record itself is kept.
    ///
    /// Returns whether the server acknowledged the logout.
    ///
    /// # Errors
    ///
    /// `UnknownUser` if there is no session for `username`.
    pub async fn logout(&self, username: &str) -> Result<bool> {
        let client = self.fetcher.client();
        if !client.directory().contains(username).await {
            return Err(CapfrontError::UnknownUser(username.to_string()));
        }

        let acknowledged = match client.request(Method::Post, "auth/logout", username).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "[AuthService] Server did not confirm logout of '{}': {}",
                    username,
                    e
                );
                false
            }
        };

        client
            .directory()
            .update(username, |session| {
                session.log_out();
                session.message = UserMessage::info("Logged out");
            })
            .await?;

        tracing::info!("[AuthService] '{}' logged out", username);
        Ok(acknowledged)
    }
}

fn credentials(username: &str, password: &str) -> Result<serde_json::Value> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    Ok(serde_json::to_value(request)?)
}

fn rejected(username: &str, reason: &str) -> CapfrontError {
    tracing::warn!(
        "[AuthService] No usable token for '{}': {}",
        username,
        reason
    );
    CapfrontError::AuthExpired(format!("credentials for '{}' were not accepted", username))
}

fn credentials_error(username: &str, err: RemoteError) -> CapfrontError {
    match err {
        RemoteError::Unreachable { .. } => {
            tracing::warn!("[AuthService] Login of '{}' failed: {}", username, err);
            err.into()
        }
        other => rejected(username, &other.to_string()),
    }
}
