//! Process-wide stores: the per-user session directory and the admin registry.
//!
//! Both are created once at startup and shared behind `Arc`. The directory
//! holds one lock per username, so writes for different users never contend,
//! and the outer map lock is only taken briefly to find or insert an entry.
//! No lock is ever held across a network call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CapfrontError, Result};
use crate::model::{Simulation, UserSummary};
use crate::session::UserSession;

/// A single user's session behind its own lock.
pub type SharedSession = Arc<RwLock<UserSession>>;

/// In-memory mapping from username to [`UserSession`].
///
/// Sessions are never removed; a fresh login overwrites the previous record.
#[derive(Default)]
pub struct SessionDirectory {
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl SessionDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session, replacing any previous record for the same username.
    pub async fn insert(&self, session: UserSession) -> SharedSession {
        let username = session.username.clone();
        let shared = Arc::new(RwLock::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.insert(username, shared.clone());
        shared
    }

    /// Inserts a logged-out placeholder unless the user is already known.
    ///
    /// Returns `true` when a placeholder was created.
    pub async fn ensure_placeholder(&self, username: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(username) {
            return false;
        }
        sessions.insert(
            username.to_string(),
            Arc::new(RwLock::new(UserSession::placeholder(username))),
        );
        true
    }

    /// Gets the shared session for a username.
    pub async fn get(&self, username: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(username).cloned()
    }

    pub async fn contains(&self, username: &str) -> bool {
        self.sessions.read().await.contains_key(username)
    }

    /// All known usernames, sorted.
    pub async fn usernames(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut names: Vec<String> = sessions.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// The bearer token stored for a user, if the user is known and has one.
    pub async fn token(&self, username: &str) -> Option<String> {
        let shared = self.get(username).await?;
        let session = shared.read().await;
        session.has_token().then(|| session.token.clone())
    }

    /// Reads a session through a closure.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUser` if no session exists for `username`.
    pub async fn read<F, R>(&self, username: &str, reader: F) -> Result<R>
    where
        F: FnOnce(&UserSession) -> R,
    {
        let shared = self
            .get(username)
            .await
            .ok_or_else(|| CapfrontError::UnknownUser(username.to_string()))?;
        let session = shared.read().await;
        Ok(reader(&session))
    }

    /// Mutates a session through a closure while holding that user's write lock.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUser` if no session exists for `username`.
    pub async fn update<F, R>(&self, username: &str, updater: F) -> Result<R>
    where
        F: FnOnce(&mut UserSession) -> R,
    {
        let shared = self
            .get(username)
            .await
            .ok_or_else(|| CapfrontError::UnknownUser(username.to_string()))?;
        let mut session = shared.write().await;
        Ok(updater(&mut session))
    }
}

/// Data shared by every user, maintained by the admin identity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryData {
    /// Simulation templates any user may clone.
    pub templates: Vec<Simulation>,
    /// Every user the server knows about, for the admin dashboard.
    pub users: Vec<UserSummary>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Process-wide catalog populated at startup and on admin-triggered refresh.
///
/// Ordinary users only ever read from it.
#[derive(Default)]
pub struct AdminRegistry {
    data: RwLock<RegistryData>,
}

impl AdminRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn templates(&self) -> Vec<Simulation> {
        self.data.read().await.templates.clone()
    }

    pub async fn users(&self) -> Vec<UserSummary> {
        self.data.read().await.users.clone()
    }

    /// A copy of the whole registry.
    pub async fn snapshot(&self) -> RegistryData {
        self.data.read().await.clone()
    }

    pub async fn update<F, R>(&self, updater: F) -> R
    where
        F: FnOnce(&mut RegistryData) -> R,
    {
        let mut data = self.data.write().await;
        updater(&mut data)
    }
}
