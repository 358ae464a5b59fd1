//! Authenticated request wrapper around the HTTP transport.
//!
//! Resolves relative paths against the configured base address, attaches the
//! caller's bearer token and classifies every response into bytes or a
//! [`RemoteError`]. Decoding is left to the caller.

use capfront_core::config::ClientConfig;
use capfront_core::directory::SessionDirectory;
use capfront_core::error::RemoteError;
use capfront_core::remote::{HttpTransport, Method, RawResponse, RemoteRequest};
use serde::Deserialize;
use std::sync::Arc;

/// Sentinel `detail` values the server returns instead of data when the
/// bearer token is missing or stale.
const AUTH_SENTINELS: [&str; 2] = ["Not authenticated", "Signature has expired"];

#[derive(Deserialize)]
struct DetailBody {
    detail: String,
}

/// Classifies a raw response.
///
/// An auth sentinel body or a 401 becomes `AuthExpired`, any other non-200
/// becomes `Rejected`, and a 200 yields the body bytes.
pub fn classify(response: RawResponse) -> Result<Vec<u8>, RemoteError> {
    if let Ok(DetailBody { detail }) = serde_json::from_slice::<DetailBody>(&response.body) {
        if AUTH_SENTINELS.contains(&detail.as_str()) {
            return Err(RemoteError::AuthExpired { reason: detail });
        }
    }

    match response.status {
        200 => Ok(response.body),
        401 => Err(RemoteError::AuthExpired {
            reason: "server answered 401 Unauthorized".to_string(),
        }),
        status => Err(RemoteError::Rejected {
            status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }),
    }
}

/// Issues requests on behalf of users known to the [`SessionDirectory`].
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn HttpTransport>,
    directory: Arc<SessionDirectory>,
    config: Arc<ClientConfig>,
}

impl RemoteClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        directory: Arc<SessionDirectory>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            transport,
            directory,
            config,
        }
    }

    pub fn directory(&self) -> &Arc<SessionDirectory> {
        &self.directory
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends an authenticated request on behalf of `username`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        username: &str,
    ) -> Result<Vec<u8>, RemoteError> {
        let token = self.token_for(username).await?;
        let request = RemoteRequest {
            method,
            url: self.config.url_for(path),
            bearer: Some(token),
            body: None,
        };
        self.dispatch(request, Some(username)).await
    }

    /// Sends a request without credentials, used for login and registration.
    pub async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, RemoteError> {
        let request = RemoteRequest {
            method,
            url: self.config.url_for(path),
            bearer: None,
            body,
        };
        self.dispatch(request, None).await
    }

    async fn token_for(&self, username: &str) -> Result<String, RemoteError> {
        if !self.directory.contains(username).await {
            tracing::warn!("[RemoteClient] No session for user '{}'", username);
            return Err(RemoteError::UnknownUser {
                username: username.to_string(),
            });
        }
        self.directory
            .token(username)
            .await
            .ok_or_else(|| RemoteError::AuthExpired {
                reason: format!("user '{}' has no token", username),
            })
    }

    async fn dispatch(
        &self,
        request: RemoteRequest,
        username: Option<&str>,
    ) -> Result<Vec<u8>, RemoteError> {
        let method = request.method;
        let url = request.url.clone();
        let who = username.unwrap_or("<anonymous>");

        let result = self.transport.send(request).await.and_then(classify);

        match &result {
            Ok(bytes) => tracing::debug!(
                "[RemoteClient] {} {} for '{}' ok ({} bytes)",
                method.as_str(),
                url,
                who,
                bytes.len()
            ),
            Err(RemoteError::Rejected { status, .. }) => tracing::warn!(
                "[RemoteClient] {} {} for '{}' rejected with status {}",
                method.as_str(),
                url,
                who,
                status
            ),
            Err(e) => tracing::warn!(
                "[RemoteClient] {} {} for '{}' failed: {}",
                method.as_str(),
                url,
                who,
                e
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_body_is_auth_expired_even_with_200() {
        let expired = RawResponse::new(200, r#"{"detail":"Signature has expired"}"#);
        assert!(classify(expired).unwrap_err().is_auth_expired());

        let missing = RawResponse::new(403, r#"{"detail": "Not authenticated"}"#);
        assert!(classify(missing).unwrap_err().is_auth_expired());
    }

    #[test]
    fn test_unauthorized_status_is_auth_expired() {
        let err = classify(RawResponse::new(401, "nope")).unwrap_err();
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_other_detail_is_rejected() {
        let response = RawResponse::new(404, r#"{"detail":"Not Found"}"#);
        let err = classify(response).unwrap_err();
        assert!(matches!(err, RemoteError::Rejected { status: 404, .. }));
    }

    #[test]
    fn test_success_returns_body() {
        let bytes = classify(RawResponse::new(200, "[]")).unwrap();
        assert_eq!(bytes, b"[]");
    }
}
