//! Payloads exchanged with the server's `auth/` and `users/` endpoints.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Body of `auth/login` and `auth/register`.
///
/// The password is forwarded to the server untouched; hashing is the server's job.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Abbreviated user details from `users/{username}`.
///
/// This is the server's authoritative view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerUserStatus {
    pub username: String,
    pub is_superuser: bool,
    pub current_simulation: RecordId,
    pub id: RecordId,
    pub is_logged_in: bool,
}

/// One row of the admin's user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserSummary {
    pub id: RecordId,
    pub username: String,
    pub is_superuser: bool,
    pub current_simulation: RecordId,
    pub is_logged_in: bool,
}

/// Response of `users/clone/{template_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneResult {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "simulation")]
    pub simulation_id: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            username: "alan".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{:?}", request);
        assert!(printed.contains("alan"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_clone_result_decodes() {
        let result: CloneResult =
            serde_json::from_str(r#"{"message": "ok", "simulation": 12}"#).unwrap();
        assert_eq!(result.simulation_id, 12);
    }

    #[test]
    fn test_server_status_decodes() {
        let status: ServerUserStatus = serde_json::from_str(
            r#"{"username": "alan", "current_simulation": 7, "is_logged_in": true}"#,
        )
        .unwrap();
        assert!(status.is_logged_in);
        assert_eq!(status.current_simulation, 7);
    }
}
