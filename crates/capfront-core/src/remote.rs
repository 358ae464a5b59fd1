//! Transport seam between the synchronization core and the HTTP stack.
//!
//! The core never talks to an HTTP library directly. It builds a
//! [`RemoteRequest`] and hands it to an [`HttpTransport`]; the reqwest-backed
//! implementation lives in the infrastructure crate and tests substitute a
//! scripted one.

use async_trait::async_trait;

use crate::error::RemoteError;

/// HTTP verbs the remote API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    /// Absolute URL (base address already applied).
    pub url: String,
    /// Bearer credential, if the call is authenticated.
    pub bearer: Option<String>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl RemoteRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            bearer: None,
            body: None,
        }
    }
}

/// What came back over the wire, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and returns the raw status and body.
///
/// Implementations must enforce their own timeout and report timeouts and
/// connection failures as [`RemoteError::Unreachable`]. Status codes are not
/// interpreted here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> Result<RawResponse, RemoteError>;
}
