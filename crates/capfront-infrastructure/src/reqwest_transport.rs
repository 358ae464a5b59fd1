//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use capfront_core::config::ClientConfig;
use capfront_core::error::RemoteError;
use capfront_core::remote::{HttpTransport, Method, RawResponse, RemoteRequest};
use reqwest::Client;
use std::time::Duration;

/// Sends requests with a fixed per-request timeout and user agent.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Builds a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed
    /// (for example when no TLS backend is available).
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    fn unreachable(url: &str, err: reqwest::Error) -> RemoteError {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        RemoteError::Unreachable {
            url: url.to_string(),
            message,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: RemoteRequest) -> Result<RawResponse, RemoteError> {
        let RemoteRequest {
            method,
            url,
            bearer,
            body,
        } = request;

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .timeout(self.timeout);

        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        tracing::debug!("[ReqwestTransport] {} {}", method.as_str(), url);

        let response = builder
            .send()
            .await
            .map_err(|e| Self::unreachable(&url, e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::unreachable(&url, e))?;

        tracing::debug!(
            "[ReqwestTransport] {} {} -> {} ({} bytes)",
            method.as_str(),
            url,
            status,
            bytes.len()
        );

        Ok(RawResponse::new(status, bytes.to_vec()))
    }
}
