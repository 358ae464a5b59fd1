use anyhow::{Context, Result};
use capfront_application::CapfrontApp;
use capfront_core::config::ClientConfig;
use capfront_infrastructure::{ConfigService, ReqwestTransport};
use std::path::Path;
use std::sync::Arc;

pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    service.load()
}

pub fn build_app(config: ClientConfig) -> Result<CapfrontApp> {
    let transport = ReqwestTransport::new(&config).context("Failed to build HTTP client")?;
    Ok(CapfrontApp::new(Arc::new(transport), config))
}
