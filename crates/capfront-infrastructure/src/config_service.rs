//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/capfront/config.toml` and applies
//! environment overrides on top. A missing file yields the defaults.

use anyhow::{Context, Result};
use capfront_core::config::ClientConfig;
use capfront_core::error::CapfrontError;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "CAPFRONT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CAPFRONT_TIMEOUT_SECS";
pub const ENV_ADMIN_USERNAME: &str = "CAPFRONT_ADMIN_USERNAME";
pub const ENV_ADMIN_PASSWORD: &str = "CAPFRONT_ADMIN_PASSWORD";

/// Loads the client configuration from disk and the environment.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default location under the platform config directory.
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Uses an explicit config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `~/.config/capfront/config.toml`, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("capfront").join("config.toml"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the file and applies overrides from the process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads the file and applies overrides from `lookup`.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read. A file that does not parse
    /// or an override with an invalid value is a [`CapfrontError::Config`].
    pub fn load_with<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.path {
            Some(path) => Self::read_file(path)?,
            None => {
                tracing::debug!("[ConfigService] No config directory, using defaults");
                ClientConfig::default()
            }
        };

        Self::apply_overrides(&mut config, lookup)?;
        config.normalize();

        tracing::info!(
            "[ConfigService] API at {}, timeout {}s, admin '{}', admin password: {}",
            config.api_base_url,
            config.timeout_secs,
            config.admin_username,
            if config.admin_password.is_some() {
                "present"
            } else {
                "none"
            }
        );

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] {:?} not found, using defaults", path);
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        let config = toml::from_str(&content).map_err(|e| {
            CapfrontError::config(format!("Failed to parse TOML from {:?}: {}", path, e))
        })?;
        Ok(config)
    }

    fn apply_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs.trim().parse().map_err(|_| {
                let message = format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS);
                CapfrontError::config(message)
            })?;
        }
        if let Some(username) = lookup(ENV_ADMIN_USERNAME) {
            config.admin_username = username;
        }
        if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
            config.admin_password = Some(password);
        }
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        let config = service.load_with(no_env).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_file_values_are_read_and_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"api_base_url = "http://localhost:8000"
timeout_secs = 7
split_stock_tables = true
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load_with(no_env).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/");
        assert_eq!(config.timeout_secs, 7);
        assert!(config.split_stock_tables);
        assert_eq!(config.admin_username, "admin");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "admin_username = \"root\"\n").unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:9000/"),
            (ENV_ADMIN_USERNAME, "boss"),
            (ENV_ADMIN_PASSWORD, "insecure"),
        ]
        .into_iter()
        .collect();

        let config = ConfigService::with_path(&path)
            .load_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.admin_username, "boss");
        assert_eq!(config.admin_password.as_deref(), Some("insecure"));
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        let err = service
            .load_with(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CapfrontError>(),
            Some(CapfrontError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"two\"").unwrap();
        let err = ConfigService::with_path(&path)
            .load_with(no_env)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CapfrontError>(),
            Some(CapfrontError::Config(_))
        ));
    }
}
