//! Client configuration model.
//!
//! Loading from disk and the environment is done by the infrastructure crate.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://www.datapaedia.org/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;
pub const DEFAULT_USER_AGENT: &str = "Capitalism reader";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_INDEX_PAGE: &str = "/index";

/// Settings for talking to the remote simulation server.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address every relative API path is resolved against.
    pub api_base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub admin_username: String,
    /// Secret; never logged.
    pub admin_password: Option<String>,
    /// Pages a user is sent back to after an action.
    pub display_pages: Vec<String>,
    /// Fallback redirect target.
    pub index_page: String,
    /// Fetch `stocks/industry` and `stocks/class` instead of the unified `stocks/`.
    pub split_stock_tables: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: None,
            display_pages: [
                "/commodities",
                "/industries",
                "/classes",
                "/stocks",
                "/industry_stocks",
                "/class_stocks",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            index_page: DEFAULT_INDEX_PAGE.to_string(),
            split_stock_tables: false,
        }
    }
}

impl ClientConfig {
    /// Resolves a relative API path against the base address.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Ensures the base address ends with exactly one `/`.
    pub fn normalize(&mut self) {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = format!("{}/", trimmed);
    }

    pub fn is_display_page(&self, path: &str) -> bool {
        self.display_pages.iter().any(|page| page == path)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .field("display_pages", &self.display_pages)
            .field("index_page", &self.index_page)
            .field("split_stock_tables", &self.split_stock_tables)
            .finish()
    }
}
