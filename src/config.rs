use crate::error::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings shared by every network client for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub winedump: Option<PathBuf>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            winedump: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("addon-repo/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Empty tokens are treated as absent so an unset CI secret does not
    /// produce an invalid `Authorization` header.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()?)
    }

    pub fn github_api_base(&self) -> &str {
        self.github_api_url.trim_end_matches('/')
    }
}
