use std::time::Duration;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub github_base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            github_base_url: DEFAULT_GITHUB_URL.into(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SKILLSWAP_API_URL` and `GITHUB_API_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: std::env::var("SKILLSWAP_API_URL").unwrap_or(defaults.api_base_url),
            github_base_url: std::env::var("GITHUB_API_URL").unwrap_or(defaults.github_base_url),
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_github_base_url(mut self, url: impl Into<String>) -> Self {
        self.github_base_url = url.into();
        self
    }
}
