//! Connection settings for the GitHub REST API.

use std::fmt;
use std::time::Duration;

/// Public GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for [`crate::GitHubClient`].
#[derive(Clone)]
pub struct GitHubConfig {
    /// REST API base URL. GitHub Enterprise Server uses
    /// `https://<host>/api/v3`; GitHub Actions exposes it as `GITHUB_API_URL`.
    pub api_url: String,
    /// Token with `issues: write` permission.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GitHubConfig {
    /// Creates a config for the public API with a 60 second timeout.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
