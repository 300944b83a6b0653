//! Connection settings for the admin API.

use serde::{Deserialize, Serialize};

/// Where the streaming server lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL of the streaming server (e.g. "http://localhost:8080")
    pub base_url: String,
    /// Admin username for basic auth
    pub username: String,
    /// Admin password (the stream key on a default install)
    pub password: String,
    /// Per-request timeout
    pub request_timeout_seconds: u64,
    /// Release feed used by the upgrade check
    pub release_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            username: "admin".to_string(),
            password: "abc123".to_string(),
            request_timeout_seconds: 10,
            release_url: "https://api.github.com/repos/owncast/owncast/releases/latest"
                .to_string(),
        }
    }
}
