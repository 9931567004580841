//! Client configuration.
//!
//! Use the builder methods to customise where and how the backend is
//! reached.
//!
//! ```ignore
//! use mindmap::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("http://mindmap.internal:8000")
//!     .with_request_timeout(Duration::from_secs(600));
//! ```

use std::time::Duration;

use crate::models::DEFAULT_MAX_DEPTH;

/// Default backend address for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Route prefix of the mindmap API.
pub const DEFAULT_API_PREFIX: &str = "/api/v1/mindmap";

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "MINDMAP_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MINDMAP_TIMEOUT_SECS";

/// Configuration for [`crate::client::MindmapClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend (no trailing slash)
    pub base_url: String,
    /// Route prefix appended to the base URL (default: /api/v1/mindmap)
    pub api_prefix: String,
    /// Time allowed to establish a connection (default: 10s)
    pub connect_timeout: Duration,
    /// Time allowed for a whole request including the streamed body
    /// (default: 30 minutes, generation of long documents is slow)
    pub request_timeout: Duration,
    /// Outline depth requested from the document endpoint (default: 3)
    pub max_depth: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(1800),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.clamp(1, 5);
        self
    }

    /// Full URL of an endpoint below the API prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            self.api_prefix,
            path.trim_start_matches('/')
        )
    }

    /// Create config from `MINDMAP_API_URL` and `MINDMAP_TIMEOUT_SECS`.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        match lookup(ENV_TIMEOUT_SECS).map(|s| s.trim().parse::<u64>()) {
            Some(Ok(secs)) => config = config.with_request_timeout(Duration::from_secs(secs)),
            Some(Err(e)) => tracing::warn!("Ignoring invalid {}: {}", ENV_TIMEOUT_SECS, e),
            None => {}
        }
        config
    }
}
