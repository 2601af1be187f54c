//! Client configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Catalog client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin (e.g., "http://localhost:8080").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of the catalog API, prepended to every request path.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Bearer token sent with every request.
    /// WARNING: Prefer supplying this programmatically over storing it in a file.
    #[serde(default)]
    pub token: Option<String>,
    /// Client-side cache behavior.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Query cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Age in seconds after which a cached read is treated as stale.
    /// When unset, entries stay fresh until invalidated.
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
    /// Also invalidate the catalog list after a successful update.
    /// An update can change a name or comment visible in the list.
    #[serde(default = "default_invalidate_list_on_update")]
    pub invalidate_list_on_update: bool,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_prefix() -> String {
    crate::DEFAULT_API_PREFIX.to_string()
}

fn default_invalidate_list_on_update() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            token: None,
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: None,
            invalidate_list_on_update: default_invalidate_list_on_update(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given server origin with defaults elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("base_url '{}' is not a valid URL: {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "base_url '{}' must use http or https",
                self.base_url
            ));
        }

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(format!(
                "api_prefix '{}' must be empty or start with '/'",
                self.api_prefix
            ));
        }

        if let Some(token) = &self.token
            && token.trim().is_empty()
        {
            return Err("token must not be blank when set".to_string());
        }

        self.cache.validate()
    }

    /// Parse `base_url` after validation.
    pub fn parsed_base_url(&self) -> crate::Result<Url> {
        self.validate().map_err(crate::Error::Config)?;
        Url::parse(&self.base_url).map_err(|e| crate::Error::InvalidUrl(e.to_string()))
    }
}

impl CacheConfig {
    /// Get the staleness window as a Duration, if configured.
    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_secs.map(Duration::from_secs)
    }

    /// Validate cache configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.stale_after_secs == Some(0) {
            return Err(
                "cache.stale_after_secs must be greater than 0 (omit it to disable expiry)"
                    .to_string(),
            );
        }
        Ok(())
    }
}
