//! Client configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the booking API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root that request paths are joined onto
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token for authenticated (merchant) calls
    pub auth_token: Option<String>,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
            user_agent: default_user_agent(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `SALON_API_BASE_URL` (default `http://localhost:8080/api`)
    /// - `SALON_API_TIMEOUT_SECS` (default 30)
    /// - `SALON_API_TOKEN` (optional)
    /// - `SALON_API_USER_AGENT` (default `salon-booking/<version>`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: lookup("SALON_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: lookup("SALON_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            auth_token: lookup("SALON_API_TOKEN").filter(|token| !token.is_empty()),
            user_agent: lookup("SALON_API_USER_AGENT").unwrap_or_else(default_user_agent),
        }
    }

    /// Use a bearer token
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn default_user_agent() -> String {
    format!("salon-booking/{}", env!("CARGO_PKG_VERSION"))
}
